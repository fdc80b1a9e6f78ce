//! Recursive-descent parser from tokens to statements.
//!
//! ```text
//! statement   := INITIALIZE | MASHING | SPARGING | PAUSE
//!              | MASH_VOLUME volume | HEAT temperature
//!              | HOLD temperature FOR time
//! volume      := number (LITERS | MILLILITERS)
//! temperature := number (CELSIUS | FAHRENHEIT)
//! time        := number (MILLISECONDS | SECONDS | MINUTES | HOURS)
//! ```

use crate::script::{SCRIPT_CAPACITY, Statement};

use super::RecipeError;
use super::lexer::{Token, TokenKind};

pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse every token into a statement list.
    pub fn parse(mut self) -> Result<heapless::Vec<Statement, SCRIPT_CAPACITY>, RecipeError> {
        let mut out = heapless::Vec::new();
        while let Some(&start) = self.tokens.get(self.pos) {
            self.pos += 1;
            let (first, second) = match start.kind {
                TokenKind::Initialize => (Statement::initialize(), None),
                TokenKind::Mashing => (Statement::mash(), Some(Statement::pause())),
                TokenKind::Sparging => (Statement::sparge(), Some(Statement::pause())),
                TokenKind::Pause => (Statement::pause(), None),
                TokenKind::MashVolume => (Statement::mash_water_volume(self.volume()?), None),
                TokenKind::Heat => (Statement::heat(self.temperature()?), None),
                TokenKind::Hold => {
                    let celsius = self.temperature()?;
                    self.expect(TokenKind::For)?;
                    (Statement::hold(celsius, self.time()?), None)
                }
                _ => return Err(unexpected(start)),
            };
            for stmt in core::iter::once(first).chain(second) {
                out.push(stmt)
                    .map_err(|_| RecipeError::TooManyStatements { line: start.line })?;
            }
        }
        Ok(out)
    }

    fn next(&mut self) -> Result<Token<'a>, RecipeError> {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or(RecipeError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, RecipeError> {
        let token = self.next()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(token))
        }
    }

    fn number(&mut self) -> Result<(f64, Token<'a>), RecipeError> {
        let token = self.next()?;
        if !matches!(token.kind, TokenKind::Integer | TokenKind::Float) {
            return Err(unexpected(token));
        }
        let value = token.text.parse::<f64>().map_err(|_| unexpected(token))?;
        Ok((value, token))
    }

    fn volume(&mut self) -> Result<u32, RecipeError> {
        let (value, number) = self.number()?;
        let unit = self.next()?;
        let ml = match unit.kind {
            TokenKind::Liters => value * 1000.0,
            TokenKind::Milliliters => value,
            _ => return Err(unexpected(unit)),
        };
        whole(ml, number)
    }

    fn temperature(&mut self) -> Result<f32, RecipeError> {
        let (value, _) = self.number()?;
        let unit = self.next()?;
        let celsius = match unit.kind {
            TokenKind::Celsius => value,
            TokenKind::Fahrenheit => (value - 32.0) / 1.8,
            _ => return Err(unexpected(unit)),
        };
        Ok(celsius as f32)
    }

    fn time(&mut self) -> Result<u32, RecipeError> {
        let (value, number) = self.number()?;
        let unit = self.next()?;
        let ms = match unit.kind {
            TokenKind::Milliseconds => value,
            TokenKind::Seconds => value * 1000.0,
            TokenKind::Minutes => value * 60_000.0,
            TokenKind::Hours => value * 3_600_000.0,
            _ => return Err(unexpected(unit)),
        };
        whole(ms, number)
    }
}

fn unexpected(token: Token<'_>) -> RecipeError {
    RecipeError::UnexpectedToken {
        line: token.line,
        text: token.text.to_owned(),
    }
}

/// Round to the nearest unit; negative or oversized values are rejected.
fn whole(value: f64, token: Token<'_>) -> Result<u32, RecipeError> {
    let rounded = value.round();
    if !(0.0..=f64::from(u32::MAX)).contains(&rounded) {
        return Err(RecipeError::ValueOutOfRange {
            line: token.line,
            text: token.text.to_owned(),
        });
    }
    Ok(rounded as u32)
}
