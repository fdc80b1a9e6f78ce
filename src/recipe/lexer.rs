//! Recipe tokenizer.
//!
//! Keywords are case-insensitive and may span several words
//! (`mash water volume`, `heat to`, `deg. C`). Rules are tried in table
//! order and the first alternative that ends on a word boundary wins, so
//! `mash water vol` is a volume keyword while a bare `mash` starts the
//! mashing phase. A keyword may be followed by a single `:`.

use super::RecipeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    MashVolume,
    Initialize,
    Mashing,
    Sparging,
    Heat,
    Hold,
    Pause,
    For,
    Float,
    Integer,
    Celsius,
    Fahrenheit,
    Milliliters,
    Liters,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Source text exactly as written.
    pub text: &'a str,
    /// 1-based.
    pub line: usize,
}

/// Longest alternatives first.
const KEYWORDS: &[(TokenKind, &[&str])] = &[
    (
        TokenKind::MashVolume,
        &[
            "mash water volume",
            "mash water vol.",
            "mash water vol",
            "mash volume",
            "mash vol.",
            "mash vol",
            "water volume",
            "water vol.",
            "water vol",
            "volume",
            "vol.",
            "vol",
        ],
    ),
    (
        TokenKind::Initialize,
        &["initialization", "initialisation", "initialize", "initialise"],
    ),
    (TokenKind::Mashing, &["mashing", "mash"]),
    (TokenKind::Sparging, &["sparging", "sparge"]),
    (TokenKind::Heat, &["heat to", "heat"]),
    (TokenKind::Hold, &["hold at", "hold"]),
    (TokenKind::Pause, &["pause", "wait"]),
    (TokenKind::For, &["for"]),
];

const DEGREE_PREFIXES: &[&str] = &["degrees ", "degree ", "deg. ", "deg ", "°", ""];
const CELSIUS_UNITS: &[&str] = &["centigrade", "celsius", "c"];
const FAHRENHEIT_UNITS: &[&str] = &["fahrenheit", "f"];

const UNITS: &[(TokenKind, &[&str])] = &[
    (
        TokenKind::Milliliters,
        &["milliliters", "millilitres", "milliliter", "millilitre", "ml"],
    ),
    (TokenKind::Liters, &["liters", "litres", "liter", "litre", "l"]),
    (
        TokenKind::Milliseconds,
        &["milliseconds", "millisecond", "ms"],
    ),
    (
        TokenKind::Seconds,
        &["seconds", "second", "secs", "sec", "s"],
    ),
    (
        TokenKind::Minutes,
        &["minutes", "minute", "mins", "min", "m"],
    ),
    (TokenKind::Hours, &["hours", "hour", "h"]),
];

/// Split recipe text into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, RecipeError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut rest = source;

    loop {
        let trimmed = rest.trim_start();
        line += rest[..rest.len() - trimmed.len()].matches('\n').count();
        rest = trimmed;
        if rest.is_empty() {
            return Ok(tokens);
        }

        let Some((kind, len)) = next_token(rest) else {
            let text = rest.lines().next().unwrap_or(rest).trim_end();
            return Err(RecipeError::UnexpectedText {
                line,
                text: text.to_owned(),
            });
        };
        tokens.push(Token {
            kind,
            text: &rest[..len],
            line,
        });
        rest = &rest[len..];
    }
}

fn next_token(input: &str) -> Option<(TokenKind, usize)> {
    if let Some(found) = match_table(input, KEYWORDS) {
        return Some(found);
    }
    if let Some(found) = match_number(input) {
        return Some(found);
    }
    for (kind, units) in [
        (TokenKind::Celsius, CELSIUS_UNITS),
        (TokenKind::Fahrenheit, FAHRENHEIT_UNITS),
    ] {
        for prefix in DEGREE_PREFIXES {
            let Some(skip) = match_phrase(input, prefix) else {
                continue;
            };
            if let Some(len) = match_word(&input[skip..], units) {
                return Some((kind, skip + len));
            }
        }
    }
    match_table(input, UNITS)
}

fn match_table(input: &str, table: &[(TokenKind, &[&str])]) -> Option<(TokenKind, usize)> {
    table.iter().find_map(|&(kind, alternatives)| {
        let len = match_word(input, alternatives)?;
        Some((kind, len + usize::from(input[len..].starts_with(':'))))
    })
}

/// First alternative that matches and ends on a word boundary.
fn match_word(input: &str, alternatives: &[&str]) -> Option<usize> {
    alternatives.iter().find_map(|phrase| {
        let len = match_phrase(input, phrase)?;
        let boundary = !input[len..].starts_with(|c: char| c.is_alphanumeric());
        boundary.then_some(len)
    })
}

/// Case-insensitive prefix match. A space in `phrase` matches any run of
/// spaces or tabs. Returns the matched byte length.
fn match_phrase(input: &str, phrase: &str) -> Option<usize> {
    let mut pos = 0;
    for expected in phrase.chars() {
        if expected == ' ' {
            let gap = input[pos..]
                .find(|c: char| c != ' ' && c != '\t')
                .unwrap_or(input.len() - pos);
            if gap == 0 {
                return None;
            }
            pos += gap;
            continue;
        }
        let actual = input[pos..].chars().next()?;
        if !actual.eq_ignore_ascii_case(&expected) {
            return None;
        }
        pos += actual.len_utf8();
    }
    Some(pos)
}

/// `[-+]?[0-9]+(\.[0-9]*)?`
fn match_number(input: &str) -> Option<(TokenKind, usize)> {
    let bytes = input.as_bytes();
    let mut pos = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let digits = bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    pos += digits;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        pos += bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
        return Some((TokenKind::Float, pos));
    }
    Some((TokenKind::Integer, pos))
}
