//! Recipe language compiler (host side).
//!
//! Brewers write recipes as plain text:
//!
//! ```text
//! Mash water volume: 15 L
//! Mashing:
//!   heat to 66 C
//!   hold at 66 C for 60 minutes
//!   hold at 76 C for 10 min
//! Sparging:
//!   hold at 76 C for 45 min
//! ```
//!
//! [`compile`] turns that into interpreter [`Statement`]s. Phase keywords
//! expand to a mode change plus a `PAU`, so the operator confirms every
//! phase transition.

pub mod lexer;
pub mod parser;

use core::fmt;

use crate::protocol::SetpointScript;
use crate::script::{CommandTag, Mode, SCRIPT_CAPACITY, Script, Statement, ThermalModel};

/// Compile errors. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    /// Text no token rule accepts; carries the rest of the line.
    UnexpectedText { line: usize, text: String },
    UnexpectedToken { line: usize, text: String },
    UnexpectedEnd,
    ValueOutOfRange { line: usize, text: String },
    /// The recipe expands past the interpreter's statement capacity.
    TooManyStatements { line: usize },
    /// A statement the setpoint upload cannot carry. `statement` is 1-based.
    NotTransmittable { statement: usize, command: CommandTag },
    /// A setpoint upload needs a `mashing` or `sparging` phase.
    MissingMode,
}

impl fmt::Display for RecipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedText { line, text } => {
                write!(f, "Error on line {line} of recipe: '{text}'.")
            }
            Self::UnexpectedToken { line, text } => write!(
                f,
                "Error on line {line} of recipe: unexpected token '{text}'."
            ),
            Self::UnexpectedEnd => write!(f, "Unexpected end of file."),
            Self::ValueOutOfRange { line, text } => write!(
                f,
                "Error on line {line} of recipe: value '{text}' out of range."
            ),
            Self::TooManyStatements { line } => write!(
                f,
                "Error on line {line} of recipe: more than {SCRIPT_CAPACITY} statements."
            ),
            Self::NotTransmittable { statement, command } => write!(
                f,
                "Statement {statement} of recipe ({}) cannot be sent to the controller.",
                command.tag()
            ),
            Self::MissingMode => write!(
                f,
                "Recipe needs a mashing or sparging phase to be sent to the controller."
            ),
        }
    }
}

impl std::error::Error for RecipeError {}

/// A compiled recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    statements: heapless::Vec<Statement, SCRIPT_CAPACITY>,
}

/// Compile recipe text.
pub fn compile(source: &str) -> Result<Recipe, RecipeError> {
    let tokens = lexer::tokenize(source)?;
    let statements = parser::Parser::new(&tokens).parse()?;
    Ok(Recipe { statements })
}

impl Recipe {
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Ready-to-run interpreter for this recipe.
    pub fn to_script(&self, model: ThermalModel) -> Script {
        Script::from_statements(model, self.statements.iter().copied())
    }

    /// The recipe as a setpoint program for the serial load protocol.
    ///
    /// The protocol carries one mode, the mash water volume and a list of
    /// holds. Before the first hold the recipe may set the phase once, the
    /// volume and pause, since acknowledging `END` starts the run. After it
    /// only holds may follow. `HEA` and `INI` have no wire form at all.
    pub fn to_setpoint_script(&self) -> Result<SetpointScript, RecipeError> {
        let mut mode = None;
        let mut mash_water_ml = 0;
        let mut setpoints: Vec<(f32, u32)> = Vec::new();
        for (index, stmt) in self.statements.iter().enumerate() {
            let prologue = setpoints.is_empty();
            match stmt.command() {
                CommandTag::Mash if prologue && mode.is_none() => mode = Some(Mode::Mashing),
                CommandTag::Sparge if prologue && mode.is_none() => mode = Some(Mode::Sparging),
                CommandTag::MashWaterVolume if prologue => {
                    mash_water_ml = stmt.volume_ml().unwrap_or(0);
                }
                CommandTag::Pause if prologue => {}
                CommandTag::Hold => {
                    if let (Some(celsius), Some(ms)) = (stmt.setpoint(), stmt.duration_ms()) {
                        setpoints.push((celsius, ms));
                    }
                }
                command => {
                    return Err(RecipeError::NotTransmittable {
                        statement: index + 1,
                        command,
                    });
                }
            }
        }
        Ok(SetpointScript {
            mode: mode.ok_or(RecipeError::MissingMode)?,
            mash_water_ml,
            setpoints,
        })
    }
}

/// One statement per line, for review before sending.
impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            match stmt.command() {
                CommandTag::Initialize => writeln!(f, "INITIALIZE")?,
                CommandTag::Mash => writeln!(f, "MASHING")?,
                CommandTag::Sparge => writeln!(f, "SPARGING")?,
                CommandTag::Pause => writeln!(f, "PAUSE")?,
                CommandTag::MashWaterVolume => {
                    writeln!(f, "MASH WATER {} mL", stmt.volume_ml().unwrap_or(0))?;
                }
                CommandTag::Heat => {
                    writeln!(f, "HEAT to {:5.2} \u{00b0}C", stmt.setpoint().unwrap_or(0.0))?;
                }
                CommandTag::Hold => writeln!(
                    f,
                    "HOLD {:5.2} \u{00b0}C for {:5.2} minutes",
                    stmt.setpoint().unwrap_or(0.0),
                    stmt.duration_ms().unwrap_or(0) as f32 / 60_000.0
                )?,
                CommandTag::Unrecognized(tag) => writeln!(f, "?{tag}")?,
            }
        }
        Ok(())
    }
}
