//! Script statements: a command tag plus the payload that tag carries.
//!
//! On the wire a command is three ASCII bytes (`HEA`, `HLD`, ...). Inside
//! the firmware the tag is decoded once into [`CommandTag`] and the payload
//! is stored as the matching [`Payload`] variant, so a statement can never
//! carry a payload its command does not understand.

use core::fmt;

/// Raw three-byte command tag as it appears on the link.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; 3]);

impl Tag {
    pub const fn new(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(\"{self}\")")
    }
}

/// Interpreter command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTag {
    /// `INI`: back to the initialising mode.
    Initialize,
    /// `MSH`: mashing mode.
    Mash,
    /// `SPG`: sparging mode.
    Sparge,
    /// `PAU`: suspend until the operator resumes.
    Pause,
    /// `MWV`: register the mash water volume.
    MashWaterVolume,
    /// `HEA`: heat until the target is reached.
    Heat,
    /// `HLD`: hold the target for a duration.
    Hold,
    /// Anything else. Fatal when the interpreter reaches it.
    Unrecognized(Tag),
}

impl CommandTag {
    pub fn from_tag(tag: Tag) -> Self {
        match tag.as_bytes() {
            b"INI" => Self::Initialize,
            b"MSH" => Self::Mash,
            b"SPG" => Self::Sparge,
            b"PAU" => Self::Pause,
            b"MWV" => Self::MashWaterVolume,
            b"HEA" => Self::Heat,
            b"HLD" => Self::Hold,
            _ => Self::Unrecognized(tag),
        }
    }

    pub fn tag(self) -> Tag {
        Tag::new(match self {
            Self::Initialize => *b"INI",
            Self::Mash => *b"MSH",
            Self::Sparge => *b"SPG",
            Self::Pause => *b"PAU",
            Self::MashWaterVolume => *b"MWV",
            Self::Heat => *b"HEA",
            Self::Hold => *b"HLD",
            Self::Unrecognized(tag) => return tag,
        })
    }
}

/// Numeric payload, selected by the command tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    None,
    /// Millilitres.
    Volume(u32),
    /// Celsius.
    Temperature(f32),
    /// Milliseconds.
    Duration(u32),
    TemperatureAndDuration(f32, u32),
}

/// One immutable script statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statement {
    command: CommandTag,
    payload: Payload,
}

impl Statement {
    pub fn initialize() -> Self {
        Self::bare(CommandTag::Initialize)
    }

    pub fn mash() -> Self {
        Self::bare(CommandTag::Mash)
    }

    pub fn sparge() -> Self {
        Self::bare(CommandTag::Sparge)
    }

    pub fn pause() -> Self {
        Self::bare(CommandTag::Pause)
    }

    pub fn mash_water_volume(ml: u32) -> Self {
        Self {
            command: CommandTag::MashWaterVolume,
            payload: Payload::Volume(ml),
        }
    }

    pub fn heat(celsius: f32) -> Self {
        Self {
            command: CommandTag::Heat,
            payload: Payload::Temperature(celsius),
        }
    }

    pub fn hold(celsius: f32, duration_ms: u32) -> Self {
        Self {
            command: CommandTag::Hold,
            payload: Payload::TemperatureAndDuration(celsius, duration_ms),
        }
    }

    /// A statement whose tag is outside the vocabulary, kept so the
    /// interpreter can report it when reached.
    pub fn unrecognized(tag: Tag) -> Self {
        Self::bare(CommandTag::from_tag(tag))
    }

    fn bare(command: CommandTag) -> Self {
        Self {
            command,
            payload: Payload::None,
        }
    }

    pub fn command(&self) -> CommandTag {
        self.command
    }

    pub fn payload(&self) -> Payload {
        self.payload
    }

    pub fn setpoint(&self) -> Option<f32> {
        match self.payload {
            Payload::Temperature(t) | Payload::TemperatureAndDuration(t, _) => Some(t),
            _ => None,
        }
    }

    pub fn duration_ms(&self) -> Option<u32> {
        match self.payload {
            Payload::Duration(d) | Payload::TemperatureAndDuration(_, d) => Some(d),
            _ => None,
        }
    }

    pub fn volume_ml(&self) -> Option<u32> {
        match self.payload {
            Payload::Volume(v) => Some(v),
            _ => None,
        }
    }
}
