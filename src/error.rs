//! Unified error types for the MashLauter firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they
//! can be handed between the loader, interpreter and control loop without
//! allocation.

use core::fmt;

use crate::script::statement::Tag;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A temperature sensor could not be read.
    Sensor(SensorError),
    /// The script-load byte stream was malformed or out of range.
    Protocol(ProtocolError),
    /// The running script hit a fatal condition.
    Script(ScriptError),
    /// The serial link failed.
    Link(LinkError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Script(e) => write!(f, "script: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Which vessel a temperature reading belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vessel {
    /// Hot liquor tank: the heated vessel.
    HotLiquor,
    /// Mash tun: grain bed.
    Mash,
}

impl fmt::Display for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HotLiquor => write!(f, "HLT"),
            Self::Mash => write!(f, "mash tun"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The thermocouple reported an open circuit.
    Disconnected(Vessel),
    /// GPIO access to the converter failed.
    GpioFailed(Vessel),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected(v) => write!(f, "{v} thermocouple disconnected"),
            Self::GpioFailed(v) => write!(f, "{v} thermocouple GPIO failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Script-load protocol errors
// ---------------------------------------------------------------------------

/// Rejections reported on the ack channel while loading a script.
/// The `Display` text is exactly what follows `ERROR: ` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// First field was not `BEG`.
    ExpectedBegin,
    /// Mode field was neither `MSH` nor `SPG`.
    UnknownMode,
    /// Setpoint count exceeds the statement capacity.
    TooManySetpoints,
    /// A setpoint temperature lies outside the accepted range.
    TemperatureOutOfRange,
    /// Final field was not `END`.
    ExpectedEnd,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedBegin => write!(f, "expected BEG"),
            Self::UnknownMode => write!(f, "unknown mode"),
            Self::TooManySetpoints => write!(f, "too many setpoints"),
            Self::TemperatureOutOfRange => write!(f, "temperature out of range"),
            Self::ExpectedEnd => write!(f, "expected END"),
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

// ---------------------------------------------------------------------------
// Interpreter errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptError {
    /// A statement tag outside the command vocabulary.
    UnknownCommand(Tag),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(tag) => write!(f, "unknown command \"{tag}\""),
        }
    }
}

impl From<ScriptError> for Error {
    fn from(e: ScriptError) -> Self {
        Self::Script(e)
    }
}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    ReadFailed,
    WriteFailed,
    /// The peer went away mid-transfer.
    Closed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::WriteFailed => write!(f, "write failed"),
            Self::Closed => write!(f, "link closed"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
