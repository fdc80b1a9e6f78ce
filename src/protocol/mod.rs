//! Serial protocol between the controller and the host.
//!
//! The host uploads a setpoint program with the stop-and-wait
//! [`loader`] protocol, then reads one telemetry line per tick. While a
//! `PAU` is active the device writes `PAUSED` and waits for any byte.

pub mod link;
pub mod loader;

pub use link::Link;
pub use loader::{LoadProgress, ScriptLoader, SetpointLimits, SetpointScript};

/// Ack line for an accepted field.
pub const ACK_OK: &str = "OK";
/// Prefix of a rejection line; the error message follows.
pub const ACK_ERROR_PREFIX: &str = "ERROR: ";
/// Written once when a `PAU` blocks.
pub const PAUSED_LINE: &str = "PAUSED";
