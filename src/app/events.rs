//! Outbound application events.
//!
//! The [`ControlLoop`](super::control_loop::ControlLoop) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them: write a status line to the serial
//! link, log to the console, etc.

use crate::error::{SensorError, ScriptError};
use crate::script::Mode;
use crate::telemetry::TelemetryData;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Per-tick status line.
    Telemetry(TelemetryData),

    /// A new script was accepted.
    ScriptLoaded { mode: Mode, statements: usize },

    /// The cursor ran off the end of the script.
    ScriptCompleted,

    /// The script hit a fatal statement.
    ScriptFailed(ScriptError),

    /// The running script was discarded by an operator command.
    ScriptAborted,

    /// A temperature reading failed; actuators are off for this tick.
    SensorFault(SensorError),

    /// A `PAU` statement suspended the loop; actuators are off.
    Paused,

    /// The operator resumed after a pause.
    Resumed,
}
