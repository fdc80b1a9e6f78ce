//! Inbound commands to the control loop.
//!
//! These represent actions requested by the outside world (the serial
//! console, host tooling) that the
//! [`ControlLoop`](super::control_loop::ControlLoop) interprets and acts upon.

use crate::script::Script;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Replace whatever is running with a freshly loaded script.
    LoadScript(Script),

    /// Stop the running script and switch every actuator off.
    Abort,
}
