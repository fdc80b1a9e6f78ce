//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (thermocouples, float switches, relays, the serial
//! console) implement these traits. The
//! [`ControlLoop`](super::control_loop::ControlLoop) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::control::heater::HeaterDuty;
use crate::error::{SensorError, Vessel};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Liquid-level float switches ("bobbers").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatSwitch {
    /// Mash tun level; gates the pump.
    MashTun,
    /// Kettle level; reported only.
    Kettle,
}

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// One instantaneous reading in Celsius.
    fn read_temperature(&mut self, vessel: Vessel) -> Result<f32, SensorError>;

    /// `true` when the liquid has reached the float.
    fn read_float_switch(&mut self, switch: FloatSwitch) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Drive the heater relay for one time-proportioning window.
    /// Implementations may block for the length of the window.
    fn set_heater(&mut self, duty: HeaterDuty);

    fn set_pump(&mut self, on: bool);

    /// Heater and pump off, without waiting.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → console / log)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial link, log).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Pause / resume
// ───────────────────────────────────────────────────────────────

/// Called by the interpreter when it executes a `PAU` statement.
/// Returning means "resume".
pub trait PauseDelegate {
    fn on_pause(&mut self);
}

/// Blocks until the operator asks to continue (a byte on the link, a
/// button press, ...).
pub trait ResumePort {
    /// Returns how long the wait took, in milliseconds.
    fn wait_for_resume(&mut self) -> u32;
}
