//! Application core: pure domain logic, zero I/O.
//!
//! This module ties the recipe interpreter, the heater PID and the pump
//! governor into one control tick. All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod control_loop;
pub mod events;
pub mod ports;
