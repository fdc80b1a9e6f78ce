//! Closed-loop control: heater PID, duty-cycle mapping and the pump governor.

pub mod heater;
pub mod pid;
pub mod pump;
