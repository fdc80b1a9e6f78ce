//! Sensor drivers, generic over `embedded-hal` 1.0 pin and delay traits.
//!
//! | Driver           | Measures                  | Bus              |
//! |------------------|---------------------------|------------------|
//! | `thermocouple`   | HLT / mash tun °C         | bit-banged SPI   |
//! | `float_switch`   | mash tun / kettle level   | digital input    |

pub mod float_switch;
pub mod thermocouple;

pub use float_switch::{FloatSwitchSensor, LevelSwitch};
pub use thermocouple::{Max6675, TemperatureProbe};
