//! Float switch ("bobber") level sensor.
//!
//! A reed switch closes when the float rises, pulling the input HIGH, so
//! a high level means the liquid has reached the float.

use embedded_hal::digital::InputPin;
use log::warn;

/// Anything that reports whether a vessel is full.
pub trait LevelSwitch {
    fn is_full(&mut self) -> bool;
}

pub struct FloatSwitchSensor<P: InputPin> {
    pin: P,
    last: bool,
}

impl<P: InputPin> FloatSwitchSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, last: true }
    }

    /// Last level seen, without touching the pin.
    pub fn last(&self) -> bool {
        self.last
    }
}

impl<P: InputPin> LevelSwitch for FloatSwitchSensor<P> {
    /// A failed read reports "full" so the pump is never started blind.
    fn is_full(&mut self) -> bool {
        self.last = match self.pin.is_high() {
            Ok(level) => level,
            Err(_) => {
                warn!("Float switch read failed, assuming full");
                true
            }
        };
        self.last
    }
}
