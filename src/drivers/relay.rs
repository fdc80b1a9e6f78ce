//! Relay output driver.
//!
//! Both loads (the 240 V HLT element and the 120 V pump) sit behind
//! active-high relay modules. This driver is a dumb actuator: it only
//! remembers the state it last commanded.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct Relay<P: OutputPin> {
    pin: P,
    name: &'static str,
    is_on: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Create a relay wrapper, initialised OFF.
    pub fn new(mut pin: P, name: &'static str) -> Self {
        if pin.set_low().is_err() {
            warn!("{name} relay: GPIO write failed");
        }
        Self {
            pin,
            name,
            is_on: false,
        }
    }

    pub fn set(&mut self, on: bool) {
        let written = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if written.is_err() {
            warn!("{} relay: GPIO write failed", self.name);
            return;
        }
        self.is_on = on;
    }

    #[inline]
    pub fn on(&mut self) {
        self.set(true);
    }

    #[inline]
    pub fn off(&mut self) {
        self.set(false);
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn free(self) -> P {
        self.pin
    }
}
