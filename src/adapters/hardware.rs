//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns both thermocouples, both float switches and the two relays,
//! exposing them through [`SensorPort`] and [`ActuatorPort`]. This is the
//! only module in the system that touches actual hardware. Every part is
//! generic over `embedded-hal`, so host tests plug in fakes.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::ports::{ActuatorPort, FloatSwitch, SensorPort};
use crate::control::heater::HeaterDuty;
use crate::drivers::Relay;
use crate::error::{SensorError, Vessel};
use crate::sensors::{LevelSwitch, TemperatureProbe};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<T, S, H, P, D>
where
    T: TemperatureProbe,
    S: LevelSwitch,
    H: OutputPin,
    P: OutputPin,
    D: DelayNs,
{
    hlt: T,
    mash: T,
    mash_tun: S,
    kettle: S,
    heater: Relay<H>,
    pump: Relay<P>,
    /// Paces the heater window.
    delay: D,
}

impl<T, S, H, P, D> HardwareAdapter<T, S, H, P, D>
where
    T: TemperatureProbe,
    S: LevelSwitch,
    H: OutputPin,
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(
        hlt: T,
        mash: T,
        mash_tun: S,
        kettle: S,
        heater: Relay<H>,
        pump: Relay<P>,
        delay: D,
    ) -> Self {
        Self {
            hlt,
            mash,
            mash_tun,
            kettle,
            heater,
            pump,
            delay,
        }
    }

    pub fn heater_on(&self) -> bool {
        self.heater.is_on()
    }

    pub fn pump_on(&self) -> bool {
        self.pump.is_on()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<T, S, H, P, D> SensorPort for HardwareAdapter<T, S, H, P, D>
where
    T: TemperatureProbe,
    S: LevelSwitch,
    H: OutputPin,
    P: OutputPin,
    D: DelayNs,
{
    fn read_temperature(&mut self, vessel: Vessel) -> Result<f32, SensorError> {
        match vessel {
            Vessel::HotLiquor => self.hlt.read_celsius(),
            Vessel::Mash => self.mash.read_celsius(),
        }
    }

    fn read_float_switch(&mut self, switch: FloatSwitch) -> bool {
        match switch {
            FloatSwitch::MashTun => self.mash_tun.is_full(),
            FloatSwitch::Kettle => self.kettle.is_full(),
        }
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<T, S, H, P, D> ActuatorPort for HardwareAdapter<T, S, H, P, D>
where
    T: TemperatureProbe,
    S: LevelSwitch,
    H: OutputPin,
    P: OutputPin,
    D: DelayNs,
{
    /// Blocks for the whole window: relay closed for `on_ms`, open for the
    /// rest. A full-duty window leaves the relay closed.
    fn set_heater(&mut self, duty: HeaterDuty) {
        debug!("Heater window {}/{} ms", duty.on_ms, duty.period_ms);
        if duty.on_ms > 0 {
            self.heater.on();
            self.delay.delay_ms(duty.on_ms);
        }
        if duty.off_ms() > 0 || duty.is_off() {
            self.heater.off();
            self.delay.delay_ms(duty.off_ms());
        }
    }

    fn set_pump(&mut self, on: bool) {
        self.pump.set(on);
    }

    fn all_off(&mut self) {
        self.heater.off();
        self.pump.off();
    }
}
