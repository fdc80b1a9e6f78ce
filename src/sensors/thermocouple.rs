//! MAX6675 K-type thermocouple converter, bit-banged.
//!
//! The converter shifts out a 16-bit frame MSB first while CS is low:
//!
//! ```text
//!  15   14 ........ 3    2      1    0
//! ┌───┬──────────────┬──────┬──────┬───┐
//! │ 0 │ temp (12 bit)│ open │  id  │ - │
//! └───┴──────────────┴──────┴──────┴───┘
//! ```
//!
//! Temperature is in 0.25 °C steps. Bit 2 is set when no thermocouple is
//! attached. The clock is slow (1 ms half-periods) so any GPIO works.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::{SensorError, Vessel};

/// Open-thermocouple flag.
const OPEN_CIRCUIT: u16 = 0x0004;
const CELSIUS_PER_COUNT: f32 = 0.25;
const HALF_PERIOD_MS: u32 = 1;

/// Anything that yields one temperature in Celsius.
pub trait TemperatureProbe {
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}

pub struct Max6675<CS, SCLK, MISO, D> {
    vessel: Vessel,
    cs: CS,
    sclk: SCLK,
    miso: MISO,
    delay: D,
}

impl<CS, SCLK, MISO, D> Max6675<CS, SCLK, MISO, D>
where
    CS: OutputPin,
    SCLK: OutputPin,
    MISO: InputPin,
    D: DelayNs,
{
    /// Leaves CS deasserted. The converter needs a few hundred
    /// milliseconds after power-up before the first reading is valid.
    pub fn new(vessel: Vessel, mut cs: CS, sclk: SCLK, miso: MISO, delay: D) -> Self {
        cs.set_high().ok();
        Self {
            vessel,
            cs,
            sclk,
            miso,
            delay,
        }
    }

    pub fn vessel(&self) -> Vessel {
        self.vessel
    }

    /// Clock one raw 16-bit frame out of the converter.
    pub fn read_raw(&mut self) -> Result<u16, SensorError> {
        let gpio = SensorError::GpioFailed(self.vessel);
        self.cs.set_low().map_err(|_| gpio)?;
        self.delay.delay_ms(HALF_PERIOD_MS);

        let frame = self.shift_in();
        // CS goes back high even when the shift failed.
        let released = self.cs.set_high();
        let frame = frame.ok_or(gpio)?;
        released.map_err(|_| gpio)?;
        Ok(frame)
    }

    fn shift_in(&mut self) -> Option<u16> {
        let mut frame = 0u16;
        for _ in 0..16 {
            self.sclk.set_low().ok()?;
            self.delay.delay_ms(HALF_PERIOD_MS);
            let bit = self.miso.is_high().ok()?;
            frame = (frame << 1) | u16::from(bit);
            self.sclk.set_high().ok()?;
            self.delay.delay_ms(HALF_PERIOD_MS);
        }
        Some(frame)
    }
}

impl<CS, SCLK, MISO, D> TemperatureProbe for Max6675<CS, SCLK, MISO, D>
where
    CS: OutputPin,
    SCLK: OutputPin,
    MISO: InputPin,
    D: DelayNs,
{
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        decode_frame(self.read_raw()?, self.vessel)
    }
}

/// Convert a raw frame to Celsius.
pub fn decode_frame(frame: u16, vessel: Vessel) -> Result<f32, SensorError> {
    if frame & OPEN_CIRCUIT != 0 {
        return Err(SensorError::Disconnected(vessel));
    }
    Ok(f32::from(frame >> 3) * CELSIUS_PER_COUNT)
}
