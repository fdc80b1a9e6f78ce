//! Setpoint → target translation for the mashing phase.
//!
//! Strike water poured onto cold grain loses heat to the grain mass, so
//! while mashing the HLT is driven above the requested setpoint:
//!
//! ```text
//! dilution  = mash_water_ml / vessel_volume_ml
//! ramp-up   = setpoint + dilution * (setpoint - hlt_temp)
//! steady    = setpoint + dilution * (setpoint - mash_temp) + heat_loss
//! ```
//!
//! Both are capped at `max_target_c`. Which formula applies is decided by
//! the interpreter's ramp-up latch, not here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalModel {
    pub vessel_volume_ml: f32,
    pub heat_loss_c: f32,
    pub max_target_c: f32,
}

impl Default for ThermalModel {
    fn default() -> Self {
        Self {
            vessel_volume_ml: 32_000.0,
            heat_loss_c: 1.0,
            max_target_c: 79.0,
        }
    }
}

impl ThermalModel {
    /// Fraction of the vessel taken up by mash water.
    pub fn dilution(&self, mash_water_ml: u32) -> f32 {
        mash_water_ml as f32 / self.vessel_volume_ml
    }

    /// Inflated target used until the HLT first reaches it.
    pub fn ramp_up_target(&self, setpoint: f32, mash_water_ml: u32, hlt_temp: f32) -> f32 {
        self.clamp(setpoint + self.dilution(mash_water_ml) * (setpoint - hlt_temp))
    }

    /// Target once ramp-up has latched: compensates for the mash tun lag.
    pub fn offset_target(&self, setpoint: f32, mash_water_ml: u32, mash_temp: f32) -> f32 {
        let offset = self.dilution(mash_water_ml) * (setpoint - mash_temp) + self.heat_loss_c;
        self.clamp(setpoint + offset)
    }

    pub fn clamp(&self, target: f32) -> f32 {
        target.min(self.max_target_c)
    }
}
