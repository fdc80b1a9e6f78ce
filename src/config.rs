//! System configuration parameters
//!
//! All tunable parameters for the mash/lauter controller. The firmware runs
//! with [`SystemConfig::default`]; host tools may deserialize an override.

use serde::{Deserialize, Serialize};

use crate::control::pid::PidGains;
use crate::error::{Error, Result};
use crate::script::ThermalModel;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Heater PID ---
    pub pid_p_gain: f32,
    pub pid_i_gain: f32,
    pub pid_d_gain: f32,
    /// Heater time-proportioning window (milliseconds). Also the PID output limit.
    pub heater_period_ms: u32,

    // --- Pump ---
    /// How long the float switch must read "full" before the pump stops.
    pub pump_full_timeout_ms: u32,

    // --- Script limits ---
    /// Lowest setpoint accepted by the script loader (Celsius).
    pub min_setpoint_c: f32,
    /// Highest setpoint accepted by the script loader (Celsius).
    pub max_setpoint_c: f32,
    /// Hard ceiling applied to every computed target (Celsius).
    pub max_target_c: f32,

    // --- Thermal model ---
    /// Assumed HLT volume used for mash-water dilution math (mL).
    pub vessel_volume_ml: f32,
    /// Assumed heat lost between the HLT and the mash tun (Celsius).
    pub heat_loss_c: f32,

    // --- Hardware ---
    /// Thermocouple converters need this long after power-up.
    pub sensor_settle_ms: u32,
    pub link_baud: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // PID
            pid_p_gain: 100.0,
            pid_i_gain: 1.0,
            pid_d_gain: 20.0,
            heater_period_ms: 1000,

            // Pump
            pump_full_timeout_ms: 5000,

            // Limits
            min_setpoint_c: 0.0,
            max_setpoint_c: 79.0,
            max_target_c: 79.0,

            // Thermal model
            vessel_volume_ml: 32_000.0,
            heat_loss_c: 1.0,

            // Hardware
            sensor_settle_ms: 500,
            link_baud: 9600,
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.pid_p_gain < 0.0 || self.pid_i_gain < 0.0 || self.pid_d_gain < 0.0 {
            return Err(Error::Config("PID gains must be non-negative"));
        }
        if self.heater_period_ms == 0 {
            return Err(Error::Config("heater_period_ms must be positive"));
        }
        if self.min_setpoint_c >= self.max_setpoint_c {
            return Err(Error::Config("min_setpoint_c must be below max_setpoint_c"));
        }
        if self.max_setpoint_c > self.max_target_c {
            return Err(Error::Config("max_setpoint_c must not exceed max_target_c"));
        }
        if !(0.0..100.0).contains(&self.max_target_c) {
            return Err(Error::Config("max_target_c must be below boiling"));
        }
        if self.vessel_volume_ml <= 0.0 {
            return Err(Error::Config("vessel_volume_ml must be positive"));
        }
        if self.heat_loss_c < 0.0 {
            return Err(Error::Config("heat_loss_c must be non-negative"));
        }
        if self.link_baud == 0 {
            return Err(Error::Config("link_baud must be positive"));
        }
        Ok(())
    }

    /// PID output ceiling; one output unit is one heater-on millisecond.
    pub fn pid_output_limit(&self) -> f32 {
        self.heater_period_ms as f32
    }

    pub fn pid_gains(&self) -> PidGains {
        PidGains {
            p: self.pid_p_gain,
            i: self.pid_i_gain,
            d: self.pid_d_gain,
        }
    }

    pub fn thermal_model(&self) -> ThermalModel {
        ThermalModel {
            vessel_volume_ml: self.vessel_volume_ml,
            heat_loss_c: self.heat_loss_c,
            max_target_c: self.max_target_c,
        }
    }
}
