//! PID controller for the HLT heater
//!
//! Heater-only control law: the output is never negative and the integral
//! term is clamped on both sides, at zero and at the output limit, so a
//! long cold start cannot wind it up past full power.

use serde::{Deserialize, Serialize};

/// PID gains, kept separately so the controller can be rebuilt for a new
/// setpoint without losing its tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub p: f32,
    pub i: f32,
    pub d: f32,
}

/// PID controller
#[derive(Debug, Clone)]
pub struct PidController {
    gains: PidGains,
    setpoint: f32,
    output_limit: f32,
    integral: f32,
    prev_error: f32,
}

impl PidController {
    pub fn new(setpoint: f32, gains: PidGains, output_limit: f32) -> Self {
        Self {
            gains,
            setpoint,
            output_limit,
            integral: 0.0,
            prev_error: 0.0,
        }
    }

    /// Compute the next heater output in `[0, output_limit]`.
    pub fn next_output(&mut self, measured: f32, elapsed_ms: u32) -> f32 {
        let error = self.setpoint - measured;
        let elapsed_s = elapsed_ms as f32 / 1000.0;

        let derivative = if elapsed_s > 0.0 {
            (error - self.prev_error) / elapsed_s
        } else {
            0.0
        };

        // Anti-windup: i_gain * integral stays within [0, output_limit].
        let integral_max = if self.gains.i > 0.0 {
            self.output_limit / self.gains.i
        } else {
            self.output_limit
        };
        self.integral = (self.integral + error * elapsed_s).clamp(0.0, integral_max);
        self.prev_error = error;

        // Target reached: residual I/D terms must not push it further.
        if measured >= self.setpoint {
            return 0.0;
        }

        let output =
            self.gains.p * error + self.gains.i * self.integral + self.gains.d * derivative;
        output.clamp(0.0, self.output_limit)
    }

    pub fn setpoint(&self) -> f32 {
        self.setpoint
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn output_limit(&self) -> f32 {
        self.output_limit
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    /// Reset controller state
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }
}
