//! Heater duty cycle.
//!
//! The HLT element sits behind a mechanical relay, so it is driven by time
//! proportioning: within a fixed window the relay is closed for `on_ms`
//! and open for the rest.

/// Relay-on time within one heater window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaterDuty {
    pub on_ms: u32,
    pub period_ms: u32,
}

impl HeaterDuty {
    pub const fn off(period_ms: u32) -> Self {
        Self {
            on_ms: 0,
            period_ms,
        }
    }

    /// Scale a PID output in `[0, output_limit]` onto the window.
    pub fn from_output(output: f32, output_limit: f32, period_ms: u32) -> Self {
        if output_limit <= 0.0 || !output.is_finite() {
            return Self::off(period_ms);
        }
        let fraction = (output / output_limit).clamp(0.0, 1.0);
        Self {
            on_ms: (fraction * period_ms as f32).round() as u32,
            period_ms,
        }
    }

    pub fn off_ms(&self) -> u32 {
        self.period_ms.saturating_sub(self.on_ms)
    }

    pub fn fraction(&self) -> f32 {
        if self.period_ms == 0 {
            0.0
        } else {
            self.on_ms as f32 / self.period_ms as f32
        }
    }

    pub fn is_off(&self) -> bool {
        self.on_ms == 0
    }
}
