//! Float-switch pump governor.
//!
//! The float switch in the mash tun bounces as the liquid surface moves,
//! so the pump is not stopped the instant the switch reads "full". It is
//! started immediately whenever the switch reads "low", and stopped only
//! after the switch has read "full" continuously for `full_timeout_ms`.

/// Hysteresis timer deciding the pump command each tick.
#[derive(Debug, Clone)]
pub struct PumpGovernor {
    full_timeout_ms: u32,
    /// Continuous "full" time; saturates at the timeout.
    full_for_ms: u32,
}

impl PumpGovernor {
    /// A fresh governor treats the vessel as already settled full, so a
    /// switch that reads "full" at start-up keeps the pump off.
    pub fn new(full_timeout_ms: u32) -> Self {
        Self {
            full_timeout_ms,
            full_for_ms: full_timeout_ms,
        }
    }

    /// Returns `true` when the pump should run.
    pub fn update(&mut self, elapsed_ms: u32, switch_full: bool) -> bool {
        if switch_full {
            self.full_for_ms = self
                .full_for_ms
                .saturating_add(elapsed_ms)
                .min(self.full_timeout_ms);
        } else {
            self.full_for_ms = 0;
        }
        self.pump_on()
    }

    pub fn pump_on(&self) -> bool {
        self.full_for_ms < self.full_timeout_ms
    }

    pub fn reset(&mut self) {
        self.full_for_ms = self.full_timeout_ms;
    }
}
