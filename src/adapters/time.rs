//! Monotonic clock adapter.
//!
//! Feeds the elapsed-milliseconds argument of every control tick.
//!
//! - **`feature = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **otherwise**: uses `std::time::Instant` for host-side testing and
//!   simulation.

pub struct MonotonicClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
    /// Uptime at the last [`lap_ms`](Self::lap_ms).
    last_lap_ms: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        let mut clock = Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
            last_lap_ms: 0,
        };
        clock.last_lap_ms = clock.uptime_ms();
        clock
    }

    /// Milliseconds since boot.
    #[cfg(feature = "espidf")]
    pub fn uptime_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1000
    }

    /// Milliseconds since construction.
    #[cfg(not(feature = "espidf"))]
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Milliseconds since the previous lap, saturating at `u32::MAX`.
    pub fn lap_ms(&mut self) -> u32 {
        let now = self.uptime_ms();
        let elapsed = now.saturating_sub(self.last_lap_ms);
        self.last_lap_ms = now;
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }

    /// Leave `ms` out of the next lap. Never moves the lap mark past now.
    pub fn discount_ms(&mut self, ms: u32) {
        self.last_lap_ms = self
            .last_lap_ms
            .saturating_add(u64::from(ms))
            .min(self.uptime_ms());
    }
}
