//! Status line sent to the host once per control tick.
//!
//! ```text
//! MODE,TAG,ELAPSED,DURATION,T1,T2,SETPOINT,TARGET,DUTY,PUMP,SW1,SW2
//! MASHING,HLD,12000,3600000,66.25,64.50,66.00,67.42,350,ON,0,1
//! ```

use core::fmt::{self, Write};

use crate::script::{Mode, Tag};

/// Reported in the `TAG` column once the cursor is past the last statement.
pub const END_TAG: Tag = Tag::new(*b"END");
/// Reported in the `TAG` column after a fatal statement.
pub const ERROR_TAG: Tag = Tag::new(*b"ERR");

/// Longest line [`TelemetryData::to_line`] produces, with headroom.
pub const LINE_CAPACITY: usize = 128;

/// One tick worth of controller state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub mode: Mode,
    pub tag: Tag,
    pub elapsed_in_interval_ms: u32,
    pub interval_duration_ms: u32,
    pub hlt_c: f32,
    pub mash_c: f32,
    pub setpoint_c: Option<f32>,
    pub target_c: Option<f32>,
    pub heater_on_ms: u32,
    pub pump_on: bool,
    pub mash_tun_full: bool,
    pub kettle_full: bool,
}

struct Celsius(Option<f32>);

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) if v.is_finite() => write!(f, "{v:.2}"),
            _ => f.write_str("N/A"),
        }
    }
}

impl fmt::Display for TelemetryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            self.mode.name(),
            self.tag,
            self.elapsed_in_interval_ms,
            self.interval_duration_ms,
            Celsius(Some(self.hlt_c)),
            Celsius(Some(self.mash_c)),
            Celsius(self.setpoint_c),
            Celsius(self.target_c),
            self.heater_on_ms,
            if self.pump_on { "ON" } else { "OFF" },
            u8::from(self.mash_tun_full),
            u8::from(self.kettle_full),
        )
    }
}

impl TelemetryData {
    /// Render into a fixed buffer; lines that do not fit are truncated.
    pub fn to_line(&self) -> heapless::String<LINE_CAPACITY> {
        let mut line = heapless::String::new();
        let _ = write!(line, "{self}");
        line
    }
}
