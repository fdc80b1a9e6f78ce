//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production). The
//! serial console adapter forwards every event here as well.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | mode={} step={} | {}/{} ms | HLT={:.2}\u{00b0}C mash={:.2}\u{00b0}C | \
                     target={:?} | heater={}ms pump={} | bobbers={}/{}",
                    t.mode.name(),
                    t.tag,
                    t.elapsed_in_interval_ms,
                    t.interval_duration_ms,
                    t.hlt_c,
                    t.mash_c,
                    t.target_c,
                    t.heater_on_ms,
                    if t.pump_on { "ON" } else { "OFF" },
                    u8::from(t.mash_tun_full),
                    u8::from(t.kettle_full),
                );
            }
            AppEvent::ScriptLoaded { mode, statements } => {
                info!("SCRIPT | loaded {} statements, mode={}", statements, mode.name());
            }
            AppEvent::ScriptCompleted => {
                info!("SCRIPT | completed");
            }
            AppEvent::ScriptFailed(e) => {
                error!("SCRIPT | failed: {}", e);
            }
            AppEvent::ScriptAborted => {
                warn!("SCRIPT | aborted");
            }
            AppEvent::SensorFault(e) => {
                warn!("FAULT | {}", e);
            }
            AppEvent::Paused => {
                info!("PAUSE | waiting for operator");
            }
            AppEvent::Resumed => {
                info!("PAUSE | resumed");
            }
        }
    }
}
