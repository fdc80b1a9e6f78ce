//! Serial console adapter: the host's view of the controller.
//!
//! Implements [`EventSink`] and [`ResumePort`] on top of any [`Link`]:
//!
//! - telemetry events become one CSV status line per tick
//! - a pause writes `PAUSED` and blocks until the host sends any byte
//! - script and sensor failures are reported as `ERROR: <message>`
//!
//! While no script runs, [`SerialConsole::poll_script`] services the
//! stop-and-wait load protocol, answering each field with `OK` or
//! `ERROR: <message>`.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, ResumePort};
use crate::error::LinkError;
use crate::protocol::{
    ACK_ERROR_PREFIX, ACK_OK, Link, LoadProgress, PAUSED_LINE, ScriptLoader,
};
use crate::script::Script;

use super::log_sink::LogEventSink;
use super::time::MonotonicClock;

/// How often a paused console polls the link.
const RESUME_POLL_MS: u32 = 10;
/// Bytes pulled from the link per poll.
const READ_CHUNK: usize = 64;

pub struct SerialConsole<L: Link, D: DelayNs> {
    link: L,
    delay: D,
    loader: ScriptLoader,
    log: LogEventSink,
    clock: MonotonicClock,
}

impl<L: Link, D: DelayNs> SerialConsole<L, D> {
    pub fn new(link: L, delay: D, loader: ScriptLoader) -> Self {
        Self {
            link,
            delay,
            loader,
            log: LogEventSink::new(),
            clock: MonotonicClock::new(),
        }
    }

    /// Feed whatever the host has sent into the script loader, acking each
    /// completed field. Returns a script once `END` is accepted.
    pub fn poll_script(&mut self) -> Result<Option<Script>, LinkError> {
        let mut buf = [0u8; READ_CHUNK];
        let n = self.link.read(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }

        let link = &mut self.link;
        let mut loaded = None;
        let mut write_result = Ok(());
        self.loader.feed(&buf[..n], |progress| {
            let written = match progress {
                LoadProgress::Ack => link.write_line(ACK_OK),
                LoadProgress::Done(script) => {
                    loaded = Some(script);
                    link.write_line(ACK_OK)
                }
                LoadProgress::Failed(e) => {
                    let mut line = heapless::String::<64>::new();
                    let _ = write!(line, "{ACK_ERROR_PREFIX}{e}");
                    link.write_line(&line)
                }
            };
            if write_result.is_ok() {
                write_result = written;
            }
        });
        write_result?;
        Ok(loaded)
    }

    pub fn loader(&self) -> &ScriptLoader {
        &self.loader
    }

    pub fn link(&mut self) -> &mut L {
        &mut self.link
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = self.link.write_line(line) {
            warn!("Console write failed: {e}");
        }
    }

    fn write_error(&mut self, message: &dyn core::fmt::Display) {
        let mut line = heapless::String::<96>::new();
        let _ = write!(line, "{ACK_ERROR_PREFIX}{message}");
        self.write_line(&line);
    }

    /// Discard anything the host sent along with the resume byte.
    fn drain_input(&mut self) {
        let mut buf = [0u8; READ_CHUNK];
        while matches!(self.link.read(&mut buf), Ok(n) if n > 0) {}
    }
}

impl<L: Link, D: DelayNs> EventSink for SerialConsole<L, D> {
    fn emit(&mut self, event: &AppEvent) {
        self.log.emit(event);
        match event {
            AppEvent::Telemetry(t) => self.write_line(&t.to_line()),
            AppEvent::Paused => self.write_line(PAUSED_LINE),
            AppEvent::ScriptFailed(e) => self.write_error(e),
            AppEvent::SensorFault(e) => self.write_error(e),
            _ => {}
        }
    }
}

impl<L: Link, D: DelayNs> ResumePort for SerialConsole<L, D> {
    fn wait_for_resume(&mut self) -> u32 {
        let started = self.clock.uptime_ms();
        let mut byte = [0u8; 1];
        loop {
            match self.link.read(&mut byte) {
                Ok(0) => {}
                Ok(_) => break,
                Err(e) => warn!("Console read failed while paused: {e}"),
            }
            self.delay.delay_ms(RESUME_POLL_MS);
        }
        self.drain_input();
        let waited = self.clock.uptime_ms().saturating_sub(started);
        info!("Operator resumed after {} ms", waited);
        u32::try_from(waited).unwrap_or(u32::MAX)
    }
}
