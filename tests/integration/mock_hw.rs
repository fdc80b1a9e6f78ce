//! Mock hardware and console adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO. Sensor readings come from a
//! simple thermal model or from a scripted queue.

use std::collections::VecDeque;

use mashlauter::app::events::AppEvent;
use mashlauter::app::ports::{ActuatorPort, EventSink, FloatSwitch, ResumePort, SensorPort};
use mashlauter::control::heater::HeaterDuty;
use mashlauter::error::{LinkError, SensorError, Vessel};
use mashlauter::protocol::Link;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    SetHeater(HeaterDuty),
    SetPump(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

/// Heats the HLT in proportion to the heater duty; the mash tun follows
/// the HLT a little behind.
pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub hlt_c: f32,
    pub mash_c: f32,
    /// Degrees gained per fully-on heater window.
    pub heat_rate_c: f32,
    pub mash_tun_full: bool,
    pub kettle_full: bool,
    /// Readings served before the model takes over (`None` = disconnected).
    pub scripted_hlt: VecDeque<Option<f32>>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(hlt_c: f32, mash_c: f32) -> Self {
        Self {
            calls: Vec::new(),
            hlt_c,
            mash_c,
            heat_rate_c: 0.5,
            mash_tun_full: true,
            kettle_full: false,
            scripted_hlt: VecDeque::new(),
        }
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    pub fn heater_windows(&self) -> impl Iterator<Item = &HeaterDuty> {
        self.calls.iter().filter_map(|c| match c {
            ActuatorCall::SetHeater(d) => Some(d),
            _ => None,
        })
    }

    pub fn pump_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetPump(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                ActuatorCall::SetHeater(_) => None,
            })
            .unwrap_or(false)
    }

    pub fn count(&self, call: &ActuatorCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl SensorPort for MockHardware {
    fn read_temperature(&mut self, vessel: Vessel) -> Result<f32, SensorError> {
        match vessel {
            Vessel::HotLiquor => match self.scripted_hlt.pop_front() {
                Some(Some(c)) => Ok(c),
                Some(None) => Err(SensorError::Disconnected(vessel)),
                None => Ok(self.hlt_c),
            },
            Vessel::Mash => Ok(self.mash_c),
        }
    }

    fn read_float_switch(&mut self, switch: FloatSwitch) -> bool {
        match switch {
            FloatSwitch::MashTun => self.mash_tun_full,
            FloatSwitch::Kettle => self.kettle_full,
        }
    }
}

impl ActuatorPort for MockHardware {
    fn set_heater(&mut self, duty: HeaterDuty) {
        self.hlt_c += self.heat_rate_c * duty.fraction();
        self.mash_c += (self.hlt_c - self.mash_c) * 0.1;
        self.calls.push(ActuatorCall::SetHeater(duty));
    }

    fn set_pump(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetPump(on));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── RecordingConsole ──────────────────────────────────────────

/// Event sink plus resume port that never blocks.
#[derive(Default)]
pub struct RecordingConsole {
    pub events: Vec<AppEvent>,
    pub resumes: u32,
    /// Wait reported by every resume.
    pub pause_ms: u32,
}

#[allow(dead_code)]
impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn telemetry_lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Telemetry(t) => Some(t.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingConsole {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

impl ResumePort for RecordingConsole {
    fn wait_for_resume(&mut self) -> u32 {
        self.resumes += 1;
        self.pause_ms
    }
}

// ── MemoryLink ────────────────────────────────────────────────

/// In-memory duplex byte pipe.
#[derive(Default)]
pub struct MemoryLink {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

#[allow(dead_code)]
impl MemoryLink {
    pub fn with_input(bytes: &[u8]) -> Self {
        Self {
            rx: bytes.iter().copied().collect(),
            tx: Vec::new(),
        }
    }

    /// Everything written so far, split into lines.
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.tx)
            .split("\r\n")
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

impl Link for MemoryLink {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let n = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, LinkError> {
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), LinkError> {
        Ok(())
    }
}

/// Delay that returns immediately.
pub struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
