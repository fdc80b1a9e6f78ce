//! Control loop: the hexagonal core.
//!
//! [`ControlLoop`] owns the script interpreter, the heater PID and the pump
//! governor. All I/O flows through port traits injected at call sites, so
//! the loop is testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                 │        ControlLoop          │
//! ActuatorPort ◀──│  Script · PID · Pump        │ ◀── ResumePort
//!                 └────────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::heater::HeaterDuty;
use crate::control::pid::PidController;
use crate::control::pump::PumpGovernor;
use crate::error::{Result, Vessel};
use crate::script::Script;
use crate::telemetry::{END_TAG, ERROR_TAG, TelemetryData};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, FloatSwitch, PauseDelegate, ResumePort, SensorPort};

/// Where the loop is in a script's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    AwaitingScript,
    Running,
    Completed,
    Failed,
}

/// What happened during one [`ControlLoop::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No script running; nothing was touched.
    Idle,
    Running,
    /// A `PAU` blocked and was released during this tick. Callers timing
    /// ticks should take `paused_ms` off the next lap so the wait is not
    /// charged to the active hold.
    Resumed { paused_ms: u32 },
    /// The script completed or failed during this tick.
    Finished,
}

/// Forces actuators off before handing a `PAU` to the operator.
struct SafePause<'a, H, C> {
    hw: &'a mut H,
    console: &'a mut C,
    pauses: u32,
    paused_ms: u32,
}

impl<H: ActuatorPort, C: EventSink + ResumePort> PauseDelegate for SafePause<'_, H, C> {
    fn on_pause(&mut self) {
        self.hw.all_off();
        self.console.emit(&AppEvent::Paused);
        let waited = self.console.wait_for_resume();
        self.console.emit(&AppEvent::Resumed);
        self.pauses += 1;
        self.paused_ms = self.paused_ms.saturating_add(waited);
    }
}

/// Orchestrates one recipe against the hardware ports.
pub struct ControlLoop {
    config: SystemConfig,
    script: Script,
    pid: PidController,
    pump: PumpGovernor,
    state: RunState,
    last_duty: HeaterDuty,
    last_telemetry: Option<TelemetryData>,
    tick_count: u64,
}

impl ControlLoop {
    pub fn new(config: SystemConfig) -> Self {
        let script = Script::new(config.thermal_model());
        let pid = PidController::new(0.0, config.pid_gains(), config.pid_output_limit());
        let pump = PumpGovernor::new(config.pump_full_timeout_ms);
        let last_duty = HeaterDuty::off(config.heater_period_ms);
        Self {
            config,
            script,
            pid,
            pump,
            state: RunState::AwaitingScript,
            last_duty,
            last_telemetry: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start running `script` from its first statement.
    pub fn load(&mut self, script: Script, sink: &mut impl EventSink) {
        info!(
            "Script loaded: {} statements, mode {}, mash water {} mL",
            script.len(),
            script.mode().name(),
            script.mash_water_volume()
        );
        sink.emit(&AppEvent::ScriptLoaded {
            mode: script.mode(),
            statements: script.len(),
        });
        self.script = script;
        self.pid = PidController::new(0.0, self.config.pid_gains(), self.config.pid_output_limit());
        self.pump = PumpGovernor::new(self.config.pump_full_timeout_ms);
        self.last_duty = HeaterDuty::off(self.config.heater_period_ms);
        self.state = RunState::Running;
    }

    /// Process an external command (serial console, host tooling).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::LoadScript(script) => {
                hw.all_off();
                self.load(script, sink);
            }
            AppCommand::Abort => {
                hw.all_off();
                if self.state == RunState::Running {
                    warn!("Script aborted at statement {}", self.script.active_index());
                    sink.emit(&AppEvent::ScriptAborted);
                }
                self.script.reset();
                self.state = RunState::AwaitingScript;
            }
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: sensors → script → PID → pump → actuators.
    ///
    /// `elapsed_ms` is the wall-clock time since the previous tick. A sensor
    /// fault switches everything off, skips the script and returns the
    /// error; the next tick simply tries again.
    pub fn tick(
        &mut self,
        elapsed_ms: u32,
        hw: &mut (impl SensorPort + ActuatorPort),
        console: &mut (impl EventSink + ResumePort),
    ) -> Result<TickOutcome> {
        if self.state != RunState::Running {
            return Ok(TickOutcome::Idle);
        }
        self.tick_count += 1;

        // 1. Sensors
        let temps = hw
            .read_temperature(Vessel::HotLiquor)
            .and_then(|hlt| Ok((hlt, hw.read_temperature(Vessel::Mash)?)));
        let (hlt_c, mash_c) = match temps {
            Ok(t) => t,
            Err(e) => {
                warn!("Sensor fault on tick {}: {e}", self.tick_count);
                hw.all_off();
                console.emit(&AppEvent::SensorFault(e));
                return Err(e.into());
            }
        };
        let mash_tun_full = hw.read_float_switch(FloatSwitch::MashTun);
        let kettle_full = hw.read_float_switch(FloatSwitch::Kettle);

        // 2. Script
        let mut pause = SafePause {
            hw: &mut *hw,
            console: &mut *console,
            pauses: 0,
            paused_ms: 0,
        };
        let stepped = self.script.step(elapsed_ms, hlt_c, mash_c, &mut pause);
        let (resumed, paused_ms) = (pause.pauses > 0, pause.paused_ms);

        if let Err(e) = stepped {
            hw.all_off();
            self.state = RunState::Failed;
            self.last_duty = HeaterDuty::off(self.config.heater_period_ms);
            self.publish(hlt_c, mash_c, false, mash_tun_full, kettle_full, console);
            console.emit(&AppEvent::ScriptFailed(e));
            return Err(e.into());
        }

        if self.script.completed() {
            hw.all_off();
            self.state = RunState::Completed;
            self.last_duty = HeaterDuty::off(self.config.heater_period_ms);
            self.publish(hlt_c, mash_c, false, mash_tun_full, kettle_full, console);
            console.emit(&AppEvent::ScriptCompleted);
            return Ok(TickOutcome::Finished);
        }

        // 3. Heater PID, rebuilt whenever the target moves
        let duty = match self.script.current_target() {
            Some(target) => {
                if self.pid.setpoint().to_bits() != target.to_bits() {
                    self.pid =
                        PidController::new(target, self.config.pid_gains(), self.config.pid_output_limit());
                }
                let output = self.pid.next_output(hlt_c, elapsed_ms);
                HeaterDuty::from_output(output, self.pid.output_limit(), self.config.heater_period_ms)
            }
            None => HeaterDuty::off(self.config.heater_period_ms),
        };

        // 4. Pump hysteresis
        let pump_on = self.pump.update(elapsed_ms, mash_tun_full);

        // 5. Actuators; the heater window may block for its full period
        self.last_duty = duty;
        self.publish(hlt_c, mash_c, pump_on, mash_tun_full, kettle_full, console);
        hw.set_pump(pump_on);
        hw.set_heater(duty);

        Ok(if resumed {
            TickOutcome::Resumed { paused_ms }
        } else {
            TickOutcome::Running
        })
    }

    fn publish(
        &mut self,
        hlt_c: f32,
        mash_c: f32,
        pump_on: bool,
        mash_tun_full: bool,
        kettle_full: bool,
        sink: &mut impl EventSink,
    ) {
        let tag = match self.state {
            RunState::Failed => ERROR_TAG,
            _ => self
                .script
                .active_statement()
                .map_or(END_TAG, |s| s.command().tag()),
        };
        let telemetry = TelemetryData {
            mode: self.script.mode(),
            tag,
            elapsed_in_interval_ms: self.script.elapsed_in_interval(),
            interval_duration_ms: self.script.interval_duration(),
            hlt_c,
            mash_c,
            setpoint_c: self.script.current_setpoint(),
            target_c: self.script.current_target(),
            heater_on_ms: self.last_duty.on_ms,
            pump_on,
            mash_tun_full,
            kettle_full,
        };
        self.last_telemetry = Some(telemetry);
        sink.emit(&AppEvent::Telemetry(telemetry));
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn pid(&self) -> &PidController {
        &self.pid
    }

    pub fn pump_on(&self) -> bool {
        self.pump.pump_on()
    }

    pub fn last_duty(&self) -> HeaterDuty {
        self.last_duty
    }

    pub fn last_telemetry(&self) -> Option<&TelemetryData> {
        self.last_telemetry.as_ref()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
