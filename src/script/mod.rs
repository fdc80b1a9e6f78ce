//! Recipe script interpreter.
//!
//! A [`Script`] is an ordered, fixed-capacity list of [`Statement`]s plus a
//! cursor. Every control tick the owner calls [`Script::step`] with the
//! elapsed wall-clock time and the latest HLT / mash tun temperatures.
//!
//! ```text
//!  INI ─┐
//!  MSH ─┤ instant: applied and skipped within the same step
//!  MWV ─┤
//!  PAU ─┘ (blocks in the pause delegate first)
//!  HEA ── waits until the HLT reaches the target
//!  HLD ── waits until the interval counter reaches its duration
//! ```
//!
//! Instant statements cascade: the cursor keeps moving until it lands on a
//! `HEA`/`HLD`. Exactly one `HEA`/`HLD` is evaluated per step, so elapsed
//! time is charged once. If that statement finishes, the cascade continues
//! through any following instant statements and stops in front of the next
//! timed one, which is evaluated on the next step.

pub mod statement;
pub mod target;

use heapless::Vec;
use log::{debug, error, info};

use crate::app::ports::PauseDelegate;
use crate::error::ScriptError;
pub use statement::{CommandTag, Payload, Statement, Tag};
pub use target::ThermalModel;

/// Maximum statements per script.
pub const SCRIPT_CAPACITY: usize = 32;

/// Brewing phase selected by the mode statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Initializing,
    Mashing,
    Sparging,
}

impl Mode {
    /// Token used on the telemetry line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Initializing => "INITIALIZING",
            Self::Mashing => "MASHING",
            Self::Sparging => "SPARGING",
        }
    }
}

/// Interpreter state for one loaded recipe.
#[derive(Debug, Clone)]
pub struct Script {
    statements: Vec<Statement, SCRIPT_CAPACITY>,
    /// Cursor; `== statements.len()` once finished.
    active_index: usize,
    /// Milliseconds accumulated on the active `HLD`.
    elapsed_in_interval: u32,
    mode: Mode,
    mash_water_ml: u32,
    current_target: Option<f32>,
    /// Latched the first time the HLT reaches the inflated ramp-up target.
    ramp_up_complete: bool,
    failure: Option<Tag>,
    model: ThermalModel,
}

impl Script {
    pub fn new(model: ThermalModel) -> Self {
        Self {
            statements: Vec::new(),
            active_index: 0,
            elapsed_in_interval: 0,
            mode: Mode::Initializing,
            mash_water_ml: 0,
            current_target: None,
            ramp_up_complete: false,
            failure: None,
            model,
        }
    }

    /// Build a script from a statement list. Statements past capacity are dropped.
    pub fn from_statements(
        model: ThermalModel,
        statements: impl IntoIterator<Item = Statement>,
    ) -> Self {
        let mut script = Self::new(model);
        for stmt in statements {
            script.add_statement(stmt);
        }
        script
    }

    /// Back to an empty, freshly constructed interpreter.
    pub fn reset(&mut self) {
        *self = Self::new(self.model);
    }

    /// Append a statement. A full script ignores the call; check
    /// [`is_full`](Self::is_full) first when that matters.
    pub fn add_statement(&mut self, stmt: Statement) {
        let _ = self.statements.push(stmt);
    }

    pub fn is_full(&self) -> bool {
        self.statements.is_full()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn set_mash_water_volume(&mut self, ml: u32) {
        self.mash_water_ml = ml;
    }

    pub fn completed(&self) -> bool {
        self.active_index >= self.statements.len()
    }

    /// Tag that aborted the script, if any.
    pub fn failure(&self) -> Option<Tag> {
        self.failure
    }

    /// Advance the state machine by one tick.
    ///
    /// `hlt_temp` is the heated vessel, `mash_temp` the mash tun. An
    /// unrecognised command finishes the script and is returned as an error.
    pub fn step(
        &mut self,
        elapsed_ms: u32,
        hlt_temp: f32,
        mash_temp: f32,
        pause: &mut impl PauseDelegate,
    ) -> Result<(), ScriptError> {
        let mut timed_evaluated = false;

        // Each pass either returns or moves the cursor, so len + 1 passes
        // always suffice.
        for _ in 0..=SCRIPT_CAPACITY {
            let Some(stmt) = self.active_statement().copied() else {
                return Ok(());
            };

            match stmt.command() {
                CommandTag::Initialize => self.mode = Mode::Initializing,
                CommandTag::Mash => self.mode = Mode::Mashing,
                CommandTag::Sparge => self.mode = Mode::Sparging,
                CommandTag::MashWaterVolume => {
                    self.mash_water_ml = stmt.volume_ml().unwrap_or(0);
                }
                CommandTag::Pause => {
                    info!("Script paused at statement {}", self.active_index);
                    pause.on_pause();
                    info!("Script resumed");
                }
                CommandTag::Heat => {
                    let setpoint = stmt.setpoint().unwrap_or_default();
                    let target = self.refresh_target(setpoint, hlt_temp, mash_temp);
                    if timed_evaluated {
                        return Ok(());
                    }
                    timed_evaluated = true;
                    if hlt_temp < target {
                        return Ok(());
                    }
                    debug!("HEA: {hlt_temp:.2} reached target {target:.2}");
                }
                CommandTag::Hold => {
                    let setpoint = stmt.setpoint().unwrap_or_default();
                    self.refresh_target(setpoint, hlt_temp, mash_temp);
                    if timed_evaluated {
                        return Ok(());
                    }
                    timed_evaluated = true;
                    self.elapsed_in_interval = self.elapsed_in_interval.saturating_add(elapsed_ms);
                    if self.elapsed_in_interval < stmt.duration_ms().unwrap_or(0) {
                        return Ok(());
                    }
                    self.elapsed_in_interval = 0;
                }
                CommandTag::Unrecognized(tag) => {
                    error!("Unknown script command \"{tag}\", aborting script");
                    self.failure = Some(tag);
                    self.active_index = self.statements.len();
                    return Err(ScriptError::UnknownCommand(tag));
                }
            }

            self.active_index += 1;
            if self.completed() {
                info!("Script completed");
            }
        }

        Ok(())
    }

    fn refresh_target(&mut self, setpoint: f32, hlt_temp: f32, mash_temp: f32) -> f32 {
        let target = match self.mode {
            Mode::Mashing if self.mash_water_ml > 0 => {
                if self.ramp_up_complete {
                    self.model
                        .offset_target(setpoint, self.mash_water_ml, mash_temp)
                } else {
                    let target = self
                        .model
                        .ramp_up_target(setpoint, self.mash_water_ml, hlt_temp);
                    if hlt_temp >= target {
                        info!("Ramp-up complete at {hlt_temp:.2} (target {target:.2})");
                        self.ramp_up_complete = true;
                    }
                    target
                }
            }
            _ => self.model.clamp(setpoint),
        };
        self.current_target = Some(target);
        target
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn active_statement(&self) -> Option<&Statement> {
        self.statements.get(self.active_index)
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mash_water_volume(&self) -> u32 {
        self.mash_water_ml
    }

    /// Setpoint requested by the active statement, before compensation.
    pub fn current_setpoint(&self) -> Option<f32> {
        self.active_statement().and_then(Statement::setpoint)
    }

    /// Last computed (clamped) control target.
    pub fn current_target(&self) -> Option<f32> {
        self.current_target
    }

    pub fn elapsed_in_interval(&self) -> u32 {
        self.elapsed_in_interval
    }

    /// Duration of the active `HLD`, zero for anything else.
    pub fn interval_duration(&self) -> u32 {
        self.active_statement()
            .filter(|s| s.command() == CommandTag::Hold)
            .and_then(Statement::duration_ms)
            .unwrap_or(0)
    }

    pub fn ramp_up_complete(&self) -> bool {
        self.ramp_up_complete
    }

    pub fn thermal_model(&self) -> &ThermalModel {
        &self.model
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new(ThermalModel::default())
    }
}
