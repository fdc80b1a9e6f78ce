//! Integration tests for the ControlLoop → Script → PID → actuators
//! pipeline, driven by the mock thermal model.

use mashlauter::app::commands::AppCommand;
use mashlauter::app::control_loop::{ControlLoop, RunState, TickOutcome};
use mashlauter::app::events::AppEvent;
use mashlauter::config::SystemConfig;
use mashlauter::error::{Error, ScriptError, SensorError, Vessel};
use mashlauter::recipe;
use mashlauter::script::{Script, Statement, Tag};

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingConsole};

const TICK_MS: u32 = 1000;

fn start(recipe_text: &str) -> (ControlLoop, MockHardware, RecordingConsole) {
    let config = SystemConfig::default();
    let script = recipe::compile(recipe_text)
        .expect("recipe compiles")
        .to_script(config.thermal_model());
    let mut ctl = ControlLoop::new(config);
    let hw = MockHardware::new(20.0, 20.0);
    let mut console = RecordingConsole::new();
    ctl.load(script, &mut console);
    (ctl, hw, console)
}

fn run_to_end(ctl: &mut ControlLoop, hw: &mut MockHardware, console: &mut RecordingConsole) -> u32 {
    let mut ticks = 0;
    while ctl.is_running() && ticks < 2_000 {
        let _ = ctl.tick(TICK_MS, hw, console);
        ticks += 1;
    }
    ticks
}

// ── Full runs ─────────────────────────────────────────────────

#[test]
fn heat_then_hold_runs_to_completion() {
    let (mut ctl, mut hw, mut console) = start("mashing\nheat to 30 C\nhold at 30 C for 5 s");
    let ticks = run_to_end(&mut ctl, &mut hw, &mut console);

    assert_eq!(ctl.state(), RunState::Completed);
    assert!(ticks > 20, "HLT needs ~20 full windows to gain 10 degrees, took {ticks}");
    assert!(hw.hlt_c >= 30.0);
    assert_eq!(hw.last_call(), Some(&ActuatorCall::AllOff));
    assert_eq!(console.resumes, 1, "MASHING inserts one pause");
    assert_eq!(console.count(|e| matches!(e, AppEvent::ScriptCompleted)), 1);

    let lines = console.telemetry_lines();
    assert!(lines.iter().all(|l| l.starts_with("MASHING,")));
    assert!(lines.last().is_some_and(|l| l.starts_with("MASHING,END,")));
    assert!(lines.iter().any(|l| l.starts_with("MASHING,HEA,0,0,")));
    assert!(lines.iter().any(|l| l.starts_with("MASHING,HLD,")));
}

#[test]
fn hold_is_charged_elapsed_time_exactly_once_per_tick() {
    let (mut ctl, mut hw, mut console) = start("hold at 10 C for 3500 ms");
    hw.hlt_c = 50.0;

    for expected in [1000, 2000, 3000] {
        assert_eq!(
            ctl.tick(TICK_MS, &mut hw, &mut console).unwrap(),
            TickOutcome::Running
        );
        assert_eq!(ctl.script().elapsed_in_interval(), expected);
        assert_eq!(ctl.script().interval_duration(), 3500);
    }
    assert_eq!(
        ctl.tick(TICK_MS, &mut hw, &mut console).unwrap(),
        TickOutcome::Finished
    );
}

#[test]
fn ramp_up_latches_and_target_never_exceeds_ceiling() {
    let (mut ctl, mut hw, mut console) =
        start("mash water volume 16 L\nmashing\nhold at 66 C for 2 h");
    hw.heat_rate_c = 0.0;

    // dilution 0.5: ramp-up target = 66 + 0.5 * (66 - hlt)
    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert_eq!(ctl.script().current_target(), Some(79.0), "cold start is clamped");
    assert!(!ctl.script().ramp_up_complete());

    hw.hlt_c = 50.0;
    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert_eq!(ctl.script().current_target(), Some(74.0));
    assert!(!ctl.script().ramp_up_complete());

    hw.hlt_c = 66.0;
    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert!(ctl.script().ramp_up_complete());

    // Latched: the mash tun now drives the target and the HLT cooling back
    // down never re-arms the ramp.
    hw.hlt_c = 40.0;
    hw.mash_c = 60.0;
    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert!(ctl.script().ramp_up_complete());
    assert_eq!(ctl.script().current_target(), Some(70.0));

    let targets: Vec<f32> = console
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(t) => t.target_c,
            _ => None,
        })
        .collect();
    assert_eq!(targets.len(), 4);
    assert!(targets.iter().all(|&t| t <= 79.0));
}

#[test]
fn heater_duty_drops_once_target_is_reached() {
    let (mut ctl, mut hw, mut console) = start("hold at 40 C for 1 h");
    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert_eq!(hw.heater_windows().last().map(|d| d.on_ms), Some(1000));

    hw.hlt_c = 41.0;
    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert_eq!(hw.heater_windows().last().map(|d| d.on_ms), Some(0));
}

// ── Faults ────────────────────────────────────────────────────

#[test]
fn sensor_fault_forces_safe_state_and_recovers() {
    let (mut ctl, mut hw, mut console) = start("hold at 60 C for 10 s");
    hw.scripted_hlt.extend([Some(20.0), None]);

    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert_eq!(ctl.script().elapsed_in_interval(), 1000);

    let err = ctl.tick(TICK_MS, &mut hw, &mut console).unwrap_err();
    assert_eq!(
        err,
        Error::Sensor(SensorError::Disconnected(Vessel::HotLiquor))
    );
    assert_eq!(hw.last_call(), Some(&ActuatorCall::AllOff));
    assert_eq!(ctl.script().elapsed_in_interval(), 1000, "script not advanced");
    assert_eq!(
        console.count(|e| matches!(e, AppEvent::SensorFault(_))),
        1
    );

    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert_eq!(ctl.script().elapsed_in_interval(), 2000);
    assert!(ctl.is_running());
}

#[test]
fn unknown_command_aborts_and_reports_tag() {
    let config = SystemConfig::default();
    let bad = Tag::new(*b"BOI");
    let script = Script::from_statements(
        config.thermal_model(),
        [Statement::mash(), Statement::unrecognized(bad), Statement::heat(60.0)],
    );
    let mut ctl = ControlLoop::new(config);
    let mut hw = MockHardware::new(20.0, 20.0);
    let mut console = RecordingConsole::new();
    ctl.load(script, &mut console);

    let err = ctl.tick(TICK_MS, &mut hw, &mut console).unwrap_err();
    assert_eq!(err, Error::Script(ScriptError::UnknownCommand(bad)));
    assert_eq!(err.to_string(), "script: unknown command \"BOI\"");
    assert_eq!(ctl.state(), RunState::Failed);
    assert_eq!(ctl.script().failure(), Some(bad));
    assert!(ctl.script().completed());
    assert_eq!(hw.count(&ActuatorCall::AllOff), 1);
    assert!(hw.heater_windows().next().is_none());
    assert!(console
        .telemetry_lines()
        .last()
        .is_some_and(|l| l.starts_with("MASHING,ERR,")));

    assert_eq!(
        ctl.tick(TICK_MS, &mut hw, &mut console).unwrap(),
        TickOutcome::Idle
    );
}

// ── Pause ─────────────────────────────────────────────────────

#[test]
fn abort_switches_everything_off() {
    let (mut ctl, mut hw, mut console) = start("hold at 60 C for 1 h\npause");
    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert_eq!(hw.heater_windows().count(), 1);

    assert_eq!(ctl.script().active_index(), 0);
    assert_eq!(console.resumes, 0, "the pause has not been reached yet");

    ctl.handle_command(AppCommand::Abort, &mut hw, &mut console);
    assert_eq!(ctl.state(), RunState::AwaitingScript);
    assert_eq!(hw.last_call(), Some(&ActuatorCall::AllOff));
    assert_eq!(console.count(|e| matches!(e, AppEvent::ScriptAborted)), 1);
    assert_eq!(
        ctl.tick(TICK_MS, &mut hw, &mut console).unwrap(),
        TickOutcome::Idle
    );
}

#[test]
fn sparging_pause_reports_resumed_outcome() {
    let (mut ctl, mut hw, mut console) = start("sparging\nhold at 76 C for 1 h");
    console.pause_ms = 45_000;
    let outcome = ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert_eq!(outcome, TickOutcome::Resumed { paused_ms: 45_000 });
    assert_eq!(console.resumes, 1);

    let paused = console
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::Paused))
        .expect("paused event");
    let resumed = console
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::Resumed))
        .expect("resumed event");
    assert!(paused < resumed);
    // Actuators were switched off before the operator was asked.
    assert_eq!(hw.calls.first(), Some(&ActuatorCall::AllOff));
    assert!(console.telemetry_lines()[0].starts_with("SPARGING,HLD,"));
}

// ── Pump ──────────────────────────────────────────────────────

#[test]
fn pump_refills_mash_tun_with_hysteresis() {
    let (mut ctl, mut hw, mut console) = start("hold at 30 C for 1 h");
    hw.hlt_c = 30.0;

    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert!(!hw.pump_on(), "full at start keeps the pump off");

    hw.mash_tun_full = false;
    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert!(hw.pump_on());

    hw.mash_tun_full = true;
    for _ in 0..4 {
        ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
        assert!(hw.pump_on(), "bobber must read full for the whole timeout");
    }
    ctl.tick(TICK_MS, &mut hw, &mut console).unwrap();
    assert!(!hw.pump_on());
}

// ── Reload ────────────────────────────────────────────────────

#[test]
fn new_script_can_follow_a_completed_one() {
    let (mut ctl, mut hw, mut console) = start("hold at 10 C for 1 s");
    hw.hlt_c = 20.0;
    run_to_end(&mut ctl, &mut hw, &mut console);
    assert_eq!(ctl.state(), RunState::Completed);

    let next = recipe::compile("hold at 10 C for 2 s")
        .unwrap()
        .to_script(ctl.config().thermal_model());
    ctl.handle_command(AppCommand::LoadScript(next), &mut hw, &mut console);
    assert!(ctl.is_running());
    assert_eq!(ctl.script().active_index(), 0);
    assert_eq!(
        console.count(|e| matches!(e, AppEvent::ScriptLoaded { .. })),
        2
    );
}
