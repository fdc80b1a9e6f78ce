//! Serial console tests: script upload over a byte link, then a running
//! loop reporting back on the same link.

use mashlauter::app::control_loop::{ControlLoop, TickOutcome};
use mashlauter::adapters::serial_console::SerialConsole;
use mashlauter::config::SystemConfig;
use mashlauter::protocol::{ScriptLoader, SetpointLimits, SetpointScript};
use mashlauter::recipe;
use mashlauter::script::Mode;

use crate::mock_hw::{MemoryLink, MockHardware, NoDelay};

fn console() -> SerialConsole<MemoryLink, NoDelay> {
    let config = SystemConfig::default();
    let loader = ScriptLoader::new(
        SetpointLimits {
            min_c: config.min_setpoint_c,
            max_c: config.max_setpoint_c,
        },
        config.thermal_model(),
    );
    SerialConsole::new(MemoryLink::default(), NoDelay, loader)
}

fn single_mash_step() -> SetpointScript {
    SetpointScript {
        mode: Mode::Mashing,
        mash_water_ml: 0,
        setpoints: vec![(65.0, 60_000)],
    }
}

#[test]
fn stop_and_wait_upload_then_first_tick() {
    let mut c = console();

    let fields = single_mash_step().fields();
    let last = fields.len() - 1;
    let mut script = None;
    for (i, field) in fields.iter().enumerate() {
        c.link().rx.extend(field.iter().copied());
        let loaded = c.poll_script().unwrap();
        assert_eq!(loaded.is_some(), i == last, "field {i}");
        assert_eq!(c.link().lines().len(), i + 1, "one ack per field");
        script = script.or(loaded);
    }
    assert!(c.link().lines().iter().all(|l| l == "OK"));
    assert!(!c.loader().in_progress());

    let script = script.expect("END completes the upload");
    assert_eq!(script.len(), 1);
    assert_eq!(script.mode(), Mode::Mashing);

    let mut ctl = ControlLoop::new(SystemConfig::default());
    let mut hw = MockHardware::new(20.0, 20.0);
    ctl.load(script, &mut c);
    c.link().tx.clear();

    assert_eq!(
        ctl.tick(1000, &mut hw, &mut c).unwrap(),
        TickOutcome::Running
    );
    assert_eq!(ctl.script().current_target(), Some(65.0));
    assert_eq!(ctl.script().interval_duration(), 60_000);
    assert_eq!(
        c.link().lines(),
        vec!["MASHING,HLD,1000,60000,20.00,20.00,65.00,65.00,1000,OFF,1,0"]
    );
}

#[test]
fn whole_upload_in_one_burst() {
    let mut c = console();
    c.link().rx.extend(single_mash_step().encode());
    let script = c.poll_script().unwrap().expect("script");
    assert_eq!(script.statements()[0].setpoint(), Some(65.0));
    assert_eq!(c.link().lines(), vec!["OK"; 7]);
}

#[test]
fn rejected_setpoint_reports_and_upload_can_restart() {
    let mut c = console();
    let hot = SetpointScript {
        setpoints: vec![(80.0, 60_000)],
        ..single_mash_step()
    };
    c.link().rx.extend(hot.encode());
    assert!(c.poll_script().unwrap().is_none());
    assert_eq!(
        c.link().lines(),
        vec!["OK", "OK", "OK", "OK", "ERROR: temperature out of range"]
    );
    assert!(c.link().rx.is_empty(), "rest of the chunk was read");
    assert!(!c.loader().in_progress());

    c.link().tx.clear();
    c.link().rx.extend(single_mash_step().encode());
    assert!(c.poll_script().unwrap().is_some());
}

#[test]
fn garbage_before_begin_is_an_error_line() {
    let mut c = console();
    c.link().rx.extend(*b"XYZBEG");
    assert!(c.poll_script().unwrap().is_none());
    assert_eq!(c.link().lines(), vec!["ERROR: expected BEG"]);
}

#[test]
fn pause_is_announced_and_released_over_the_link() {
    let config = SystemConfig::default();
    let script = recipe::compile("sparging\nhold at 76 C for 10 min")
        .unwrap()
        .to_script(config.thermal_model());
    let mut c = console();
    let mut ctl = ControlLoop::new(config);
    let mut hw = MockHardware::new(70.0, 68.0);
    ctl.load(script, &mut c);

    c.link().rx.extend(*b"\r\n");
    assert!(matches!(
        ctl.tick(1000, &mut hw, &mut c).unwrap(),
        TickOutcome::Resumed { .. }
    ));
    let lines = c.link().lines();
    assert_eq!(lines[0], "PAUSED");
    assert!(lines[1].starts_with("SPARGING,HLD,1000,600000,70.00,68.00,76.00,76.00,"));
    assert!(c.link().rx.is_empty(), "resume input is drained");
}

#[test]
fn sensor_fault_is_reported_as_error_line() {
    let config = SystemConfig::default();
    let script = recipe::compile("hold at 60 C for 1 min")
        .unwrap()
        .to_script(config.thermal_model());
    let mut c = console();
    let mut ctl = ControlLoop::new(config);
    let mut hw = MockHardware::new(20.0, 20.0);
    hw.scripted_hlt.push_back(None);
    ctl.load(script, &mut c);

    assert!(ctl.tick(1000, &mut hw, &mut c).is_err());
    assert_eq!(
        c.link().lines(),
        vec!["ERROR: HLT thermocouple disconnected"]
    );
}
