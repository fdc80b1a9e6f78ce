//! Fuzz target: `ScriptLoader::feed`
//!
//! Drives arbitrary byte sequences into the load decoder, then runs any
//! script it accepts for a few ticks. Neither may panic, accepted scripts
//! must fit the interpreter and a failure must leave the decoder idle.
//!
//! cargo fuzz run fuzz_script_loader

#![no_main]

use libfuzzer_sys::fuzz_target;
use mashlauter::app::ports::PauseDelegate;
use mashlauter::protocol::{LoadProgress, ScriptLoader, SetpointLimits};
use mashlauter::script::{SCRIPT_CAPACITY, ThermalModel};

struct NoPause;

impl PauseDelegate for NoPause {
    fn on_pause(&mut self) {}
}

fuzz_target!(|data: &[u8]| {
    let limits = SetpointLimits {
        min_c: 0.0,
        max_c: 79.0,
    };
    let mut loader = ScriptLoader::new(limits, ThermalModel::default());

    // Split on the first byte so partial fields are exercised too.
    let split = data.first().map_or(0, |&b| usize::from(b)).min(data.len());
    for chunk in [&data[..split], &data[split..]] {
        let mut scripts = Vec::new();
        let mut failed = false;
        loader.feed(chunk, |progress| match progress {
            LoadProgress::Done(script) => scripts.push(script),
            LoadProgress::Failed(_) => failed = true,
            LoadProgress::Ack => {}
        });
        if failed {
            assert!(!loader.in_progress(), "failure must reset the decoder");
        }
        for mut script in scripts {
            assert!(script.len() <= SCRIPT_CAPACITY);
            for _ in 0..4 {
                let _ = script.step(1000, 20.0, 20.0, &mut NoPause);
                if let Some(target) = script.current_target() {
                    assert!(target <= 79.0);
                }
            }
        }
    }
});
