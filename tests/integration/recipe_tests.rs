//! Host-side recipe compilation feeding the device-side loader.

use mashlauter::app::ports::PauseDelegate;
use mashlauter::protocol::{LoadProgress, ScriptLoader, SetpointLimits};
use mashlauter::recipe::{self, RecipeError};
use mashlauter::script::{CommandTag, Script, ThermalModel};

const BREW_DAY: &str = "\
Mash water volume: 15 L
Mashing:
  heat to 66 C
  hold at 66 C for 60 minutes
  hold at 76 C for 10 min
Sparging:
  hold at 76 C for 45 min
";

const MASH_ONLY: &str = "\
Mash water volume: 15 L
Mashing:
  hold at 66 C for 60 minutes
  hold at 76 C for 10 min
";

const LIMITS: SetpointLimits = SetpointLimits {
    min_c: 0.0,
    max_c: 79.0,
};

fn upload(bytes: &[u8]) -> (Vec<LoadProgress>, Option<Script>) {
    let mut loader = ScriptLoader::new(LIMITS, ThermalModel::default());
    let mut progress = Vec::new();
    loader.feed(bytes, |p| progress.push(p));
    let script = progress.iter().find_map(|p| match p {
        LoadProgress::Done(s) => Some(s.clone()),
        _ => None,
    });
    (progress, script)
}

/// Records pauses so the local run can be compared with the upload.
#[derive(Default)]
struct CountingPause(u32);

impl PauseDelegate for CountingPause {
    fn on_pause(&mut self) {
        self.0 += 1;
    }
}

#[test]
fn single_phase_recipe_runs_the_same_locally_and_uploaded() {
    let recipe = recipe::compile(MASH_ONLY).unwrap();
    let wire = recipe.to_setpoint_script().unwrap();
    let (progress, uploaded) = upload(&wire.encode());
    assert_eq!(progress.len(), wire.fields().len());
    let mut uploaded = uploaded.expect("upload completes");
    let mut local = recipe.to_script(ThermalModel::default());

    // The local run pauses once for the phase change; on the device the
    // upload itself is the go signal.
    let mut pauses = CountingPause::default();
    local.step(1000, 20.0, 20.0, &mut pauses).unwrap();
    uploaded.step(1000, 20.0, 20.0, &mut CountingPause::default()).unwrap();
    assert_eq!(pauses.0, 1);

    assert_eq!(uploaded.mode(), local.mode());
    assert_eq!(uploaded.mash_water_volume(), local.mash_water_volume());
    assert_eq!(uploaded.current_target(), local.current_target());
    assert_eq!(uploaded.current_target(), Some(79.0), "ramp-up applies on both");
    assert_eq!(uploaded.elapsed_in_interval(), local.elapsed_in_interval());
    assert_eq!(uploaded.interval_duration(), 3_600_000);

    let holds = |s: &Script| -> Vec<(Option<f32>, Option<u32>)> {
        s.statements()
            .iter()
            .filter(|st| st.command() == CommandTag::Hold)
            .map(|st| (st.setpoint(), st.duration_ms()))
            .collect()
    };
    assert_eq!(holds(&uploaded), holds(&local));
    assert_eq!(uploaded.len(), 2);
}

#[test]
fn multi_phase_recipe_is_refused_for_upload() {
    let err = recipe::compile(BREW_DAY)
        .unwrap()
        .to_setpoint_script()
        .unwrap_err();
    assert_eq!(
        err,
        RecipeError::NotTransmittable {
            statement: 4,
            command: CommandTag::Heat,
        }
    );
    assert_eq!(
        err.to_string(),
        "Statement 4 of recipe (HEA) cannot be sent to the controller."
    );

    let mash_then_sparge = "\
Mash water volume: 15 L
Mashing:
  hold at 66 C for 60 minutes
Sparging:
  hold at 76 C for 45 min
";
    assert_eq!(
        recipe::compile(mash_then_sparge).unwrap().to_setpoint_script(),
        Err(RecipeError::NotTransmittable {
            statement: 5,
            command: CommandTag::Sparge,
        })
    );
}

#[test]
fn recipe_too_hot_for_the_device_is_refused_on_upload() {
    let wire = recipe::compile("mashing\nhold at 180 F for 5 min")
        .unwrap()
        .to_setpoint_script()
        .unwrap();
    let (progress, script) = upload(&wire.encode());
    assert!(script.is_none());
    assert!(matches!(progress.last(), Some(LoadProgress::Failed(_))));
}

#[test]
fn local_script_keeps_pauses_and_heats() {
    let script = recipe::compile(BREW_DAY)
        .unwrap()
        .to_script(ThermalModel::default());
    let tags: Vec<CommandTag> = script.statements().iter().map(|s| s.command()).collect();
    assert_eq!(tags.len(), 9);
    assert_eq!(tags.iter().filter(|t| **t == CommandTag::Pause).count(), 2);
    assert_eq!(tags[3], CommandTag::Heat);
}

#[test]
fn errors_point_at_the_offending_line() {
    let cases: &[(&str, usize)] = &[
        ("mashing\nheat to 66 C\nboil for 60 min", 3),
        ("mashing\nhold at 66 C for\n60 parsecs", 3),
        ("heat to 66\nC\nhold for 5 min", 3),
    ];
    for &(source, expected) in cases {
        let err = recipe::compile(source).unwrap_err();
        let line = match err {
            RecipeError::UnexpectedText { line, .. }
            | RecipeError::UnexpectedToken { line, .. }
            | RecipeError::ValueOutOfRange { line, .. }
            | RecipeError::TooManyStatements { line } => line,
            RecipeError::UnexpectedEnd
            | RecipeError::NotTransmittable { .. }
            | RecipeError::MissingMode => 0,
        };
        assert_eq!(line, expected, "{source:?} → {err}");
    }
}

#[test]
fn unfinished_recipe_is_unexpected_end() {
    let err = recipe::compile("mashing\nhold at 66 C for").unwrap_err();
    assert_eq!(err, RecipeError::UnexpectedEnd);
    assert_eq!(err.to_string(), "Unexpected end of file.");
}

#[test]
fn empty_recipe_compiles_to_empty_script() {
    let recipe = recipe::compile("  \n\n").unwrap();
    assert!(recipe.statements().is_empty());
    assert!(recipe.to_script(ThermalModel::default()).completed());
}
