//! Fuzz target: `recipe::compile`
//!
//! Arbitrary UTF-8 must compile or fail with an error naming a line that
//! exists in the input.
//!
//! cargo fuzz run fuzz_recipe_compiler

#![no_main]

use libfuzzer_sys::fuzz_target;
use mashlauter::recipe::{self, RecipeError};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = core::str::from_utf8(data) else {
        return;
    };
    match recipe::compile(source) {
        Ok(compiled) => {
            if let Ok(wire) = compiled.to_setpoint_script() {
                assert!(wire.setpoints.len() <= compiled.statements().len());
            }
            let _ = compiled.to_string();
        }
        Err(
            RecipeError::UnexpectedText { line, .. }
            | RecipeError::UnexpectedToken { line, .. }
            | RecipeError::ValueOutOfRange { line, .. }
            | RecipeError::TooManyStatements { line },
        ) => {
            let lines = source.matches('\n').count() + 1;
            assert!((1..=lines).contains(&line), "line {line} of {lines}");
        }
        Err(
            RecipeError::UnexpectedEnd
            | RecipeError::NotTransmittable { .. }
            | RecipeError::MissingMode,
        ) => {}
    }
});
