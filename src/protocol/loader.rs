//! Streaming decoder for the script-load protocol.
//!
//! Wire format (stop-and-wait, every field acknowledged before the next is
//! sent):
//! ```text
//! ┌─────┬──────┬────────────┬───────────┬─────────────────────────┬─────┐
//! │ BEG │ mode │ mash water │ count (N) │ N × (temp f32, dur u32) │ END │
//! │ 3B  │ 3B   │ LE u32 mL  │ LE u32    │ LE, 4B + 4B             │ 3B  │
//! └─────┴──────┴────────────┴───────────┴─────────────────────────┴─────┘
//! ```
//!
//! The decoder accumulates bytes until a field is complete, so a single
//! read may carry part of a field or several fields.

use log::{info, warn};

use crate::error::ProtocolError;
use crate::script::{Mode, SCRIPT_CAPACITY, Script, Statement, ThermalModel};

pub const BEGIN_TAG: [u8; 3] = *b"BEG";
pub const END_TAG: [u8; 3] = *b"END";
pub const MASH_MODE_TAG: [u8; 3] = *b"MSH";
pub const SPARGE_MODE_TAG: [u8; 3] = *b"SPG";

/// Bytes in a tag field.
const TAG_SIZE: usize = 3;
/// Bytes in a numeric field.
const WORD_SIZE: usize = 4;

/// Result of one completed field.
#[derive(Debug, Clone)]
pub enum LoadProgress {
    /// Field accepted; the sender may transmit the next one.
    Ack,
    /// `END` received; the script is ready to run.
    Done(Script),
    /// Load aborted. Nothing from it is retained.
    Failed(ProtocolError),
}

/// Inclusive range of setpoints the loader accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetpointLimits {
    pub min_c: f32,
    pub max_c: f32,
}

impl SetpointLimits {
    pub fn contains(&self, celsius: f32) -> bool {
        (self.min_c..=self.max_c).contains(&celsius)
    }
}

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Begin,
    Mode,
    MashWater,
    Count,
    Temperature { remaining: u32 },
    Duration { remaining: u32 },
    End,
}

impl Stage {
    fn field_size(self) -> usize {
        match self {
            Self::Begin | Self::Mode | Self::End => TAG_SIZE,
            _ => WORD_SIZE,
        }
    }
}

/// Streaming script-load decoder.
pub struct ScriptLoader {
    stage: Stage,
    field: heapless::Vec<u8, WORD_SIZE>,
    limits: SetpointLimits,
    pending: Script,
    pending_temperature: f32,
}

impl ScriptLoader {
    pub fn new(limits: SetpointLimits, model: ThermalModel) -> Self {
        Self {
            stage: Stage::Begin,
            field: heapless::Vec::new(),
            limits,
            pending: Script::new(model),
            pending_temperature: 0.0,
        }
    }

    /// Feed bytes into the decoder, reporting each completed field.
    ///
    /// Bytes following a failed field in the same chunk are discarded; the
    /// sender stops at the first `ERROR` and restarts with `BEG`.
    pub fn feed(&mut self, data: &[u8], mut on_progress: impl FnMut(LoadProgress)) {
        for &byte in data {
            if let Some(progress) = self.feed_byte(byte) {
                let failed = matches!(progress, LoadProgress::Failed(_));
                on_progress(progress);
                if failed {
                    return;
                }
            }
        }
    }

    /// Feed one byte. Returns `Some` when it completes a field.
    pub fn feed_byte(&mut self, byte: u8) -> Option<LoadProgress> {
        // Cannot overflow: the field is drained as soon as it is full.
        let _ = self.field.push(byte);
        if self.field.len() < self.stage.field_size() {
            return None;
        }
        let progress = match self.complete_field() {
            Ok(progress) => progress,
            Err(e) => {
                warn!("Script load rejected: {e}");
                self.reset();
                LoadProgress::Failed(e)
            }
        };
        self.field.clear();
        Some(progress)
    }

    /// Drop any partial load and wait for `BEG` again.
    pub fn reset(&mut self) {
        self.stage = Stage::Begin;
        self.field.clear();
        self.pending.reset();
    }

    /// `true` while between `BEG` and `END`.
    pub fn in_progress(&self) -> bool {
        self.stage != Stage::Begin || !self.field.is_empty()
    }

    fn complete_field(&mut self) -> Result<LoadProgress, ProtocolError> {
        match self.stage {
            Stage::Begin => {
                if self.tag() != BEGIN_TAG {
                    return Err(ProtocolError::ExpectedBegin);
                }
                self.pending.reset();
                self.stage = Stage::Mode;
            }
            Stage::Mode => {
                let mode = match self.tag() {
                    MASH_MODE_TAG => Mode::Mashing,
                    SPARGE_MODE_TAG => Mode::Sparging,
                    _ => return Err(ProtocolError::UnknownMode),
                };
                self.pending.set_mode(mode);
                self.stage = Stage::MashWater;
            }
            Stage::MashWater => {
                self.pending.set_mash_water_volume(self.word());
                self.stage = Stage::Count;
            }
            Stage::Count => {
                let count = self.word();
                if count as usize > SCRIPT_CAPACITY {
                    return Err(ProtocolError::TooManySetpoints);
                }
                self.stage = if count == 0 {
                    Stage::End
                } else {
                    Stage::Temperature { remaining: count }
                };
            }
            Stage::Temperature { remaining } => {
                let celsius = f32::from_bits(self.word());
                if !self.limits.contains(celsius) {
                    return Err(ProtocolError::TemperatureOutOfRange);
                }
                self.pending_temperature = celsius;
                self.stage = Stage::Duration { remaining };
            }
            Stage::Duration { remaining } => {
                self.pending
                    .add_statement(Statement::hold(self.pending_temperature, self.word()));
                self.stage = match remaining - 1 {
                    0 => Stage::End,
                    remaining => Stage::Temperature { remaining },
                };
            }
            Stage::End => {
                if self.tag() != END_TAG {
                    return Err(ProtocolError::ExpectedEnd);
                }
                let model = *self.pending.thermal_model();
                let script = core::mem::replace(&mut self.pending, Script::new(model));
                self.stage = Stage::Begin;
                info!(
                    "Script received: {} setpoints, mode {}",
                    script.len(),
                    script.mode().name()
                );
                return Ok(LoadProgress::Done(script));
            }
        }
        Ok(LoadProgress::Ack)
    }

    fn tag(&self) -> [u8; TAG_SIZE] {
        let mut tag = [0; TAG_SIZE];
        tag.copy_from_slice(&self.field[..TAG_SIZE]);
        tag
    }

    fn word(&self) -> u32 {
        let mut word = [0; WORD_SIZE];
        word.copy_from_slice(&self.field[..WORD_SIZE]);
        u32::from_le_bytes(word)
    }
}

/// Host side of the load protocol: one setpoint program to transmit.
#[derive(Debug, Clone, PartialEq)]
pub struct SetpointScript {
    pub mode: Mode,
    pub mash_water_ml: u32,
    /// `(celsius, duration_ms)` pairs, run in order.
    pub setpoints: Vec<(f32, u32)>,
}

impl SetpointScript {
    /// Every field in transmission order. The sender waits for an ack
    /// after each one.
    pub fn fields(&self) -> Vec<Vec<u8>> {
        let mode = match self.mode {
            Mode::Mashing => MASH_MODE_TAG,
            Mode::Sparging => SPARGE_MODE_TAG,
            Mode::Initializing => *b"INI",
        };
        let mut fields = vec![
            BEGIN_TAG.to_vec(),
            mode.to_vec(),
            self.mash_water_ml.to_le_bytes().to_vec(),
            (self.setpoints.len() as u32).to_le_bytes().to_vec(),
        ];
        for &(celsius, duration_ms) in &self.setpoints {
            fields.push(celsius.to_le_bytes().to_vec());
            fields.push(duration_ms.to_le_bytes().to_vec());
        }
        fields.push(END_TAG.to_vec());
        fields
    }

    /// All fields concatenated.
    pub fn encode(&self) -> Vec<u8> {
        self.fields().concat()
    }
}
