//! Patch format: a JSON description of a machine boot state.
//!
//! A patch gives the grid image, the PRNG seed and a value track per
//! knob, and builds into an [`Engine`] over scripted knobs and a
//! recording sink. Patches are how hosts (and the wasm bindings)
//! drive the machine deterministically.

use serde::{Deserialize, Serialize};

use crate::actuator::MemorySink;
use crate::engine::Engine;
use crate::error::PatchError;
use crate::grid::{Grid, GRID_LEN};
use crate::knobs::{Knob, ScriptedKnobs};
use crate::rng::Lfsr8;

/// One knob channel: a sequence of samples played front to back, then
/// a hold value for every read after the sequence runs out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnobTrack {
    #[serde(default)]
    pub values: Vec<u8>,
    #[serde(default)]
    pub hold: u8,
}

impl KnobTrack {
    /// A track that always reads `value`.
    pub fn held(value: u8) -> Self {
        KnobTrack {
            values: Vec::new(),
            hold: value,
        }
    }
}

/// Top-level patch descriptor. Absent fields boot silent: a zeroed
/// grid, the fallback seed, knobs held at zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Patch {
    /// PRNG seed; zero or absent selects the fallback seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u8>,
    /// Initial grid image, exactly 256 cells when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<u8>>,
    #[serde(default)]
    pub step: KnobTrack,
    #[serde(default)]
    pub hardware: KnobTrack,
    #[serde(default)]
    pub controls: KnobTrack,
    #[serde(default)]
    pub signal: KnobTrack,
}

impl Patch {
    pub fn from_json(source: &str) -> Result<Self, PatchError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Build the machine this patch describes.
    pub fn build(&self) -> Result<Engine<ScriptedKnobs, MemorySink>, PatchError> {
        let mut grid = Grid::new();
        if let Some(cells) = &self.cells {
            if cells.len() != GRID_LEN {
                return Err(PatchError::GridImage { len: cells.len() });
            }
            for (i, &v) in cells.iter().enumerate() {
                grid.set(i as i32, v);
            }
        }

        let mut knobs = ScriptedKnobs::new();
        for (knob, track) in [
            (Knob::Step, &self.step),
            (Knob::Hardware, &self.hardware),
            (Knob::Controls, &self.controls),
            (Knob::Signal, &self.signal),
        ] {
            knobs.script(knob, track.values.iter().copied());
            knobs.hold(knob, track.hold);
        }

        let rng = Lfsr8::from_seed(self.seed.unwrap_or(0));
        Ok(Engine::with_state(knobs, MemorySink::new(), grid, rng))
    }
}
