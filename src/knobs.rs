//! Knob Source: the external collaborator supplying control voltages.
//!
//! The hardware samples three front-panel knobs plus the audio output
//! fed back as a noise/sample channel. Here that is a trait with one
//! method; hardware wrappers, scripted test sources, and patch playback
//! all implement it. A read that times out yields a neutral zero rather
//! than an error; failure never propagates into the core.

use std::collections::VecDeque;

/// Input channels. `Step`, `Hardware` and `Controls` are the three panel
/// knobs, sampled once per tick by the dispatch loop; `Signal` is the
/// audio-output feedback tap used by the capture opcodes, grid boot and
/// PRNG seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Knob {
    Step,
    Hardware,
    Controls,
    Signal,
}

impl Knob {
    fn index(self) -> usize {
        match self {
            Knob::Step => 0,
            Knob::Hardware => 1,
            Knob::Controls => 2,
            Knob::Signal => 3,
        }
    }
}

/// A source of 8-bit channel samples. Implementations return 0 when a
/// read cannot complete.
pub trait KnobSource {
    fn read(&mut self, knob: Knob) -> u8;
}

/// Fixed channel values; the simplest source for tests and demos.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstKnobs {
    pub step: u8,
    pub hardware: u8,
    pub controls: u8,
    pub signal: u8,
}

impl ConstKnobs {
    /// All channels read zero, like disconnected hardware.
    pub fn silent() -> Self {
        ConstKnobs::default()
    }
}

impl KnobSource for ConstKnobs {
    fn read(&mut self, knob: Knob) -> u8 {
        match knob {
            Knob::Step => self.step,
            Knob::Hardware => self.hardware,
            Knob::Controls => self.controls,
            Knob::Signal => self.signal,
        }
    }
}

/// Per-channel scripted sequences, used by patches and tests. Each
/// channel plays its queued values in order and then holds a fixed
/// fallback value.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKnobs {
    tracks: [VecDeque<u8>; 4],
    holds: [u8; 4],
}

impl ScriptedKnobs {
    pub fn new() -> Self {
        ScriptedKnobs::default()
    }

    /// Queue values on one channel.
    pub fn script(&mut self, knob: Knob, values: impl IntoIterator<Item = u8>) -> &mut Self {
        self.tracks[knob.index()].extend(values);
        self
    }

    /// Value a channel reads once its script is exhausted.
    pub fn hold(&mut self, knob: Knob, value: u8) -> &mut Self {
        self.holds[knob.index()] = value;
        self
    }
}

impl KnobSource for ScriptedKnobs {
    fn read(&mut self, knob: Knob) -> u8 {
        let i = knob.index();
        self.tracks[i].pop_front().unwrap_or(self.holds[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_plays_then_holds() {
        let mut knobs = ScriptedKnobs::new();
        knobs.script(Knob::Controls, [10, 20]).hold(Knob::Controls, 7);
        assert_eq!(knobs.read(Knob::Controls), 10);
        assert_eq!(knobs.read(Knob::Controls), 20);
        assert_eq!(knobs.read(Knob::Controls), 7);
        assert_eq!(knobs.read(Knob::Controls), 7);
    }

    #[test]
    fn channels_are_independent() {
        let mut knobs = ScriptedKnobs::new();
        knobs.script(Knob::Step, [1]).script(Knob::Signal, [2]);
        assert_eq!(knobs.read(Knob::Signal), 2);
        assert_eq!(knobs.read(Knob::Step), 1);
        // Unscripted channels hold zero, the timeout-neutral value.
        assert_eq!(knobs.read(Knob::Hardware), 0);
    }
}
