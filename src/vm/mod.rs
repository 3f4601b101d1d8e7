//! Instruction Engine: seven interchangeable instruction sets plus one
//! pass-through mode, all dispatching over the shared grid.
//!
//! Per gated tick the engine reads `opcode = grid[ip]`, maps
//! `opcode mod N` into the selected set's table and runs the handler.
//! Handlers return the next instruction pointer and may mutate cells,
//! move the working pointer, flip directions or write the actuator.
//! All interpreter state lives in one [`Vm`] value; there are no
//! ambient globals.

pub mod bf;
pub mod biota;
pub mod first;
pub mod plague;
pub mod redcode;
pub mod reddeath;
pub mod sir;

use crate::actuator::{ActuatorSink, FilterOut};
use crate::grid::{Grid, Heading};
use crate::knobs::{Knob, KnobSource};
use crate::rng::Lfsr8;

use bf::BfOp;
use biota::BiotaOp;
use first::FirstOp;
use plague::PlagueOp;
use redcode::RedcodeOp;
use reddeath::RedDeathOp;
use sir::SirOp;

/// Capacity of the loop-bracket stack.
pub const BRACKET_DEPTH: usize = 20;

/// Saved instruction pointers for the bracket-open/close pair.
///
/// Saturates on overflow (opens past the capacity are dropped) and
/// absorbs underflow (closes on an empty stack are no-ops). Forward
/// progress wins over structural correctness here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BracketStack {
    slots: [u8; BRACKET_DEPTH],
    depth: usize,
}

impl BracketStack {
    pub fn new() -> Self {
        BracketStack::default()
    }

    /// Save an IP; dropped silently when the stack is full.
    pub fn push(&mut self, ip: u8) {
        if self.depth < BRACKET_DEPTH {
            self.slots[self.depth] = ip;
            self.depth += 1;
        }
    }

    /// The most recently saved IP, if any. Does not pop.
    pub fn top(&self) -> Option<u8> {
        self.depth.checked_sub(1).map(|i| self.slots[i])
    }

    /// Discard the top entry; no-op when empty.
    pub fn pop(&mut self) -> Option<u8> {
        let top = self.top();
        self.depth = self.depth.saturating_sub(1);
        top
    }

    pub fn len(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// The saved IPs, oldest first.
    pub fn saved(&self) -> &[u8] {
        &self.slots[..self.depth]
    }
}

/// Which opcode table is live this tick. Selected externally by the
/// step knob (`step_knob >> 5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionSet {
    First,
    Plague,
    Bf,
    Sir,
    Redcode,
    /// No table: the opcode byte goes straight to the PWM register.
    Direct,
    RedDeath,
    Biota,
}

impl InstructionSet {
    pub fn select(index: u8) -> Self {
        match index % 8 {
            0 => InstructionSet::First,
            1 => InstructionSet::Plague,
            2 => InstructionSet::Bf,
            3 => InstructionSet::Sir,
            4 => InstructionSet::Redcode,
            5 => InstructionSet::Direct,
            6 => InstructionSet::RedDeath,
            _ => InstructionSet::Biota,
        }
    }
}

/// The whole interpreter state plus its two external collaborators.
pub struct Vm<K: KnobSource, S: ActuatorSink> {
    pub grid: Grid,
    /// Instruction pointer; selects the opcode cell each tick.
    pub ip: u8,
    /// Working data pointer, independent of `ip`.
    pub omem: u8,
    /// Persistent default step, +1 or -1.
    pub dir: i8,
    /// Per-step override; mirrors `dir` except for the single step a
    /// plague walk computes its own stride.
    pub insdir: i8,
    /// Sequencing heading for the biota set.
    pub btdir: Heading,
    /// Data-cursor heading for the biota set.
    pub dcdir: Heading,
    /// Tick counter gating the reddeath phases.
    pub clock: u8,
    pub brackets: BracketStack,
    pub rng: Lfsr8,
    pub filter: FilterOut,
    /// Rotating injection offset of the reddeath absorbing phase.
    pub(crate) inject_at: u8,
    pub knobs: K,
    pub sink: S,
}

impl<K: KnobSource, S: ActuatorSink> Vm<K, S> {
    pub fn new(knobs: K, sink: S, grid: Grid, rng: Lfsr8) -> Self {
        Vm {
            grid,
            ip: 0,
            omem: 0,
            dir: 1,
            insdir: 1,
            btdir: Heading::East,
            dcdir: Heading::East,
            clock: 0,
            brackets: BracketStack::new(),
            rng,
            filter: FilterOut::default(),
            inject_at: 0,
            knobs,
            sink,
        }
    }

    /// Execute exactly one opcode of the selected set, including the
    /// set's own post-step rule (plague barrier, biota sequencing
    /// advance). Afterwards `insdir` falls back to `dir`; any one-shot
    /// override has already been consumed.
    pub fn step(&mut self, set: InstructionSet) {
        let opcode = self.grid.get(self.ip as i32);
        match set {
            InstructionSet::First => {
                self.ip = self.step_first(FirstOp::decode(opcode));
            }
            InstructionSet::Plague => {
                self.ip = self.step_plague(PlagueOp::decode(opcode));
                // Barrier rule: landing on a 255 cell reverses the
                // default direction.
                if self.grid.get(self.ip as i32) == 255 {
                    self.dir = -self.dir;
                }
            }
            InstructionSet::Bf => {
                self.ip = self.step_bf(BfOp::decode(opcode));
            }
            InstructionSet::Sir => {
                self.ip = self.step_sir(SirOp::decode(opcode));
            }
            InstructionSet::Redcode => {
                self.ip = self.step_redcode(RedcodeOp::decode(opcode));
            }
            InstructionSet::Direct => {
                self.sink.set_pwm_duty(opcode);
                self.ip = self.ip.wrapping_add_signed(self.dir);
            }
            InstructionSet::RedDeath => {
                self.ip = self.step_reddeath(RedDeathOp::decode(opcode));
            }
            InstructionSet::Biota => {
                self.step_biota(BiotaOp::decode(opcode));
                // Sequencing is decoupled from the data cursor: the IP
                // advances 1 or 16 cells along its own heading.
                self.ip = self.ip.wrapping_add_signed(self.btdir.ip_delta());
            }
        }
        self.insdir = self.dir;
    }

    /// Next IP one default step away.
    pub(crate) fn advance(&self, ip: u8) -> u8 {
        ip.wrapping_add_signed(self.insdir)
    }

    /// Filter output: run `value` through the current transform and
    /// program the duty register.
    pub(crate) fn out_filter(&mut self, value: u16) {
        let duty = self.filter.apply(value);
        self.sink.set_filter_duty(duty);
    }

    pub(crate) fn out_pwm(&mut self, value: u8) {
        self.sink.set_pwm_duty(value);
    }

    /// One sample from the audio-feedback channel.
    pub(crate) fn signal(&mut self) -> u8 {
        self.knobs.read(Knob::Signal)
    }

    /// One sample from the controls knob.
    pub(crate) fn controls_knob(&mut self) -> u8 {
        self.knobs.read(Knob::Controls)
    }
}
