//! Dispatch Engine — the outer tick loop of the synthesizer.
//!
//! Each tick samples the three panel knobs, derives the selectors,
//! gates one instruction step and at most one generator invocation,
//! and programs the filter clock from the hardware knob. The loop
//! itself never ends on hardware; embedders call [`Engine::tick`] (or
//! [`Engine::run`]) from whatever drives them.
//!
//! The per-tick ordering is fixed and must stay fixed: sample knobs,
//! derive selectors, execute one opcode, run one generator, write the
//! hardware filter configuration. The dispatch loop itself never
//! touches interpreter state directly; only the instruction engine and
//! the generators mutate it.

use crate::actuator::{ActuatorSink, FilterClock, FilterMode, MemorySink};
use crate::automata::Automata;
use crate::grid::{Grid, GRID_LEN};
use crate::knobs::{ConstKnobs, Knob, KnobSource};
use crate::rng::Lfsr8;
use crate::vm::{InstructionSet, Vm};

/// Selectors derived from the step and controls knobs each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selectors {
    /// Live instruction set: `step_knob >> 5`.
    pub set: InstructionSet,
    /// Filter transform: `controls % 4`.
    pub filter_mode: FilterMode,
    /// The instruction engine advances every this many ticks:
    /// `(step_knob % 32) + 1`.
    pub gate_period: u8,
    /// A generator runs every this many ticks: `(controls % 32) + 1`.
    pub generator_period: u8,
    /// Which generator: `controls >> 5`.
    pub generator_index: u8,
}

impl Selectors {
    pub fn derive(step_knob: u8, controls: u8) -> Self {
        Selectors {
            set: InstructionSet::select(step_knob >> 5),
            filter_mode: FilterMode::select(controls % 4),
            gate_period: (step_knob % 32) + 1,
            generator_period: (controls % 32) + 1,
            generator_index: controls >> 5,
        }
    }
}

/// Filter configuration selected by the upper nibble of the hardware
/// knob: a clock prescaler and, for most entries, a new filter depth.
/// `None` leaves the running depth alone.
fn hardware_filter(nibble: u8) -> (FilterClock, Option<u8>) {
    match nibble & 0x0F {
        0 => (FilterClock::Off, None),
        1 => (FilterClock::Div1, Some(8)),
        2 => (FilterClock::Div1, Some(4)),
        3 => (FilterClock::Div1, Some(2)),
        4 => (FilterClock::Div1, None),
        5 => (FilterClock::Div8, Some(8)),
        6 => (FilterClock::Div8, Some(4)),
        7 => (FilterClock::Div8, Some(2)),
        8 => (FilterClock::Div8, None),
        9 => (FilterClock::Div64, Some(8)),
        10 => (FilterClock::Div64, Some(4)),
        11 => (FilterClock::Div64, Some(2)),
        12 => (FilterClock::Div64, None),
        13 => (FilterClock::Div256, Some(8)),
        14 => (FilterClock::Div256, Some(6)),
        _ => (FilterClock::Div256, Some(4)),
    }
}

/// The top-level object: instruction engine, generator state and the
/// wrapping tick counter.
pub struct Engine<K: KnobSource, S: ActuatorSink> {
    pub vm: Vm<K, S>,
    pub automata: Automata,
    ticks: u8,
}

impl<K: KnobSource, S: ActuatorSink> Engine<K, S> {
    /// Boot the machine: seed the PRNG from noise, then sample the
    /// signal channel into every grid cell.
    pub fn new(mut knobs: K, sink: S) -> Self {
        let rng = Lfsr8::from_noise(&mut knobs);
        let mut grid = Grid::new();
        for i in 0..GRID_LEN {
            let v = knobs.read(Knob::Signal);
            grid.set(i as i32, v);
        }
        Self::with_state(knobs, sink, grid, rng)
    }

    /// Boot from explicit state, for patches and tests.
    pub fn with_state(knobs: K, sink: S, grid: Grid, rng: Lfsr8) -> Self {
        Engine {
            vm: Vm::new(knobs, sink, grid, rng),
            automata: Automata::new(),
            ticks: 0,
        }
    }

    /// Ticks elapsed, mod 256.
    pub fn ticks(&self) -> u8 {
        self.ticks
    }

    /// One tick of the outer loop.
    pub fn tick(&mut self) {
        let step_knob = self.vm.knobs.read(Knob::Step);
        let mut hardware = self.vm.knobs.read(Knob::Hardware);
        let mut controls = self.vm.knobs.read(Knob::Controls);
        // A knob sampling zero is replaced by the instruction pointer,
        // so a dead input still sweeps the parameter space.
        if hardware == 0 {
            hardware = self.vm.ip;
        }
        if controls == 0 {
            controls = self.vm.ip;
        }

        let sel = Selectors::derive(step_knob, controls);
        self.vm.filter.mode = sel.filter_mode;

        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % sel.gate_period == 0 {
            self.vm.step(sel.set);
        }
        if self.ticks % sel.generator_period == 0 {
            self.automata
                .run(sel.generator_index, &mut self.vm.grid, &mut self.vm.rng);
        }

        let (clock, depth) = hardware_filter(hardware >> 4);
        self.vm.sink.set_filter_clock(clock);
        if let Some(depth) = depth {
            self.vm.filter.depth = depth;
        }
    }

    /// Run `n` ticks.
    pub fn run(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }
}

impl Engine<ConstKnobs, MemorySink> {
    /// A machine on fixed knob voltages with a recording sink.
    pub fn on_const(knobs: ConstKnobs) -> Self {
        Engine::new(knobs, MemorySink::new())
    }
}
