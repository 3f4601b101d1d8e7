//! Actuator Sink: the external collaborator receiving interpreter output.
//!
//! Two registers drive the analog side: a filter-duty word that clocks
//! the switched-capacitor filter and a PWM-duty byte that is the audio
//! signal itself. The filter write always goes through one of four
//! parameterized transforms selected per tick by the controls knob.
//! Hardware wrappers implement [`ActuatorSink`]; [`MemorySink`] records
//! writes for tests and traces.

use serde::{Deserialize, Serialize};

/// Filter depth is meaningful in 0..=8 (a shift count over 8-bit data).
pub const MAX_FILTER_DEPTH: u8 = 8;

fn clamp_depth(k: u8) -> u8 {
    k.min(MAX_FILTER_DEPTH)
}

/// Prescaler for the filter clock. Selected by the hardware knob and by
/// the "rooms" op of the reddeath instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterClock {
    #[default]
    Off,
    Div1,
    Div8,
    Div64,
    Div256,
}

/// The four filter-duty transforms. `controls % 4` picks one each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    ShiftLeft,
    ShiftRight,
    Multiply,
    Divide,
}

impl FilterMode {
    pub fn select(variant: u8) -> Self {
        match variant % 4 {
            0 => FilterMode::ShiftLeft,
            1 => FilterMode::ShiftRight,
            2 => FilterMode::Multiply,
            _ => FilterMode::Divide,
        }
    }

    /// Apply the transform at depth `k` (clamped to 0..=8). Arithmetic
    /// wraps as 16-bit, matching the duty register width.
    pub fn apply(self, value: u16, depth: u8) -> u16 {
        let k = clamp_depth(depth);
        match self {
            FilterMode::ShiftLeft => value.wrapping_shl(k as u32),
            FilterMode::ShiftRight => value.wrapping_shr(k as u32),
            FilterMode::Multiply => value.wrapping_mul(k as u16),
            FilterMode::Divide => value / (k as u16 + 1),
        }
    }
}

/// Current transform and depth for filter output. Owned by the machine
/// state; the mode is re-derived from the controls knob every tick, the
/// depth persists until something reprograms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOut {
    pub mode: FilterMode,
    pub depth: u8,
}

impl FilterOut {
    pub fn apply(&self, value: u16) -> u16 {
        self.mode.apply(value, self.depth)
    }
}

impl Default for FilterOut {
    fn default() -> Self {
        FilterOut { mode: FilterMode::ShiftLeft, depth: 0 }
    }
}

/// Output registers of the synthesizer.
pub trait ActuatorSink {
    /// Program the filter-duty word.
    fn set_filter_duty(&mut self, value: u16);
    /// Program the PWM-duty byte (the audio output).
    fn set_pwm_duty(&mut self, value: u8);
    /// XOR the PWM register with 0xFF; the reddeath silence toggle.
    fn invert_pwm(&mut self);
    /// Select the filter-clock prescaler.
    fn set_filter_clock(&mut self, clock: FilterClock);
}

/// One recorded actuator write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "target", content = "value")]
pub enum ActuatorEvent {
    Filter(u16),
    Pwm(u8),
    Clock(FilterClock),
}

/// In-memory sink: holds the register values and an ordered event log.
/// Repeated identical clock writes are not logged; reprogramming the
/// prescaler to its current value is not an audible event.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub filter_duty: u16,
    pub pwm_duty: u8,
    pub filter_clock: FilterClock,
    pub events: Vec<ActuatorEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }
}

impl ActuatorSink for MemorySink {
    fn set_filter_duty(&mut self, value: u16) {
        self.filter_duty = value;
        self.events.push(ActuatorEvent::Filter(value));
    }

    fn set_pwm_duty(&mut self, value: u8) {
        self.pwm_duty = value;
        self.events.push(ActuatorEvent::Pwm(value));
    }

    fn invert_pwm(&mut self) {
        self.pwm_duty ^= 0xFF;
        self.events.push(ActuatorEvent::Pwm(self.pwm_duty));
    }

    fn set_filter_clock(&mut self, clock: FilterClock) {
        if self.filter_clock != clock {
            self.filter_clock = clock;
            self.events.push(ActuatorEvent::Clock(clock));
        }
    }
}
