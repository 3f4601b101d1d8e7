//! The plague instruction set: 8 ops of neighborhood infection plus a
//! self-steering walk.
//!
//! This set has a dispatch-level barrier rule (see [`super::Vm::step`]):
//! landing on a 255 cell reverses the default direction, so enclosed
//! regions trap the instruction pointer.

use crate::actuator::ActuatorSink;
use crate::knobs::KnobSource;

use super::Vm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlagueOp {
    KnobHere,
    SampleHere,
    OutFilter,
    /// PWM gets the sum of both IP neighbors.
    OutPwmNeighbors,
    /// Wall off two cells with 255 and step past them.
    Enclose,
    /// Copy the IP cell onto both neighbors while it is alive (< 128).
    Infect,
    /// Zero both neighbors.
    Die,
    /// Bounce off domain boundaries or take a one-shot stride derived
    /// from the cell value. The only op that overrides `insdir`, and
    /// only for this single step.
    Walk,
}

impl PlagueOp {
    pub const COUNT: u8 = 8;

    pub fn decode(byte: u8) -> Self {
        match byte % Self::COUNT {
            0 => PlagueOp::KnobHere,
            1 => PlagueOp::SampleHere,
            2 => PlagueOp::OutFilter,
            3 => PlagueOp::OutPwmNeighbors,
            4 => PlagueOp::Enclose,
            5 => PlagueOp::Infect,
            6 => PlagueOp::Die,
            _ => PlagueOp::Walk,
        }
    }
}

impl<K: KnobSource, S: ActuatorSink> Vm<K, S> {
    pub(crate) fn step_plague(&mut self, op: PlagueOp) -> u8 {
        let ip = self.ip;
        match op {
            PlagueOp::KnobHere => {
                let v = self.controls_knob();
                self.grid.set(ip as i32, v);
                self.advance(ip)
            }
            PlagueOp::SampleHere => {
                let v = self.signal();
                self.grid.set(ip as i32, v);
                self.advance(ip)
            }
            PlagueOp::OutFilter => {
                let v = self.grid.get(self.omem as i32) as u16;
                self.out_filter(v);
                self.advance(ip)
            }
            PlagueOp::OutPwmNeighbors => {
                let v = self
                    .grid
                    .get(ip as i32 + 1)
                    .wrapping_add(self.grid.get(ip as i32 - 1));
                self.out_pwm(v);
                self.advance(ip)
            }
            PlagueOp::Enclose => {
                self.grid.set(ip as i32, 255);
                self.grid.set(ip as i32 + 1, 255);
                ip.wrapping_add(2)
            }
            PlagueOp::Infect => {
                let v = self.grid.get(ip as i32);
                if v < 128 {
                    self.grid.set(ip as i32 + 1, v);
                    self.grid.set(ip as i32 - 1, v);
                }
                self.advance(ip)
            }
            PlagueOp::Die => {
                self.grid.set(ip as i32 - 1, 0);
                self.grid.set(ip as i32 + 1, 0);
                self.advance(ip)
            }
            PlagueOp::Walk => {
                let cell = self.grid.get(ip as i32);
                if self.dir < 0 && (cell & 0x03) == 1 {
                    self.dir = 1;
                } else if self.dir > 0 && (cell & 0x03) == 0 {
                    self.dir = -1;
                } else {
                    // One-shot stride from the cell's high nibble,
                    // signed by the default direction.
                    let stride = (cell / 16) as i8 * if self.dir >= 0 { 1 } else { -1 };
                    self.insdir = if stride == 0 { self.dir } else { stride };
                }
                self.advance(ip)
            }
        }
    }
}
