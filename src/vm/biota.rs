//! The biota instruction set: 10 ops steering a 2-D cursor.
//!
//! The working pointer walks the 16x16 torus along its own heading
//! (`dcdir`), wrapping each axis independently, while the instruction
//! pointer sequences along a second heading (`btdir`) that the ops flip
//! when the cursor runs into empty cells. Handlers never move the IP
//! themselves; the dispatch arm advances it 1 or 16 cells afterwards.

use crate::actuator::ActuatorSink;
use crate::knobs::KnobSource;

use super::Vm;

/// Steps the seek op will take before giving up.
const SEEK_LIMIT: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiotaOp {
    /// Reverse the sequencing heading.
    Reverse,
    OutFilter,
    OutPwm,
    /// Cursor forward; landing on an empty cell reverses sequencing.
    Straight,
    /// Cursor backward, same flip rule.
    Backup,
    /// Sidestep the cursor 90 degrees off its heading.
    Turn,
    /// Sidestep the other way.
    Unturn,
    /// Walk forward until an empty cell or the step cap.
    Seek,
    /// Clear the cursor cell, or flip sequencing if already empty.
    Clear,
    /// Copy the cursor cell into its predecessor, or flip sequencing
    /// when the source is empty or the target occupied.
    Dup,
}

impl BiotaOp {
    pub const COUNT: u8 = 10;

    pub fn decode(byte: u8) -> Self {
        match byte % Self::COUNT {
            0 => BiotaOp::Reverse,
            1 => BiotaOp::OutFilter,
            2 => BiotaOp::OutPwm,
            3 => BiotaOp::Straight,
            4 => BiotaOp::Backup,
            5 => BiotaOp::Turn,
            6 => BiotaOp::Unturn,
            7 => BiotaOp::Seek,
            8 => BiotaOp::Clear,
            _ => BiotaOp::Dup,
        }
    }
}

impl<K: KnobSource, S: ActuatorSink> Vm<K, S> {
    pub(crate) fn step_biota(&mut self, op: BiotaOp) {
        match op {
            BiotaOp::Reverse => self.btdir = self.btdir.reversed(),
            BiotaOp::OutFilter => {
                let v = self.grid.get(self.omem as i32) as u16;
                self.out_filter(v);
            }
            BiotaOp::OutPwm => {
                let v = self.grid.get(self.omem as i32);
                self.out_pwm(v);
            }
            BiotaOp::Straight => {
                self.omem = self.dcdir.step(self.omem);
                self.flip_if_empty();
            }
            BiotaOp::Backup => {
                self.omem = self.dcdir.reversed().step(self.omem);
                self.flip_if_empty();
            }
            BiotaOp::Turn => {
                self.omem = self.dcdir.turned().step(self.omem);
            }
            BiotaOp::Unturn => {
                self.omem = self.dcdir.unturned().step(self.omem);
            }
            BiotaOp::Seek => {
                let mut steps = 0;
                while steps < SEEK_LIMIT && self.grid.get(self.omem as i32) != 0 {
                    self.omem = self.dcdir.step(self.omem);
                    steps += 1;
                }
            }
            BiotaOp::Clear => {
                if self.grid.get(self.omem as i32) == 0 {
                    self.btdir = self.btdir.reversed();
                } else {
                    self.grid.set(self.omem as i32, 0);
                }
            }
            BiotaOp::Dup => {
                let here = self.grid.get(self.omem as i32);
                let prev = self.omem.wrapping_sub(1);
                if here == 0 || self.grid.get(prev as i32) != 0 {
                    self.btdir = self.btdir.reversed();
                } else {
                    self.grid.set(prev as i32, here);
                }
            }
        }
    }

    fn flip_if_empty(&mut self) {
        if self.grid.get(self.omem as i32) == 0 {
            self.btdir = self.btdir.reversed();
        }
    }
}
