//! The bf instruction set: 9 tape-machine ops with a bounded loop stack.
//!
//! Unlike the other sets, every op sequences forward by exactly one
//! cell; only a taken bracket-close moves the IP anywhere else.

use crate::actuator::ActuatorSink;
use crate::knobs::KnobSource;

use super::Vm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BfOp {
    PtrInc,
    PtrDec,
    CellInc,
    CellDec,
    OutFilter,
    OutPwm,
    SampleIn,
    /// Save the current IP on the bracket stack.
    Open,
    /// While the working cell is non-zero, jump back to the innermost
    /// saved IP; otherwise pop it and continue.
    Close,
}

impl BfOp {
    pub const COUNT: u8 = 9;

    pub fn decode(byte: u8) -> Self {
        match byte % Self::COUNT {
            0 => BfOp::PtrInc,
            1 => BfOp::PtrDec,
            2 => BfOp::CellInc,
            3 => BfOp::CellDec,
            4 => BfOp::OutFilter,
            5 => BfOp::OutPwm,
            6 => BfOp::SampleIn,
            7 => BfOp::Open,
            _ => BfOp::Close,
        }
    }
}

impl<K: KnobSource, S: ActuatorSink> Vm<K, S> {
    pub(crate) fn step_bf(&mut self, op: BfOp) -> u8 {
        let ip = self.ip;
        let next = ip.wrapping_add(1);
        match op {
            BfOp::PtrInc => {
                self.omem = self.omem.wrapping_add(1);
                next
            }
            BfOp::PtrDec => {
                self.omem = self.omem.wrapping_sub(1);
                next
            }
            BfOp::CellInc => {
                let v = self.grid.get(self.omem as i32).wrapping_add(1);
                self.grid.set(self.omem as i32, v);
                next
            }
            BfOp::CellDec => {
                let v = self.grid.get(self.omem as i32).wrapping_sub(1);
                self.grid.set(self.omem as i32, v);
                next
            }
            BfOp::OutFilter => {
                let v = self.grid.get(self.omem as i32) as u16;
                self.out_filter(v);
                next
            }
            BfOp::OutPwm => {
                let v = self.grid.get(self.omem as i32);
                self.out_pwm(v);
                next
            }
            BfOp::SampleIn => {
                let v = self.signal();
                self.grid.set(self.omem as i32, v);
                next
            }
            BfOp::Open => {
                self.brackets.push(ip);
                next
            }
            BfOp::Close => {
                if let Some(back) = self.brackets.top() {
                    if self.grid.get(self.omem as i32) != 0 {
                        // Jump without popping; the loop head stays
                        // saved for the next iteration.
                        return back;
                    }
                    self.brackets.pop();
                }
                next
            }
        }
    }
}
