//! The "first" instruction set: 26 general-purpose ops mixing pointer
//! moves, cell arithmetic, sample capture, shifts, branching and output.
//! All ops advance by `insdir` except a taken short jump.

use crate::actuator::ActuatorSink;
use crate::knobs::KnobSource;

use super::Vm;

/// Opcode table of the first set, in slot order. Slots 0 and 10 share
/// one behavior; they stay distinct so the opcode map keeps its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstOp {
    OutFilterA,
    /// PWM gets the working pointer itself, not the cell under it.
    OutPwmPtr,
    PtrInc,
    PtrDec,
    CellInc,
    CellDec,
    SampleToPtr,
    KnobToPtr,
    KnobToIp,
    SampleToCell,
    OutFilterB,
    OutPwmCell,
    Plus,
    Minus,
    Shift1,
    Shift2,
    Shift3,
    /// Jump to `grid[omem]` when the next cell is zero.
    Branch,
    /// Relative jump; offsets of 128 and above fall through.
    Jump,
    /// Copy the IP cell forward one slot when the predecessor is alive
    /// (below 128).
    Infect,
    /// Indirect load: the next cell addresses the value stored here.
    Store,
    KnobHere,
    SampleHere,
    Skip,
    Reverse,
    Die,
}

impl FirstOp {
    pub const COUNT: u8 = 26;

    pub fn decode(byte: u8) -> Self {
        match byte % Self::COUNT {
            0 => FirstOp::OutFilterA,
            1 => FirstOp::OutPwmPtr,
            2 => FirstOp::PtrInc,
            3 => FirstOp::PtrDec,
            4 => FirstOp::CellInc,
            5 => FirstOp::CellDec,
            6 => FirstOp::SampleToPtr,
            7 => FirstOp::KnobToPtr,
            8 => FirstOp::KnobToIp,
            9 => FirstOp::SampleToCell,
            10 => FirstOp::OutFilterB,
            11 => FirstOp::OutPwmCell,
            12 => FirstOp::Plus,
            13 => FirstOp::Minus,
            14 => FirstOp::Shift1,
            15 => FirstOp::Shift2,
            16 => FirstOp::Shift3,
            17 => FirstOp::Branch,
            18 => FirstOp::Jump,
            19 => FirstOp::Infect,
            20 => FirstOp::Store,
            21 => FirstOp::KnobHere,
            22 => FirstOp::SampleHere,
            23 => FirstOp::Skip,
            24 => FirstOp::Reverse,
            _ => FirstOp::Die,
        }
    }
}

impl<K: KnobSource, S: ActuatorSink> Vm<K, S> {
    pub(crate) fn step_first(&mut self, op: FirstOp) -> u8 {
        let ip = self.ip;
        match op {
            FirstOp::OutFilterA | FirstOp::OutFilterB => {
                let v = self.grid.get(self.omem as i32) as u16;
                self.out_filter(v);
                self.advance(ip)
            }
            FirstOp::OutPwmPtr => {
                let v = self.omem;
                self.out_pwm(v);
                self.advance(ip)
            }
            FirstOp::OutPwmCell => {
                let v = self.grid.get(self.omem as i32);
                self.out_pwm(v);
                self.advance(ip)
            }
            FirstOp::PtrInc => {
                self.omem = self.omem.wrapping_add(1);
                self.advance(ip)
            }
            FirstOp::PtrDec => {
                self.omem = self.omem.wrapping_sub(1);
                self.advance(ip)
            }
            FirstOp::CellInc => {
                let v = self.grid.get(self.omem as i32).wrapping_add(1);
                self.grid.set(self.omem as i32, v);
                self.advance(ip)
            }
            FirstOp::CellDec => {
                let v = self.grid.get(self.omem as i32).wrapping_sub(1);
                self.grid.set(self.omem as i32, v);
                self.advance(ip)
            }
            FirstOp::SampleToPtr => {
                self.omem = self.signal();
                self.advance(ip)
            }
            FirstOp::KnobToPtr => {
                self.omem = self.controls_knob();
                self.advance(ip)
            }
            FirstOp::KnobToIp => {
                let ip = self.controls_knob();
                self.advance(ip)
            }
            FirstOp::SampleToCell => {
                let v = self.signal();
                self.grid.set(self.omem as i32, v);
                self.advance(ip)
            }
            FirstOp::Plus => {
                let v = self.grid.get(ip as i32).wrapping_add(1);
                self.grid.set(ip as i32, v);
                self.advance(ip)
            }
            FirstOp::Minus => {
                let v = self.grid.get(ip as i32).wrapping_sub(1);
                self.grid.set(ip as i32, v);
                self.advance(ip)
            }
            FirstOp::Shift1 => self.shift_here(1),
            FirstOp::Shift2 => self.shift_here(2),
            FirstOp::Shift3 => self.shift_here(3),
            FirstOp::Branch => {
                let mut ip = ip;
                if self.grid.get(ip as i32 + 1) == 0 {
                    ip = self.grid.get(self.omem as i32);
                }
                self.advance(ip)
            }
            FirstOp::Jump => {
                let off = self.grid.get(ip as i32 + 1);
                if off < 128 {
                    ip.wrapping_add(off)
                } else {
                    self.advance(ip)
                }
            }
            FirstOp::Infect => {
                if self.grid.get(ip as i32 - 1) < 128 {
                    let v = self.grid.get(ip as i32);
                    self.grid.set(ip as i32 + 1, v);
                }
                self.advance(ip)
            }
            FirstOp::Store => {
                let addr = self.grid.get(ip as i32 + 1);
                let v = self.grid.get(addr as i32);
                self.grid.set(ip as i32, v);
                self.advance(ip)
            }
            FirstOp::KnobHere => {
                let v = self.controls_knob();
                self.grid.set(ip as i32, v);
                self.advance(ip)
            }
            FirstOp::SampleHere => {
                let v = self.signal();
                self.grid.set(ip as i32, v);
                self.advance(ip)
            }
            FirstOp::Skip | FirstOp::Die => self.advance(ip),
            FirstOp::Reverse => {
                self.dir = if self.dir < 0 { 1 } else { -1 };
                self.advance(ip)
            }
        }
    }

    fn shift_here(&mut self, bits: u8) -> u8 {
        let ip = self.ip;
        let v = self.grid.get(ip as i32) << bits;
        self.grid.set(ip as i32, v);
        self.advance(ip)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{vm, vm_with};
    use super::*;
    use crate::knobs::ConstKnobs;

    #[test]
    fn decode_covers_the_table() {
        assert_eq!(FirstOp::decode(0), FirstOp::OutFilterA);
        assert_eq!(FirstOp::decode(25), FirstOp::Die);
        assert_eq!(FirstOp::decode(26), FirstOp::OutFilterA);
        assert_eq!(FirstOp::decode(17 + 26), FirstOp::Branch);
    }

    #[test]
    fn branch_jumps_when_next_cell_zero() {
        let mut vm = vm();
        vm.omem = 40;
        vm.grid.set(40, 99);
        // grid[ip + 1] is zero, so ip becomes grid[omem] then steps.
        let next = vm.step_first(FirstOp::Branch);
        assert_eq!(next, 100);
    }

    #[test]
    fn branch_falls_through_when_next_cell_set() {
        let mut vm = vm();
        vm.grid.set(1, 7);
        assert_eq!(vm.step_first(FirstOp::Branch), 1);
    }

    #[test]
    fn jump_applies_short_offsets_only() {
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(11, 50);
        assert_eq!(vm.step_first(FirstOp::Jump), 60);
        vm.grid.set(11, 128);
        assert_eq!(vm.step_first(FirstOp::Jump), 11, "long offsets fall through");
    }

    #[test]
    fn infect_copies_only_past_live_predecessor() {
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(10, 66);
        vm.grid.set(9, 3); // alive
        vm.step_first(FirstOp::Infect);
        assert_eq!(vm.grid.get(11), 66);

        vm.grid.set(9, 200); // dead marker blocks the copy
        vm.grid.set(11, 0);
        vm.step_first(FirstOp::Infect);
        assert_eq!(vm.grid.get(11), 0);
    }

    #[test]
    fn infect_predecessor_wraps_at_cell_zero() {
        let mut vm = vm();
        vm.grid.set(255, 5);
        vm.grid.set(0, 77);
        vm.step_first(FirstOp::Infect);
        assert_eq!(vm.grid.get(1), 77);
    }

    #[test]
    fn store_loads_indirect() {
        let mut vm = vm();
        vm.ip = 20;
        vm.grid.set(21, 130);
        vm.grid.set(130, 55);
        vm.step_first(FirstOp::Store);
        assert_eq!(vm.grid.get(20), 55);
    }

    #[test]
    fn shifts_scale_the_ip_cell() {
        let mut vm = vm();
        vm.grid.set(0, 3);
        vm.step_first(FirstOp::Shift1);
        assert_eq!(vm.grid.get(0), 6);
        vm.step_first(FirstOp::Shift2);
        assert_eq!(vm.grid.get(0), 24);
        vm.step_first(FirstOp::Shift3);
        assert_eq!(vm.grid.get(0), 192);
    }

    #[test]
    fn reverse_flips_default_direction() {
        let mut vm = vm();
        vm.step_first(FirstOp::Reverse);
        assert_eq!(vm.dir, -1);
        vm.step_first(FirstOp::Reverse);
        assert_eq!(vm.dir, 1);
    }

    #[test]
    fn captures_pull_from_the_right_channels() {
        let mut vm = vm_with(ConstKnobs {
            controls: 33,
            signal: 77,
            ..ConstKnobs::silent()
        });
        vm.step_first(FirstOp::KnobToPtr);
        assert_eq!(vm.omem, 33);
        vm.step_first(FirstOp::SampleToPtr);
        assert_eq!(vm.omem, 77);
        vm.omem = 5;
        vm.step_first(FirstOp::SampleToCell);
        assert_eq!(vm.grid.get(5), 77);
        vm.step_first(FirstOp::KnobHere);
        assert_eq!(vm.grid.get(0), 33);
    }

    #[test]
    fn knob_to_ip_resumes_from_knob_value() {
        let mut vm = vm_with(ConstKnobs {
            controls: 200,
            ..ConstKnobs::silent()
        });
        assert_eq!(vm.step_first(FirstOp::KnobToIp), 201);
    }

    #[test]
    fn pwm_ptr_outputs_the_pointer_not_the_cell() {
        let mut vm = vm();
        vm.omem = 123;
        vm.grid.set(123, 45);
        vm.step_first(FirstOp::OutPwmPtr);
        assert_eq!(vm.sink.pwm_duty, 123);
        vm.step_first(FirstOp::OutPwmCell);
        assert_eq!(vm.sink.pwm_duty, 45);
    }
}
