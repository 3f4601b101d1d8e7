//! The redcode instruction set: 11 Core-War-style ops. Every operand is
//! addressed relative to the IP through the next one or two opcode
//! bytes, wrapping on the torus; the stride is 3 except for taken jumps.

use crate::actuator::ActuatorSink;
use crate::knobs::KnobSource;

use super::Vm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedcodeOp {
    Mov,
    Add,
    Sub,
    /// Relative jump by the next byte.
    Jmp,
    /// Jump to the literal next byte when the addressed cell is zero.
    Jmz,
    /// Jump when the addressed cell is non-zero. The cells are unsigned
    /// bytes, so the classical "jump if >= 0" degenerates to "> 0";
    /// that tested behavior is kept as is.
    Jmg,
    /// Decrement the addressed cell, jump when it hits zero.
    Djz,
    /// Three-byte data slot.
    Dat,
    /// Skip 6 when the two addressed cells differ, else skip 3.
    Cmp,
    OutFilter,
    OutPwm,
}

impl RedcodeOp {
    pub const COUNT: u8 = 11;

    pub fn decode(byte: u8) -> Self {
        match byte % Self::COUNT {
            0 => RedcodeOp::Mov,
            1 => RedcodeOp::Add,
            2 => RedcodeOp::Sub,
            3 => RedcodeOp::Jmp,
            4 => RedcodeOp::Jmz,
            5 => RedcodeOp::Jmg,
            6 => RedcodeOp::Djz,
            7 => RedcodeOp::Dat,
            8 => RedcodeOp::Cmp,
            9 => RedcodeOp::OutFilter,
            _ => RedcodeOp::OutPwm,
        }
    }
}

impl<K: KnobSource, S: ActuatorSink> Vm<K, S> {
    /// Cell address `ip + grid[ip + operand]`, wrapping.
    fn rd_addr(&self, operand: i32) -> i32 {
        self.ip as i32 + self.grid.get(self.ip as i32 + operand) as i32
    }

    pub(crate) fn step_redcode(&mut self, op: RedcodeOp) -> u8 {
        let ip = self.ip;
        let skip = ip.wrapping_add(3);
        match op {
            RedcodeOp::Mov => {
                let v = self.grid.get(self.rd_addr(1));
                self.grid.set(self.rd_addr(2), v);
                skip
            }
            RedcodeOp::Add => {
                let v = self.grid.get(self.rd_addr(2)).wrapping_add(self.grid.get(self.rd_addr(1)));
                self.grid.set(self.rd_addr(2), v);
                skip
            }
            RedcodeOp::Sub => {
                let v = self.grid.get(self.rd_addr(2)).wrapping_sub(self.grid.get(self.rd_addr(1)));
                self.grid.set(self.rd_addr(2), v);
                skip
            }
            RedcodeOp::Jmp => ip.wrapping_add(self.grid.get(ip as i32 + 1)),
            RedcodeOp::Jmz => {
                if self.grid.get(self.rd_addr(2)) == 0 {
                    self.grid.get(ip as i32 + 1)
                } else {
                    skip
                }
            }
            RedcodeOp::Jmg => {
                if self.grid.get(self.rd_addr(2)) > 0 {
                    self.grid.get(ip as i32 + 1)
                } else {
                    skip
                }
            }
            RedcodeOp::Djz => {
                let addr = self.rd_addr(2);
                let v = self.grid.get(addr).wrapping_sub(1);
                self.grid.set(addr, v);
                if v == 0 { self.grid.get(ip as i32 + 1) } else { skip }
            }
            RedcodeOp::Dat => skip,
            RedcodeOp::Cmp => {
                if self.grid.get(self.rd_addr(2)) != self.grid.get(self.rd_addr(1)) {
                    ip.wrapping_add(6)
                } else {
                    skip
                }
            }
            RedcodeOp::OutFilter => {
                let v = self.grid.get(ip as i32 + 1) as u16;
                self.out_filter(v);
                skip
            }
            RedcodeOp::OutPwm => {
                let v = self.grid.get(ip as i32 + 2);
                self.out_pwm(v);
                skip
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::vm;
    use super::super::InstructionSet;
    use super::*;

    #[test]
    fn mov_copies_between_relative_cells() {
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(11, 30); // src offset
        vm.grid.set(12, 60); // dst offset
        vm.grid.set(40, 123);
        assert_eq!(vm.step_redcode(RedcodeOp::Mov), 13);
        assert_eq!(vm.grid.get(70), 123);
    }

    #[test]
    fn add_and_sub_are_wrapping() {
        let mut vm = vm();
        vm.ip = 0;
        vm.grid.set(1, 50);
        vm.grid.set(2, 60);
        vm.grid.set(50, 200);
        vm.grid.set(60, 100);
        vm.step_redcode(RedcodeOp::Add);
        assert_eq!(vm.grid.get(60), 44, "200 + 100 wraps to 44");
        vm.step_redcode(RedcodeOp::Sub);
        assert_eq!(vm.grid.get(60), 44u8.wrapping_sub(200));
    }

    #[test]
    fn cmp_skips_double_on_mismatch() {
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(11, 40);
        vm.grid.set(12, 50);
        assert_eq!(vm.step_redcode(RedcodeOp::Cmp), 13, "equal cells skip 3");
        vm.grid.set(60, 9);
        assert_eq!(vm.step_redcode(RedcodeOp::Cmp), 16, "unequal cells skip 6");
    }

    #[test]
    fn jmg_is_unsigned_greater_than_zero() {
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(11, 77);
        vm.grid.set(12, 90);
        // Addressed cell holds 200; under a signed reading that would
        // be negative, but the unsigned test takes the jump.
        vm.grid.set(100, 200);
        assert_eq!(vm.step_redcode(RedcodeOp::Jmg), 77);
        vm.grid.set(100, 0);
        assert_eq!(vm.step_redcode(RedcodeOp::Jmg), 13);
    }

    #[test]
    fn literal_program_traces_through_jmz_jmg_djz() {
        let mut vm = vm();
        // At 0: jmz with target 9, operand addressing cell 100 (zero)
        vm.grid.set(0, 4);
        vm.grid.set(1, 9);
        vm.grid.set(2, 100);
        // At 9: jmg with target 20, operand addressing cell 110 (five)
        vm.grid.set(9, 5);
        vm.grid.set(10, 20);
        vm.grid.set(11, 101);
        vm.grid.set(110, 5);
        // At 20: djz with target 40, operand addressing cell 120 (one)
        vm.grid.set(20, 6);
        vm.grid.set(21, 40);
        vm.grid.set(22, 100);
        vm.grid.set(120, 1);

        let mut trace = vec![vm.ip];
        for _ in 0..3 {
            vm.step(InstructionSet::Redcode);
            trace.push(vm.ip);
        }
        assert_eq!(trace, vec![0, 9, 20, 40]);
        assert_eq!(vm.grid.get(120), 0, "djz decremented its cell to zero");
    }

    #[test]
    fn outputs_read_their_operand_slots() {
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(11, 3);
        vm.grid.set(12, 250);
        vm.step_redcode(RedcodeOp::OutFilter);
        assert_eq!(vm.sink.filter_duty, 3);
        vm.step_redcode(RedcodeOp::OutPwm);
        assert_eq!(vm.sink.pwm_duty, 250);
    }
}
