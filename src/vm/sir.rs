//! The SIR instruction set: 6 epidemic-model ops over the IP's
//! immediate neighborhood (susceptible / infected / recovered).

use crate::actuator::ActuatorSink;
use crate::knobs::KnobSource;

use super::Vm;

/// Cell taken out of the epidemic for good.
pub const DEAD: u8 = 255;
/// Cell that survived infection.
pub const RECOVERED: u8 = 129;
/// Cell that has never been infected.
pub const SUSCEPTIBLE: u8 = 0;

/// Infected cells count upward in (0, 128).
fn infected(v: u8) -> bool {
    v > 0 && v < 128
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SirOp {
    /// Filter gets the 16-bit sum of both IP neighbors.
    OutFilter,
    /// PWM gets the same sum, wrapped to a byte.
    OutPwm,
    /// Disease progression: an infected successor ages this cell.
    IncIf,
    /// An infected successor kills this cell with probability 4/10.
    DieIf,
    /// A recovered-or-dead successor makes this cell recovered.
    RecoverIf,
    /// A susceptible successor next to infection catches it with
    /// probability 4/10.
    InfectIf,
}

impl SirOp {
    pub const COUNT: u8 = 6;

    pub fn decode(byte: u8) -> Self {
        match byte % Self::COUNT {
            0 => SirOp::OutFilter,
            1 => SirOp::OutPwm,
            2 => SirOp::IncIf,
            3 => SirOp::DieIf,
            4 => SirOp::RecoverIf,
            _ => SirOp::InfectIf,
        }
    }
}

impl<K: KnobSource, S: ActuatorSink> Vm<K, S> {
    pub(crate) fn step_sir(&mut self, op: SirOp) -> u8 {
        let ip = self.ip;
        let succ = self.grid.get(ip as i32 + 1);
        let pred = self.grid.get(ip as i32 - 1);
        match op {
            SirOp::OutFilter => {
                let v = succ as u16 + pred as u16;
                self.out_filter(v);
            }
            SirOp::OutPwm => {
                self.out_pwm(succ.wrapping_add(pred));
            }
            SirOp::IncIf => {
                if infected(succ) {
                    let v = self.grid.get(ip as i32).wrapping_add(1);
                    self.grid.set(ip as i32, v);
                }
            }
            SirOp::DieIf => {
                if infected(succ) && self.rng.roll10() < 4 {
                    self.grid.set(ip as i32, DEAD);
                }
            }
            SirOp::RecoverIf => {
                if succ >= 128 {
                    self.grid.set(ip as i32, RECOVERED);
                }
            }
            SirOp::InfectIf => {
                // The successor is known susceptible in this branch, so
                // only the predecessor can seed the infection.
                if succ == SUSCEPTIBLE && infected(pred) && self.rng.roll10() < 4 {
                    self.grid.set(ip as i32, 1);
                }
            }
        }
        self.advance(ip)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::vm;
    use super::*;
    use crate::rng::Lfsr8;

    #[test]
    fn inc_if_ages_next_to_infection() {
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(11, 5);
        vm.step_sir(SirOp::IncIf);
        assert_eq!(vm.grid.get(10), 1);

        vm.grid.set(11, 128); // recovered territory, no aging
        vm.step_sir(SirOp::IncIf);
        assert_eq!(vm.grid.get(10), 1);
    }

    #[test]
    fn recover_if_is_deterministic() {
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(11, 129);
        vm.step_sir(SirOp::RecoverIf);
        assert_eq!(vm.grid.get(10), RECOVERED);
    }

    #[test]
    fn die_if_follows_the_rng() {
        // Seed 2 rolls 1 (dies), seed 14 rolls 7 (survives).
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(11, 5);
        vm.rng = Lfsr8::from_seed(2);
        vm.step_sir(SirOp::DieIf);
        assert_eq!(vm.grid.get(10), DEAD);

        vm.grid.set(10, 0);
        vm.rng = Lfsr8::from_seed(14);
        vm.step_sir(SirOp::DieIf);
        assert_eq!(vm.grid.get(10), 0);
    }

    #[test]
    fn infect_if_needs_susceptible_successor_and_infected_predecessor() {
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(9, 3);
        vm.grid.set(11, 0);
        vm.rng = Lfsr8::from_seed(2); // rolls 1, below 4
        vm.step_sir(SirOp::InfectIf);
        assert_eq!(vm.grid.get(10), 1);

        // A non-zero successor blocks infection outright.
        vm.grid.set(10, 0);
        vm.grid.set(11, 200);
        vm.rng = Lfsr8::from_seed(2);
        vm.step_sir(SirOp::InfectIf);
        assert_eq!(vm.grid.get(10), 0);
    }

    #[test]
    fn outputs_sum_the_neighborhood() {
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(9, 200);
        vm.grid.set(11, 100);
        vm.step_sir(SirOp::OutFilter);
        // ShiftLeft at depth 0: the 16-bit sum goes through unscaled.
        assert_eq!(vm.sink.filter_duty, 300);
        vm.step_sir(SirOp::OutPwm);
        assert_eq!(vm.sink.pwm_duty, 300u16 as u8);
    }
}
