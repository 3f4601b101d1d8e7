//! The reddeath instruction set: 7 ops gated by a masque-ball clock.
//!
//! The tick op counts the hours. At midnight (`clock == 12`) the plague
//! op sweeps forward copying cells until the IP reaches 255, which
//! advances the phase to 13. Phase 13 is absorbing by design: every
//! death op injects one fresh sample at a rotating offset and leaves
//! the IP exactly where it is, forever.

use crate::actuator::{ActuatorSink, FilterClock};
use crate::knobs::KnobSource;

use super::Vm;

/// Phase in which the plague sweep replicates cells.
const MIDNIGHT: u8 = 12;
/// The absorbing final phase.
const AFTERMATH: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedDeathOp {
    /// Phase 12 sweep: copy the IP cell forward and advance by one.
    Plague,
    /// Phase 13 absorber: inject a sample, never move.
    Death,
    /// Advance the clock; every 60 ticks the output is silenced by
    /// inverting the PWM register.
    Tick,
    /// Pick one of seven filter rooms keyed by `ip % 7`.
    Rooms,
    /// XOR both IP neighbors with 0xFF.
    Unmask,
    /// The prince: move the cursor one random cardinal step and output
    /// its cell.
    Prospero,
    /// The outside: sample into the cell after the cursor, send the
    /// cursor cell to the filter.
    Outside,
}

impl RedDeathOp {
    pub const COUNT: u8 = 7;

    pub fn decode(byte: u8) -> Self {
        match byte % Self::COUNT {
            0 => RedDeathOp::Plague,
            1 => RedDeathOp::Death,
            2 => RedDeathOp::Tick,
            3 => RedDeathOp::Rooms,
            4 => RedDeathOp::Unmask,
            5 => RedDeathOp::Prospero,
            _ => RedDeathOp::Outside,
        }
    }
}

/// The seven rooms: filter clock and, for the lit rooms, a depth.
fn room(index: u8) -> (FilterClock, Option<u8>) {
    match index % 7 {
        0 => (FilterClock::Div1, Some(8)),
        1 => (FilterClock::Div1, None),
        2 => (FilterClock::Div8, Some(8)),
        3 => (FilterClock::Div8, None),
        4 => (FilterClock::Div64, None),
        5 => (FilterClock::Div256, None),
        _ => (FilterClock::Off, None),
    }
}

impl<K: KnobSource, S: ActuatorSink> Vm<K, S> {
    pub(crate) fn step_reddeath(&mut self, op: RedDeathOp) -> u8 {
        let ip = self.ip;
        match op {
            RedDeathOp::Plague => {
                if self.clock == MIDNIGHT {
                    let v = self.grid.get(ip as i32);
                    self.grid.set(ip as i32 + 1, v);
                    if ip == 255 {
                        self.clock = AFTERMATH;
                    }
                    ip.wrapping_add(1)
                } else {
                    self.advance(ip)
                }
            }
            RedDeathOp::Death => {
                if self.clock == AFTERMATH {
                    self.inject_at = self.inject_at.wrapping_add(1);
                    let v = self.signal();
                    self.grid.set(ip as i32 + self.inject_at as i32, v);
                    ip
                } else {
                    self.advance(ip)
                }
            }
            RedDeathOp::Tick => {
                self.clock = self.clock.wrapping_add(1);
                if self.clock % 60 == 0 {
                    self.sink.invert_pwm();
                    ip
                } else {
                    self.advance(ip)
                }
            }
            RedDeathOp::Rooms => {
                let (clock, depth) = room(ip % 7);
                self.sink.set_filter_clock(clock);
                if let Some(depth) = depth {
                    self.filter.depth = depth;
                }
                self.advance(ip)
            }
            RedDeathOp::Unmask => {
                let pred = self.grid.get(ip as i32 - 1) ^ 0xFF;
                let succ = self.grid.get(ip as i32 + 1) ^ 0xFF;
                self.grid.set(ip as i32 - 1, pred);
                self.grid.set(ip as i32 + 1, succ);
                self.advance(ip)
            }
            RedDeathOp::Prospero => {
                let heading = match self.rng.next() % 4 {
                    0 => crate::grid::Heading::East,
                    1 => crate::grid::Heading::West,
                    2 => crate::grid::Heading::South,
                    _ => crate::grid::Heading::North,
                };
                self.omem = heading.step(self.omem);
                let v = self.grid.get(self.omem as i32);
                self.out_pwm(v);
                self.advance(ip)
            }
            RedDeathOp::Outside => {
                let v = self.signal();
                self.grid.set(self.omem as i32 + 1, v);
                let out = self.grid.get(self.omem as i32) as u16;
                self.out_filter(out);
                self.advance(ip)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{vm, vm_with};
    use super::super::InstructionSet;
    use super::*;
    use crate::knobs::ConstKnobs;

    #[test]
    fn ops_fall_through_before_midnight() {
        let mut vm = vm();
        vm.ip = 10;
        assert_eq!(vm.step_reddeath(RedDeathOp::Plague), 11);
        assert_eq!(vm.step_reddeath(RedDeathOp::Death), 11);
        assert_eq!(vm.grid.get(11), 0);
    }

    #[test]
    fn tick_silences_every_sixty_hours() {
        let mut vm = vm();
        vm.sink.set_pwm_duty(0xAA);
        for hour in 1..=59 {
            let next = vm.step_reddeath(RedDeathOp::Tick);
            assert_eq!(next, 1, "hour {hour} should step on");
            vm.clock = hour; // keep the phase pinned below 60
        }
        vm.clock = 59;
        let next = vm.step_reddeath(RedDeathOp::Tick);
        assert_eq!(next, 0, "the sixtieth hour freezes the ip");
        assert_eq!(vm.sink.pwm_duty, 0x55);
    }

    #[test]
    fn plague_sweep_replicates_until_wrap() {
        let mut vm = vm();
        vm.clock = MIDNIGHT;
        vm.ip = 254;
        vm.grid.set(254, 70);
        assert_eq!(vm.step_reddeath(RedDeathOp::Plague), 255);
        assert_eq!(vm.grid.get(255), 70);
        assert_eq!(vm.clock, MIDNIGHT);

        vm.ip = 255;
        assert_eq!(vm.step_reddeath(RedDeathOp::Plague), 0);
        assert_eq!(vm.clock, AFTERMATH, "reaching 255 ends the sweep");
        assert_eq!(vm.grid.get(0), 70);
    }

    #[test]
    fn aftermath_absorbs_for_a_thousand_ticks() {
        // Signal samples of 8 decode back to the death op, so the
        // injected cells keep the machine in its absorbing state.
        let mut vm = vm_with(ConstKnobs {
            signal: 8,
            ..ConstKnobs::silent()
        });
        for i in 0..256 {
            vm.grid.set(i, 1); // every opcode is Death
        }
        vm.clock = AFTERMATH;
        vm.ip = 77;
        let mut touched = [false; 256];
        for tick in 1..=1000u32 {
            vm.step(InstructionSet::RedDeath);
            assert_eq!(vm.ip, 77, "tick {tick} must not move the ip");
            touched[77usize.wrapping_add(tick as usize) % 256] = true;
        }
        for i in 0..256usize {
            let expect = if touched[i] { 8 } else { 1 };
            assert_eq!(
                vm.grid.get(i as i32),
                expect,
                "cell {i} should only change at the rotating offset"
            );
        }
    }

    #[test]
    fn rooms_program_the_filter_clock() {
        let mut vm = vm();
        vm.ip = 14; // 14 % 7 == 0: the blue room
        vm.step_reddeath(RedDeathOp::Rooms);
        assert_eq!(vm.sink.filter_clock, FilterClock::Div1);
        assert_eq!(vm.filter.depth, 8);

        vm.ip = 6; // the black room: filter off, depth untouched
        vm.step_reddeath(RedDeathOp::Rooms);
        assert_eq!(vm.sink.filter_clock, FilterClock::Off);
        assert_eq!(vm.filter.depth, 8);
    }

    #[test]
    fn unmask_inverts_both_neighbors() {
        let mut vm = vm();
        vm.ip = 10;
        vm.grid.set(9, 0x0F);
        vm.grid.set(11, 0xFF);
        vm.step_reddeath(RedDeathOp::Unmask);
        assert_eq!(vm.grid.get(9), 0xF0);
        assert_eq!(vm.grid.get(11), 0x00);
    }

    #[test]
    fn outside_samples_past_the_cursor() {
        let mut vm = vm_with(ConstKnobs {
            signal: 99,
            ..ConstKnobs::silent()
        });
        vm.omem = 40;
        vm.grid.set(40, 7);
        vm.step_reddeath(RedDeathOp::Outside);
        assert_eq!(vm.grid.get(41), 99);
        assert_eq!(vm.sink.filter_duty, 7);
    }

    #[test]
    fn prospero_moves_one_cardinal_step() {
        let mut vm = vm();
        vm.omem = 5 + 5 * 16;
        vm.step_reddeath(RedDeathOp::Prospero);
        let dist = (vm.omem as i32 - (5 + 5 * 16) as i32).abs();
        assert!(
            dist == 1 || dist == 16,
            "cursor should move one cardinal step, moved {dist}"
        );
        assert_eq!(vm.sink.pwm_duty, 0);
    }
}
