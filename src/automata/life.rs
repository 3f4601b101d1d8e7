//! Parity-Life generator.
//!
//! Aliveness is the parity of a cell's magnitude, summed over the
//! 8-neighbor Moore neighborhood of the previous generation. The birth
//! rule is deliberately narrower than Conway's: a cell is alive in the
//! next buffer only when its neighbor sum (self excluded) is exactly
//! three. There is no survive-on-two branch; that is an intentional
//! variant of this instrument, not an oversight.

use crate::grid::Grid;

use super::{half_bases, ROW};

/// Interior of the half-buffer: a full row margin plus one cell.
const INTERIOR: std::ops::Range<i32> = (ROW + 1)..(super::HALF - ROW - 1);

const NEIGHBORS: [i32; 8] = [-1, 1, -ROW, ROW, -ROW - 1, -ROW + 1, ROW - 1, ROW + 1];

#[derive(Debug, Clone, Copy, Default)]
pub struct LifeState {
    flip: bool,
}

impl LifeState {
    pub fn step(&mut self, grid: &mut Grid) {
        let (src, dst) = half_bases(self.flip);
        for x in INTERIOR {
            let mut sum = 0u8;
            for off in NEIGHBORS {
                sum += grid.get(src + x + off) % 2;
            }
            grid.set(dst + x, if sum == 3 { 255 } else { 0 });
        }
        self.flip = !self.flip;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expected next value straight from the rule, for fixture checks.
    fn expect(src: &Grid, x: i32) -> u8 {
        let sum: u8 = NEIGHBORS.iter().map(|off| src.get(x + off) % 2).sum();
        if sum == 3 { 255 } else { 0 }
    }

    #[test]
    fn exactly_three_neighbors_give_birth() {
        let mut grid = Grid::new();
        // Three odd cells around 50, even everywhere else.
        grid.set(49, 1);
        grid.set(51, 7);
        grid.set(34, 255);
        let mut state = LifeState::default();
        state.step(&mut grid);
        assert_eq!(grid.get(128 + 50), 255);
    }

    #[test]
    fn two_neighbors_do_not_sustain() {
        let mut grid = Grid::new();
        // A live cell with two live neighbors dies: no survive branch.
        grid.set(50, 1);
        grid.set(49, 1);
        grid.set(51, 1);
        let mut state = LifeState::default();
        state.step(&mut grid);
        assert_eq!(grid.get(128 + 50), 0, "sum of two must not survive");
        // Its neighbors each see sum two as well and die too.
        assert_eq!(grid.get(128 + 49), 0);
    }

    #[test]
    fn magnitude_is_ignored_only_parity_counts() {
        let mut grid = Grid::new();
        grid.set(49, 200); // even, dead despite the loud value
        grid.set(51, 1);
        grid.set(34, 3);
        grid.set(66, 99);
        let mut state = LifeState::default();
        state.step(&mut grid);
        assert_eq!(grid.get(128 + 50), 255, "three odd neighbors out of four");
    }

    #[test]
    fn full_interior_matches_the_rule_fixture() {
        let mut grid = Grid::new();
        // A deterministic speckle over the whole source half.
        for x in 0..128 {
            grid.set(x, ((x * 37 + 11) % 251) as u8);
        }
        let src = grid.clone();
        let mut state = LifeState::default();
        state.step(&mut grid);
        for x in INTERIOR {
            assert_eq!(grid.get(128 + x), expect(&src, x), "cell {x}");
        }
        // Margin cells of the destination half stay untouched.
        assert_eq!(grid.get(128), src.get(128));
        assert_eq!(grid.get(128 + 16), src.get(128 + 16));
    }

    #[test]
    fn roles_alternate_between_halves() {
        let mut grid = Grid::new();
        let mut state = LifeState::default();
        state.step(&mut grid);
        // Second pass writes the first half; a glider-less zero grid
        // stays zero, but the write target flips.
        grid.set(128 + 49, 1);
        grid.set(128 + 51, 1);
        grid.set(128 + 34, 1);
        state.step(&mut grid);
        assert_eq!(grid.get(50), 255);
    }
}
