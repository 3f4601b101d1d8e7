//! Hodgepodge diffusion generator.
//!
//! The slowest automaton: one interior cell per invocation, advanced by
//! a persistent cursor that creeps across the half-buffer over many
//! calls before the buffer roles swap. Thresholds come from cells 0-3
//! of the source half: the state ceiling `q`, two census divisors and a
//! growth offset.

use crate::grid::Grid;

use super::{half_bases, ROW};

/// First interior cell: one row plus one column of margin.
const SWEEP_START: i32 = ROW + 1;
/// Last interior cell of the sweep.
const SWEEP_END: i32 = super::HALF - ROW - 1;

#[derive(Debug, Clone, Copy)]
pub struct HodgeState {
    cursor: i32,
    flip: bool,
}

impl Default for HodgeState {
    fn default() -> Self {
        HodgeState { cursor: SWEEP_START, flip: false }
    }
}

/// Offsets of the 4 edge and 4 corner neighbors.
const EDGES: [i32; 4] = [-1, 1, -ROW, ROW];
const CORNERS: [i32; 4] = [-ROW - 1, -ROW + 1, ROW - 1, ROW + 1];

impl HodgeState {
    /// Where the creeping cursor currently points (interior index into
    /// the half-buffer).
    pub fn cursor(&self) -> i32 {
        self.cursor
    }

    pub fn flipped(&self) -> bool {
        self.flip
    }

    /// Advance exactly one cell of the sweep.
    pub fn step(&mut self, grid: &mut Grid) {
        let (src, dst) = half_bases(self.flip);
        let q = grid.get(src) as i32;
        let k1 = grid.get(src + 1).max(1) as i32;
        let k2 = grid.get(src + 2).max(1) as i32;
        let g = grid.get(src + 3) as i32;

        let x = self.cursor;
        let at = |off: i32| grid.get(src + x + off) as i32;

        let mut sum = at(0);
        let mut ill = 0i32;
        let mut infected = 0i32;
        // Edge neighbors count as ill one state early (q - 1); corner
        // neighbors only at the ceiling itself.
        for off in EDGES {
            let v = at(off);
            sum += v;
            if v == q - 1 {
                ill += 1;
            } else if v > 0 {
                infected += 1;
            }
        }
        for off in CORNERS {
            let v = at(off);
            sum += v;
            if v == q {
                ill += 1;
            } else if v > 0 {
                infected += 1;
            }
        }

        let here = at(0);
        let mut next = if here == 0 {
            infected / k1 + ill / k2
        } else if here < q - 1 {
            sum / (infected + 1) + g
        } else {
            0
        };
        if next > q - 1 {
            next = q - 1;
        }
        grid.set(dst + x, next as u8);

        self.cursor += 1;
        if self.cursor > SWEEP_END {
            self.cursor = SWEEP_START;
            self.flip = !self.flip;
        }
    }
}
