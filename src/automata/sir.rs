//! SIR epidemic generator over the half-buffers.
//!
//! The recovery threshold lives in grid cell 0 and the infection
//! probability (in tenths) in cell 1, read there on every pass no
//! matter which half is the source; both are ordinary grid data.
//! Interior cells read their four von-Neumann neighbors from the
//! previous generation.

use crate::grid::Grid;
use crate::rng::Lfsr8;

use super::{half_bases, ROW};

/// Cells that reach the threshold leave the epidemic at this value.
pub const RECOVERED: u8 = 129;

/// Interior of the half-buffer: one 16-cell row of margin each side.
const INTERIOR: std::ops::Range<i32> = ROW..(super::HALF - ROW);

#[derive(Debug, Clone, Copy, Default)]
pub struct SirState {
    flip: bool,
}

impl SirState {
    /// One full pass over the interior; toggles the buffer roles.
    pub fn step(&mut self, grid: &mut Grid, rng: &mut Lfsr8) {
        let (src, dst) = half_bases(self.flip);
        // Rule parameters are absolute cells, not half-relative.
        let kk = grid.get(0);
        let p = grid.get(1);

        for x in INTERIOR {
            let cell = grid.get(src + x);
            let infected = |v: u8| v > 0 && v < kk;
            let next = if cell >= kk {
                RECOVERED
            } else if cell > 0 {
                cell.wrapping_add(1)
            } else {
                let exposed = infected(grid.get(src + x - ROW))
                    || infected(grid.get(src + x + ROW))
                    || infected(grid.get(src + x - 1))
                    || infected(grid.get(src + x + 1));
                if exposed && rng.roll10() < p { 1 } else { cell }
            };
            grid.set(dst + x, next);
        }
        self.flip = !self.flip;
    }
}
