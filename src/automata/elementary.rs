//! 1-D elementary automaton over a ring of 16 rows.
//!
//! Each invocation computes one row from the one above it: the
//! three-neighbor pattern (thresholded at > 128) selects a bit of the
//! rule byte in cell 0, and the selected bit writes 255 or 0 into the
//! next row. The row index rotates mod 16, so the automaton scrolls
//! through the whole grid.

use crate::grid::Grid;

use super::ROW;

#[derive(Debug, Clone, Copy, Default)]
pub struct CelState {
    row: i32,
}

impl CelState {
    pub fn row(&self) -> i32 {
        self.row
    }

    pub fn step(&mut self, grid: &mut Grid) {
        self.row = (self.row + 1) % ROW;
        let rule = grid.get(0);
        let base = self.row * ROW;
        let next = ((self.row + 1) % ROW) * ROW;

        for cell in 1..ROW {
            let mut pattern = 0u8;
            if grid.get(base + cell + 1) > 128 {
                pattern |= 0x4;
            }
            if grid.get(base + cell) > 128 {
                pattern |= 0x2;
            }
            if grid.get(base + cell - 1) > 128 {
                pattern |= 0x1;
            }
            let alive = (rule >> pattern) & 1 != 0;
            grid.set(next + cell, if alive { 255 } else { 0 });
        }
    }
}
