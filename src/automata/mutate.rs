//! Noise mutation: XOR random cells with the low nibble of their own
//! address. Cell 0 is the iteration count, so the automaton reads how
//! hard to mutate out of the very memory it mutates.

use crate::grid::Grid;
use crate::rng::Lfsr8;

pub fn step(grid: &mut Grid, rng: &mut Lfsr8) {
    let rounds = grid.get(0);
    for _ in 0..rounds {
        let addr = rng.next();
        let v = grid.get(addr as i32) ^ (addr & 0x0F);
        grid.set(addr as i32, v);
    }
}
