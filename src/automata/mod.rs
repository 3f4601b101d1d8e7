//! Cellular-automaton generators: periodic rewrite passes over the grid.
//!
//! Five families share one selection table; the dispatch loop picks an
//! index (0-7) from the controls knob and an invocation period of 1-32
//! ticks. The buffered families (sir, hodge, life) split the grid into
//! two 128-cell halves and read the previous generation from the other
//! half, toggling a persistent role flag once per full pass. Rule
//! parameters live in ordinary grid cells, so the automata rewrite
//! their own rules as they run; that self-reference is core behavior.

pub mod elementary;
pub mod hodge;
pub mod life;
pub mod mutate;
pub mod sir;

use crate::grid::Grid;
use crate::rng::Lfsr8;

/// Cells per half-buffer.
pub(crate) const HALF: i32 = 128;
/// Row length of the half-buffer's 16-wide view.
pub(crate) const ROW: i32 = 16;

/// Base indices of the (source, destination) halves for a role flag.
pub(crate) fn half_bases(flip: bool) -> (i32, i32) {
    if flip { (HALF, 0) } else { (0, HALF) }
}

/// The five algorithm families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Mutate,
    Sir,
    Hodge,
    Cel,
    Life,
}

/// Generator selection table for knob index 0-7. Several indices share
/// a family; the doubled entries are part of the instrument's feel and
/// stay as they are.
pub fn family_for(index: u8) -> Family {
    match index % 8 {
        0 | 7 => Family::Mutate,
        1 | 5 => Family::Sir,
        2 | 4 => Family::Hodge,
        3 => Family::Cel,
        _ => Family::Life,
    }
}

/// Persistent per-generator state, owned by the engine and initialized
/// once at construction.
#[derive(Debug, Clone, Default)]
pub struct Automata {
    pub sir: sir::SirState,
    pub hodge: hodge::HodgeState,
    pub cel: elementary::CelState,
    pub life: life::LifeState,
}

impl Automata {
    pub fn new() -> Self {
        Automata::default()
    }

    /// Run one invocation of the generator at `index`.
    pub fn run(&mut self, index: u8, grid: &mut Grid, rng: &mut Lfsr8) {
        match family_for(index) {
            Family::Mutate => mutate::step(grid, rng),
            Family::Sir => self.sir.step(grid, rng),
            Family::Hodge => self.hodge.step(grid),
            Family::Cel => self.cel.step(grid),
            Family::Life => self.life.step(grid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_table_mirrors_the_knob_layout() {
        assert_eq!(family_for(0), Family::Mutate);
        assert_eq!(family_for(1), Family::Sir);
        assert_eq!(family_for(2), Family::Hodge);
        assert_eq!(family_for(3), Family::Cel);
        assert_eq!(family_for(4), Family::Hodge);
        assert_eq!(family_for(5), Family::Sir);
        assert_eq!(family_for(6), Family::Life);
        assert_eq!(family_for(7), Family::Mutate);
    }

    #[test]
    fn half_bases_swap_with_the_flag() {
        assert_eq!(half_bases(false), (0, 128));
        assert_eq!(half_bases(true), (128, 0));
    }
}
