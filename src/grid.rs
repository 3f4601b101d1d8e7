//! Toroidal cell grid: the 256-byte memory shared by every instruction
//! set and every generator.
//!
//! The same bytes are viewed two ways: linearly (index mod 256) by the
//! instruction pointer, and as a 16x16 row-major torus by the 2-D walking
//! ops. Every access normalizes its index before touching memory, so the
//! grid is total over all integer indices and "out of range" cannot occur.

/// Number of cells in the grid.
pub const GRID_LEN: usize = 256;

/// Side length of the 16x16 toroidal view.
pub const AXIS: i32 = 16;

/// The shared cell memory. Created once at boot and mutated in place for
/// the life of the process; never reallocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [u8; GRID_LEN],
}

impl Grid {
    pub fn new() -> Self {
        Grid { cells: [0; GRID_LEN] }
    }

    /// Read the cell at `i`, wrapping modulo the grid length.
    pub fn get(&self, i: i32) -> u8 {
        self.cells[i.rem_euclid(GRID_LEN as i32) as usize]
    }

    /// Write the cell at `i`, wrapping modulo the grid length.
    pub fn set(&mut self, i: i32, v: u8) {
        self.cells[i.rem_euclid(GRID_LEN as i32) as usize] = v;
    }

    /// Raw view of the cells, for fixtures and trace dumps.
    pub fn as_bytes(&self) -> &[u8; GRID_LEN] {
        &self.cells
    }

    /// Replace the whole grid with a 256-byte image.
    pub fn load(&mut self, image: &[u8; GRID_LEN]) {
        self.cells = *image;
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new()
    }
}

/// Move a position on the 16x16 torus by `(dx, dy)` cells, wrapping each
/// axis independently. `dx` walks columns, `dy` walks rows.
pub fn move2(pos: u8, dx: i32, dy: i32) -> u8 {
    let col = ((pos as i32 % AXIS) + dx).rem_euclid(AXIS);
    let row = ((pos as i32 / AXIS) + dy).rem_euclid(AXIS);
    (row * AXIS + col) as u8
}

/// One of the four cardinal headings used by the 2-D cursor ops.
///
/// `East`/`West` walk columns, `South`/`North` walk rows. The sequencing
/// heading (`btdir`) and the data-cursor heading (`dcdir`) are independent
/// values of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heading {
    #[default]
    East,
    West,
    South,
    North,
}

impl Heading {
    /// Column/row delta of one step along this heading.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::East => (1, 0),
            Heading::West => (-1, 0),
            Heading::South => (0, 1),
            Heading::North => (0, -1),
        }
    }

    /// The opposite heading.
    pub fn reversed(self) -> Heading {
        match self {
            Heading::East => Heading::West,
            Heading::West => Heading::East,
            Heading::South => Heading::North,
            Heading::North => Heading::South,
        }
    }

    /// Quarter turn: east goes south, west goes north, south goes east,
    /// north goes west.
    pub fn turned(self) -> Heading {
        match self {
            Heading::East => Heading::South,
            Heading::West => Heading::North,
            Heading::South => Heading::East,
            Heading::North => Heading::West,
        }
    }

    /// The heading opposite to [`Heading::turned`]: a step along it
    /// undoes a turned sidestep. Not the inverse heading permutation.
    pub fn unturned(self) -> Heading {
        match self {
            Heading::East => Heading::North,
            Heading::West => Heading::South,
            Heading::South => Heading::West,
            Heading::North => Heading::East,
        }
    }

    /// Walk `pos` one cell along this heading on the torus.
    pub fn step(self, pos: u8) -> u8 {
        let (dx, dy) = self.delta();
        move2(pos, dx, dy)
    }

    /// Linear instruction-pointer delta for this heading: +/-1 within a
    /// row, +/-16 across rows. The instruction pointer wraps mod 256
    /// rather than per axis.
    pub fn ip_delta(self) -> i8 {
        match self {
            Heading::East => 1,
            Heading::West => -1,
            Heading::South => 16,
            Heading::North => -16,
        }
    }
}
