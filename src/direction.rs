//! Heading vectors and the turns that rotate them.
//!
//! Headings use screen coordinates: `x` grows to the right and `y` grows
//! downwards, so east is `(1, 0)` and a right turn from east is south,
//! `(0, 1)`.
//!
//! A relative turn is a vector `(x, y)` in the snake's own frame, built by
//! summing direction letters: `R` is `-x`, `L` is `+x`, `F` is `+y` and `B`
//! is `-y`. `F` alone leaves the heading unchanged.

use crate::error::RuntimeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Heading {
    pub dx: i32,
    pub dy: i32,
}

impl Heading {
    pub const EAST: Heading = Heading { dx: 1, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// A zero heading never moves the snake.
    pub fn is_stalled(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Apply the relative turn `(x, y)`.
    ///
    /// Single-step turns keep each component in `-1..=1`; larger sums such
    /// as `RR` are left unnormalized and produce longer strides.
    pub fn turn(self, x: i32, y: i32) -> Heading {
        if x == 0 && y == 0 {
            return self;
        }
        let Heading { dx, dy } = self;
        let (ndx, ndy) = match (dx.signum(), dy.signum()) {
            (0, -1) => (-x, -y),
            (0, _) => (x, y),
            (-1, 0) => (-y, x),
            (_, 0) => (y, -x),
            (-1, -1) => (-x - y, x - y),
            (-1, _) => (x - y, x + y),
            (_, -1) => (y - x, -x - y),
            _ => (x + y, y - x),
        };
        if x.abs() <= 1 && y.abs() <= 1 {
            Heading::new(ndx.signum(), ndy.signum())
        } else {
            Heading::new(ndx, ndy)
        }
    }
}

/// What a `<...>` direction does to a snake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// One deterministic relative turn.
    Relative(i32, i32),
    /// Branch once per relative turn.
    Branch(&'static [(i32, i32)]),
    /// `!`: branch towards every other cell of the grid.
    Everywhere,
}

/// `*`: the eight neighbours.
const ALL_EIGHT: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
/// `+`: the orthogonal neighbours.
const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
/// `X`: the diagonal neighbours.
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
/// `T`: left or right.
const SIDEWAYS: [(i32, i32); 2] = [(1, 0), (-1, 0)];
/// `P`: forward, left or right.
const ONWARD: [(i32, i32); 3] = [(0, 1), (1, 0), (-1, 0)];

impl Turn {
    /// Interpret the turn letters of a direction.
    pub fn parse(turns: &str) -> Result<Turn, RuntimeError> {
        match turns {
            "!" => return Ok(Turn::Everywhere),
            "*" => return Ok(Turn::Branch(&ALL_EIGHT)),
            "+" => return Ok(Turn::Branch(&ORTHOGONAL)),
            "X" => return Ok(Turn::Branch(&DIAGONAL)),
            "T" => return Ok(Turn::Branch(&SIDEWAYS)),
            "P" => return Ok(Turn::Branch(&ONWARD)),
            _ => {}
        }
        let (mut x, mut y) = (0, 0);
        for ch in turns.chars() {
            match ch {
                'R' => x -= 1,
                'L' => x += 1,
                'F' => y += 1,
                'B' => y -= 1,
                _ => return Err(RuntimeError::UnknownDirection(turns.to_string())),
            }
        }
        Ok(Turn::Relative(x, y))
    }
}
