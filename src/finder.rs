//! Runs a program from every start cell of a grid and collects the
//! distinct matches.

use itertools::Itertools;

use crate::error::RuntimeError;
use crate::grid::Grid;
use crate::interpreter::Interpreter;
use crate::options::RunOptions;
use crate::pattern::ast::Program;
use crate::snake::{Cell, Snake};

/// One successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Column the snake started from.
    pub orig_x: i32,
    /// Row the snake started from.
    pub orig_y: i32,
    /// Matched cells in the order they were first marked.
    pub marks: Vec<Cell>,
    /// The snake as it finished the program.
    pub snake: Snake,
}

impl Match {
    fn new(orig_x: i32, orig_y: i32, snake: Snake) -> Self {
        Self {
            orig_x,
            orig_y,
            marks: snake.marks.clone(),
            snake,
        }
    }

    /// Marks as a flat `x0, y0, x1, y1, ...` list.
    pub fn flat_marks(&self) -> Vec<i32> {
        self.snake.flat_marks()
    }

    pub fn is_marked(&self, x: i32, y: i32) -> bool {
        self.marks.contains(&(x, y))
    }

    /// Whether `other` reports the same cells. Unless `origin_insensitive`,
    /// both must also have started from the same cell.
    pub fn is_duplicate_of(&self, other: &Match, origin_insensitive: bool) -> bool {
        if !origin_insensitive && (self.orig_x, self.orig_y) != (other.orig_x, other.orig_y) {
            return false;
        }
        self.marks.len() == other.marks.len()
            && self.marks.iter().sorted().eq(other.marks.iter().sorted())
    }
}

/// Find every distinct match of `program` in `input`.
///
/// Start cells are tried row by row from `y = -1`, each row from `x = -1`,
/// so anchors like `$` can engage from just outside the grid. The first of
/// any set of duplicates is kept. A runtime error stops the search.
pub fn find(program: &Program, input: &str, options: &RunOptions) -> Result<Vec<Match>, RuntimeError> {
    let grid = Grid::new(input);
    let mut interpreter = Interpreter::new(program, &grid, options.step_budget);
    let mut matches: Vec<Match> = Vec::new();

    for y in grid.start_rows() {
        for x in grid.start_columns(y) {
            for snake in interpreter.run(Snake::new(x, y))? {
                let found = Match::new(x, y, snake);
                if !matches
                    .iter()
                    .any(|m| m.is_duplicate_of(&found, options.origin_insensitive))
                {
                    matches.push(found);
                }
            }
        }
    }
    Ok(matches)
}
