//! SnakeEx: a pattern language for matching paths through 2D text grids.
//!
//! A program is a list of named declarations. The first one is run from
//! every cell of the grid (and one cell past every edge), steering a
//! cursor, the *snake*, that marks the cells it matches.
//!
//! # Example
//!
//! ```rust
//! let grid = "INOWCEF\nIFWNOPH\nVULUHGY\nGUYOIGI\nYTFUGYG\nFTGYIOO";
//! let matches = snakeex::run("main:<*>GOLF", grid, false).unwrap();
//!
//! assert_eq!(matches.len(), 1);
//! assert_eq!((matches[0].orig_x, matches[0].orig_y), (4, 4));
//! assert_eq!(matches[0].marks, [(4, 4), (3, 3), (2, 2), (1, 1)]);
//! ```

pub mod branches;
pub mod direction;
pub mod error;
pub mod finder;
pub mod grid;
pub mod interpreter;
pub mod options;
pub mod pattern;
pub mod render;
pub mod snake;

pub use error::{Error, RuntimeError, Stage, SyntaxError};
pub use finder::{Match, find};
pub use grid::Grid;
pub use options::{DEFAULT_STEP_BUDGET, RunOptions};
pub use pattern::{Token, TokenKind, parse_program, scan};
pub use snake::Snake;

/// Scan, parse and run `code` against `input`.
///
/// Scan or parse errors are returned together, before anything runs. A
/// runtime error aborts the search and is returned alone.
pub fn run(code: &str, input: &str, origin_insensitive: bool) -> Result<Vec<Match>, Vec<Error>> {
    run_with(code, input, &RunOptions::default().origin_insensitive(origin_insensitive))
}

/// [`run`] with explicit [`RunOptions`].
pub fn run_with(code: &str, input: &str, options: &RunOptions) -> Result<Vec<Match>, Vec<Error>> {
    let tokens = scan(code)?;
    let program = parse_program(tokens)?;
    find(&program, input, options).map_err(|err| vec![err.into()])
}
