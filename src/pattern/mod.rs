//! SnakeEx language front end: scanner, AST and parser.
//!
//! A program is a list of declarations, one per line. The first one is
//! matched against the grid; the rest can be called by name.
//!
//! # Pattern syntax
//!
//! | Token         | Meaning                                                 |
//! |---------------|---------------------------------------------------------|
//! | `name:body`   | Declaration                                             |
//! | `name{P}:b`   | Declaration with default flags                          |
//! | `abc`         | Literal, one cell per character                         |
//! | `[abc]`       | One of the alternatives                                 |
//! | `[^abc]`      | One cell not in the set                                 |
//! | `a-z`         | Character range, expands to the literal `ab...z`        |
//! | `.`           | Any cell inside the grid                                |
//! | `$`           | A cell outside the grid                                 |
//! | `(…)`         | Grouping                                                |
//! | `X*`          | Zero or more                                            |
//! | `X+`          | One or more                                             |
//! | `X?`          | Zero or one                                             |
//! | `X%{m,n}`     | Between m and n (either side may be left out)           |
//! | `<dir>`       | Turn: `R L F B` summed, or one of `* + X T P !`         |
//! | `<.dir>`      | Turn relative to east instead of the current heading    |
//! | `{n<dir>P}`   | Call declaration `n` heading `dir` with flags `P`       |
//! | `!X`          | Succeed without moving iff `X` fails                    |
//! | `~X`          | Match `X` without marking it                            |
//! | `` `X ``      | Match `X` over already marked cells only                |
//! | `\c`          | Escape: `\n \t \r`, or the special character `c`        |
//!
//! Flags: `P` piggyback, `H`/`V`/`W` wrap horizontally/vertically/both,
//! `E` exclusive, `I` case-insensitive, `A` advance after return,
//! `S` suppress marking, `L` only marked cells, `0`-`9` group.

pub mod ast;
pub mod char_class;
pub mod parser;
pub mod scanner;

pub use parser::parse_program;
pub use scanner::{Token, TokenKind, scan};
