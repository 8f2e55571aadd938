//! Error taxonomy for the three interpreter stages.

use thiserror::Error;

/// The stage of interpretation an [`Error`] was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scan,
    Parse,
    Runtime,
}

/// Problems found in the program text, before anything is executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    // Scanner
    #[error("Invalid escape code '{0}'.")]
    InvalidEscape(String),
    #[error("range must be preceded by a string.")]
    RangeWithoutStart,
    #[error("range must be followed by a string.")]
    RangeWithoutEnd,

    // Parser
    #[error("expected {expected}, got '{got}'.")]
    Expected { expected: &'static str, got: String },
    #[error("not enough values in bounds.")]
    NotEnoughBounds,
    #[error("too many values in bounds.")]
    TooManyBounds,
    #[error("Unrecognized parameter '{0}'.")]
    UnrecognizedParam(char),
}

impl SyntaxError {
    fn stage(&self) -> Stage {
        match self {
            Self::InvalidEscape(_) | Self::RangeWithoutStart | Self::RangeWithoutEnd => Stage::Scan,
            _ => Stage::Parse,
        }
    }
}

/// Fatal problems hit while matching. Any of these aborts the whole search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("No declarations.")]
    NoDeclarations,
    #[error("Could not find declaration '{0}'.")]
    UndeclaredPattern(String),
    #[error("Couldn't understand direction '{0}'.")]
    UnknownDirection(String),
    #[error("Implementation error: snake stalled.")]
    Stalled,
    #[error("Step budget of {0} exhausted; a repetition may be matching nothing forever.")]
    StepBudgetExhausted(usize),
}

/// Any error reported by [`run`](crate::run).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("(ln {line}, col {col}) {kind}")]
    Syntax {
        line: usize,
        col: usize,
        kind: SyntaxError,
    },
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn syntax(line: usize, col: usize, kind: SyntaxError) -> Self {
        Self::Syntax { line, col, kind }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::Syntax { kind, .. } => kind.stage(),
            Self::Runtime(_) => Stage::Runtime,
        }
    }
}
