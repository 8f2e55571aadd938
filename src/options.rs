//! Run configuration.

/// Default number of interpreter steps allowed per start cell.
pub const DEFAULT_STEP_BUDGET: usize = 250_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Treat matches with the same marks as duplicates even when they start
    /// from different cells.
    pub origin_insensitive: bool,
    /// Interpreter steps allowed per start cell before the run is aborted.
    /// `None` removes the limit, so a repetition over a pattern that matches
    /// nothing can loop forever.
    pub step_budget: Option<usize>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            origin_insensitive: false,
            step_budget: Some(DEFAULT_STEP_BUDGET),
        }
    }
}

impl RunOptions {
    pub fn origin_insensitive(mut self, origin_insensitive: bool) -> Self {
        self.origin_insensitive = origin_insensitive;
        self
    }

    pub fn step_budget(mut self, step_budget: Option<usize>) -> Self {
        self.step_budget = step_budget;
        self
    }
}
