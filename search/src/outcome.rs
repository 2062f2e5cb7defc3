//! Search results and run statistics.

use std::time::Duration;

/// Why the search terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TerminationReason {
    /// The goal was extracted from the open set.
    GoalReached,
    /// The open set emptied without reaching the goal.
    #[default]
    FrontierExhausted,
    /// `max_iterations` expansions ran without reaching the goal.
    IterationBudgetExceeded,
    /// The observer declined a node.
    Cancelled,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::GoalReached => "goal reached",
            Self::FrontierExhausted => "frontier exhausted",
            Self::IterationBudgetExceeded => "iteration budget exceeded",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Counters for one search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Non-stale open-set extractions.
    pub iterations: u64,
    /// Nodes closed and expanded.
    pub expansions: u64,
    /// Successors yielded by the graph, rejected ones included.
    pub neighbors_evaluated: u64,
    /// Open nodes whose priority improved.
    pub reprioritized: u64,
    /// Open-set bucket refills.
    pub queue_fills: u64,
    /// Open-set bucket splits.
    pub queue_splits: u64,
    /// Largest open-set size seen.
    pub frontier_high_water: u64,
    /// Wall time spent in the search loop.
    pub elapsed: Duration,
    /// Why the run stopped.
    pub termination: TerminationReason,
}

/// Result of a search run.
///
/// `path` runs from start to goal inclusive, and is empty unless
/// `stats.termination` is [`TerminationReason::GoalReached`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<N> {
    pub path: Vec<N>,
    pub stats: SearchStats,
}

impl<N> SearchOutcome<N> {
    /// Returns `true` if the search terminated because the goal was reached.
    #[must_use]
    pub fn is_goal_reached(&self) -> bool {
        self.stats.termination == TerminationReason::GoalReached
    }
}
