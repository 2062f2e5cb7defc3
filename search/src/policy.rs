//! Search policy types.

use crate::error::SearchError;
use crate::queue::QueueConfig;

/// Search budget and open-set configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Hard cap on expansions (non-stale open-set extractions).
    pub max_iterations: u64,
    /// Bucket layout of the open set.
    pub queue: QueueConfig,
}

impl SearchPolicy {
    /// Validate budgets and the queue layout.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if `max_iterations` is zero or
    /// the queue configuration is degenerate.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_iterations == 0 {
            return Err(SearchError::InvalidPolicy {
                detail: "max_iterations must be positive".into(),
            });
        }
        self.queue.validate()
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            queue: QueueConfig::default(),
        }
    }
}
