//! Typed planner errors.

use kinoplan_kernel::proof::canon::CanonError;
use kinoplan_kernel::state::{KinematicState, StateError};
use kinoplan_search::SearchError;

/// Typed failure for planner construction and solving.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// A configuration value is out of range.
    InvalidConfig { detail: String },
    /// A state's axis count differs from the planner's.
    DimensionMismatch { expected: usize, actual: usize },
    /// A state could not be built from its axis arrays.
    State(StateError),
    /// Neither search phase produced a path.
    NoPath {
        start: KinematicState,
        goal: KinematicState,
        nodes: usize,
        max_iterations: u64,
    },
    /// Canonical rendering of a plan failed.
    Canon(CanonError),
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig { detail } => write!(f, "invalid planner config: {detail}"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "state has {actual} axes, planner expects {expected}")
            }
            Self::State(err) => write!(f, "invalid state: {err}"),
            Self::NoPath {
                start,
                goal,
                nodes,
                max_iterations,
            } => write!(
                f,
                "no path found\n  start: s={:?} v={:?} a={:?}\n   goal: s={:?} v={:?} a={:?}\n  nodes: {nodes}\n   iter: {max_iterations}",
                start.position(),
                start.velocity(),
                start.acceleration(),
                goal.position(),
                goal.velocity(),
                goal.acceleration(),
            ),
            Self::Canon(err) => write!(f, "plan rendering failed: {err}"),
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::State(err) => Some(err),
            Self::Canon(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StateError> for PlanError {
    fn from(err: StateError) -> Self {
        Self::State(err)
    }
}

impl From<CanonError> for PlanError {
    fn from(err: CanonError) -> Self {
        Self::Canon(err)
    }
}

impl From<SearchError> for PlanError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidPolicy { detail } => Self::InvalidConfig { detail },
        }
    }
}
