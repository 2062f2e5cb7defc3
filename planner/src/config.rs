//! Planner configuration and pluggable strategies.

use std::fmt;
use std::sync::Arc;

use kinoplan_kernel::motion::tsvva;
use kinoplan_kernel::state::{KinematicState, Precision};
use kinoplan_kernel::vector;
use kinoplan_search::{QueueConfig, SearchPolicy};

use crate::error::PlanError;

/// Predicate over a state (region membership, feasibility).
pub type StatePredicate = Arc<dyn Fn(&KinematicState) -> bool + Send + Sync>;

/// Edge cost between two distinct states.
pub type CostFn = Arc<dyn Fn(&KinematicState, &KinematicState) -> f64 + Send + Sync>;

/// Remaining-cost estimate from a state to a goal.
pub type HeuristicFn = Arc<dyn Fn(&KinematicState, &KinematicState) -> f64 + Send + Sync>;

/// Called with `(start, goal)` when neither search phase finds a path.
///
/// `Ok(())` turns the failure into a plan with an empty path.
pub type NoPathHandler =
    Arc<dyn Fn(&KinematicState, &KinematicState) -> Result<(), PlanError> + Send + Sync>;

/// Transition cost strategy.
#[derive(Clone)]
pub enum EdgeCost {
    /// The same cost for every transition between distinct states.
    Constant(f64),
    /// Caller-supplied cost.
    Custom(CostFn),
}

impl EdgeCost {
    /// Cost of the transition `from → to` between distinct states.
    #[must_use]
    pub fn between(&self, from: &KinematicState, to: &KinematicState) -> f64 {
        match self {
            Self::Constant(cost) => *cost,
            Self::Custom(f) => f(from, to),
        }
    }
}

/// A fifth of a time step per transition. Against a heuristic measured in
/// whole time steps this weights the search towards the goal, which keeps
/// long trips inside typical iteration budgets.
impl Default for EdgeCost {
    fn default() -> Self {
        Self::Constant(0.2)
    }
}

impl fmt::Debug for EdgeCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(cost) => f.debug_tuple("Constant").field(cost).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Heuristic strategy, selected per region.
#[derive(Clone, Default)]
pub enum Heuristic {
    /// Sum over axes of the minimum traverse time under bounded acceleration.
    #[default]
    TimeToGoal,
    /// [`Heuristic::TimeToGoal`] plus each axis's shortfall below its maximum
    /// velocity, as a fraction of that maximum. Favours states that are
    /// already moving fast.
    Explore,
    /// Euclidean distance between positions.
    Distance,
    /// Caller-supplied estimate.
    Custom(HeuristicFn),
}

impl Heuristic {
    /// Estimate the remaining cost from `state` to `goal` under `limits`.
    #[must_use]
    pub fn estimate(&self, state: &KinematicState, goal: &KinematicState, limits: &Limits<'_>) -> f64 {
        match self {
            Self::TimeToGoal => time_to_goal(state, goal, limits.max_acceleration),
            Self::Explore => {
                let shortfall: f64 = state
                    .velocity()
                    .iter()
                    .zip(limits.max_velocity)
                    .map(|(v, v_max)| (v_max - v) / v_max)
                    .sum();
                time_to_goal(state, goal, limits.max_acceleration) + shortfall
            }
            Self::Distance => vector::norm(&vector::subtract(goal.position(), state.position())),
            Self::Custom(f) => f(state, goal),
        }
    }
}

impl fmt::Debug for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeToGoal => f.write_str("TimeToGoal"),
            Self::Explore => f.write_str("Explore"),
            Self::Distance => f.write_str("Distance"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Per-axis limits a heuristic may consult.
#[derive(Debug, Clone, Copy)]
pub struct Limits<'a> {
    pub max_velocity: &'a [f64],
    pub max_acceleration: &'a [f64],
}

fn time_to_goal(state: &KinematicState, goal: &KinematicState, max_acceleration: &[f64]) -> f64 {
    state
        .position()
        .iter()
        .zip(goal.position())
        .zip(state.velocity().iter().zip(goal.velocity()))
        .zip(max_acceleration)
        .map(|(((s, goal_s), (v, goal_v)), a_max)| tsvva(goal_s - s, *v, *goal_v, *a_max))
        .sum()
}

/// Planner configuration.
///
/// Strategy fields hold shared closures, so the config stays `Clone`.
#[derive(Clone)]
pub struct PlannerConfig {
    /// Number of axes.
    pub dimensions: usize,
    /// Per-axis velocity bound.
    pub max_velocity: Vec<f64>,
    /// Per-axis acceleration bound.
    pub max_acceleration: Vec<f64>,
    /// Per-axis lower bound on the jerk step chosen for a solve.
    pub min_jerk: Vec<f64>,
    /// Iteration budget for each search phase.
    pub max_iterations: u64,
    /// Rounding grid for interned states.
    pub precision: Precision,
    /// Bucket layout for both search phases.
    pub queue: QueueConfig,
    pub cost: EdgeCost,
    /// Heuristic for unconstrained states.
    pub heuristic_free: Heuristic,
    /// Heuristic for constrained states.
    pub heuristic_constrained: Heuristic,
    /// Region membership, evaluated once per interned state.
    pub is_constrained: StatePredicate,
    /// Feasibility filter; `false` rejects a candidate state.
    pub constrain: StatePredicate,
    /// Failure handler; `None` reports [`PlanError::NoPath`].
    pub on_no_path: Option<NoPathHandler>,
}

impl PlannerConfig {
    /// Defaults for `dimensions` axes.
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            max_velocity: vec![10.0; dimensions],
            max_acceleration: vec![2.0; dimensions],
            min_jerk: vec![0.1; dimensions],
            max_iterations: 10_000,
            precision: Precision::DEFAULT,
            queue: QueueConfig::default(),
            cost: EdgeCost::default(),
            heuristic_free: Heuristic::TimeToGoal,
            heuristic_constrained: Heuristic::Explore,
            is_constrained: Arc::new(|_: &KinematicState| false),
            constrain: Arc::new(|_: &KinematicState| true),
            on_no_path: None,
        }
    }

    /// Defaults for `dimensions` axes with explicit velocity and acceleration
    /// bounds.
    #[must_use]
    pub fn with_limits(dimensions: usize, max_velocity: Vec<f64>, max_acceleration: Vec<f64>) -> Self {
        Self {
            max_velocity,
            max_acceleration,
            ..Self::new(dimensions)
        }
    }

    /// Check axis counts and bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.dimensions == 0 {
            return Err(invalid("dimensions must be positive"));
        }
        for (name, values) in [
            ("max_velocity", &self.max_velocity),
            ("max_acceleration", &self.max_acceleration),
            ("min_jerk", &self.min_jerk),
        ] {
            if values.len() != self.dimensions {
                return Err(invalid(&format!(
                    "{name} has {} entries, expected {}",
                    values.len(),
                    self.dimensions
                )));
            }
            if let Some(i) = values.iter().position(|x| !(x.is_finite() && *x > 0.0)) {
                return Err(invalid(&format!("{name}[{i}] must be positive and finite")));
            }
        }
        if self.precision.decimals() > Precision::MAX_DECIMALS {
            return Err(invalid(&format!(
                "precision of {} decimals exceeds the maximum of {}",
                self.precision.decimals(),
                Precision::MAX_DECIMALS
            )));
        }
        if let EdgeCost::Constant(cost) = self.cost {
            if !(cost.is_finite() && cost > 0.0) {
                return Err(invalid("constant edge cost must be positive and finite"));
            }
        }
        self.search_policy().validate()?;
        Ok(())
    }

    /// Policy for the forward search.
    #[must_use]
    pub fn search_policy(&self) -> SearchPolicy {
        SearchPolicy {
            max_iterations: self.max_iterations,
            queue: self.queue.clone(),
        }
    }

    /// Velocity and acceleration limits as a heuristic sees them.
    #[must_use]
    pub fn limits(&self) -> Limits<'_> {
        Limits {
            max_velocity: &self.max_velocity,
            max_acceleration: &self.max_acceleration,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

impl fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("dimensions", &self.dimensions)
            .field("max_velocity", &self.max_velocity)
            .field("max_acceleration", &self.max_acceleration)
            .field("min_jerk", &self.min_jerk)
            .field("max_iterations", &self.max_iterations)
            .field("precision", &self.precision)
            .field("queue", &self.queue)
            .field("cost", &self.cost)
            .field("heuristic_free", &self.heuristic_free)
            .field("heuristic_constrained", &self.heuristic_constrained)
            .field("on_no_path", &self.on_no_path.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}

fn invalid(detail: &str) -> PlanError {
    PlanError::InvalidConfig {
        detail: detail.to_string(),
    }
}
