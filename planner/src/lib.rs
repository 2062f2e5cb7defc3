//! Kinoplan Planner: time-optimal kinematic paths over a discretized state
//! graph.
//!
//! A [`KinematicGraph`] turns kinematic states into search nodes: every edge
//! is one unit time step under a per-axis acceleration change bounded by the
//! jerk. Solving runs in two phases. A backward search escapes a constrained
//! goal to the nearest free state, then A* (from `kinoplan_search`) plans
//! forward to it.
//!
//! The planner does NOT implement search itself; it supplies the graph.
//! Regions and feasibility are caller predicates on [`PlannerConfig`].

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod backward;
pub mod config;
pub mod error;
pub mod graph;
pub mod neighbors;
pub mod plan;
pub mod scenarios;
pub mod session;

pub use backward::{FreeGoalSearch, FreeGoalStats};
pub use config::{EdgeCost, Heuristic, Limits, PlannerConfig};
pub use error::PlanError;
pub use graph::KinematicGraph;
pub use neighbors::permutations;
pub use plan::{Plan, PlanObserver, PlanStats};
pub use scenarios::ClearancePlane;
pub use session::{SessionCounters, StateId};
