//! Shared planning regimes for the benchmark suites.
//!
//! Each regime stresses a different part of the planner: long straight runs
//! (open-set throughput), multi-axis travel (neighbour fan-out), and a
//! clearance plane (backward phase plus region checks).

use kinoplan_kernel::state::KinematicState;
use kinoplan_planner::{ClearancePlane, KinematicGraph, Plan, PlanError, PlannerConfig};
use kinoplan_search::NullObserver;

/// A named planning problem.
#[derive(Debug, Clone)]
pub struct Regime {
    pub name: &'static str,
    pub config: PlannerConfig,
    pub start: KinematicState,
    pub goal: KinematicState,
}

impl Regime {
    /// Build a graph for this regime. Benches that time `solve` alone
    /// construct once and reuse it; `solve` clears the session itself.
    ///
    /// # Panics
    ///
    /// Panics if the regime's config is invalid. Benchmark setup failures are fatal.
    #[must_use]
    pub fn graph(&self) -> KinematicGraph {
        KinematicGraph::new(self.config.clone()).expect("regime config is valid")
    }

    /// Solve on `graph`.
    ///
    /// # Errors
    ///
    /// Whatever [`KinematicGraph::solve`] reports.
    pub fn solve_on(&self, graph: &mut KinematicGraph) -> Result<Plan, PlanError> {
        graph.solve(&self.start, &self.goal, &mut NullObserver)
    }
}

fn line(name: &'static str, distance: f64) -> Regime {
    Regime {
        name,
        config: PlannerConfig::with_limits(1, vec![20.0], vec![5.0]),
        start: KinematicState::at_rest(vec![0.0]),
        goal: KinematicState::at_rest(vec![distance]),
    }
}

/// Every regime, smallest first.
///
/// # Panics
///
/// Panics if the clearance plane rejects its own config.
#[must_use]
pub fn regimes() -> Vec<Regime> {
    let clearance = ClearancePlane::new(2, 15.0, 0.0)
        .apply(PlannerConfig::with_limits(3, vec![10.0; 3], vec![5.0; 3]))
        .expect("clearance plane fits a 3-axis config");
    vec![
        line("line_short", 50.0),
        line("line_long", 400.0),
        Regime {
            name: "planar",
            config: PlannerConfig {
                max_iterations: 50_000,
                ..PlannerConfig::with_limits(2, vec![10.0, 10.0], vec![2.0, 2.0])
            },
            start: KinematicState::at_rest(vec![0.0, 0.0]),
            goal: KinematicState::at_rest(vec![30.0, -20.0]),
        },
        Regime {
            name: "clearance",
            config: clearance,
            start: KinematicState::at_rest(vec![0.0, 0.0, 20.0]),
            goal: KinematicState::at_rest(vec![10.0, 5.0, 1.0]),
        },
    ]
}

/// Canonical JSON summary of a plan for report metadata.
#[must_use]
pub fn plan_summary(plan: &Plan) -> serde_json::Value {
    serde_json::json!({
        "steps": plan.steps(),
        "iterations": plan.stats.search.iterations,
        "nodes": plan.stats.nodes_created,
        "free_goal_iterations": plan.stats.free_goal.iterations,
    })
}
