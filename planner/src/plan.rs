//! Two-phase solve and its result.
//!
//! Phase one walks backward from the goal to an unconstrained state
//! ([`KinematicGraph::find_free_goal`]). Phase two runs A* from the start to
//! that state. The plan is the forward path followed by the backward suffix.

use std::time::{Duration, Instant};

use kinoplan_kernel::proof::canon::canonical_json_bytes;
use kinoplan_kernel::proof::hash::{canonical_hash, ContentHash};
use kinoplan_kernel::proof::hash_domain::HashDomain;
use kinoplan_kernel::state::{KinematicState, Precision};
use kinoplan_search::{NeighborOutcome, NullObserver, SearchObserver, SearchStats};
use tracing::{debug, info_span, warn};

use crate::backward::FreeGoalStats;
use crate::error::PlanError;
use crate::graph::KinematicGraph;
use crate::session::StateId;

/// Planner-level observation hooks. Like [`SearchObserver`], but each
/// callback also sees the interned state.
pub trait PlanObserver {
    /// Called with each node about to be expanded; `false` cancels the solve.
    fn on_current(&mut self, _id: StateId, _state: &KinematicState) -> bool {
        true
    }

    fn on_neighbor(&mut self, _id: StateId, _state: &KinematicState, _outcome: NeighborOutcome) {}
}

impl PlanObserver for NullObserver {}

/// Forwards engine callbacks to a [`PlanObserver`] with the state resolved.
struct Bridge<'g, 'o> {
    graph: &'g KinematicGraph,
    inner: &'o mut dyn PlanObserver,
}

impl SearchObserver<StateId> for Bridge<'_, '_> {
    fn on_current(&mut self, node: StateId) -> bool {
        let inner = &mut *self.inner;
        self.graph.with_state(node, |state| inner.on_current(node, state))
    }

    fn on_neighbor(&mut self, node: StateId, outcome: NeighborOutcome) {
        let inner = &mut *self.inner;
        self.graph
            .with_state(node, |state| inner.on_neighbor(node, state, outcome));
    }
}

/// Counters and context for one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanStats {
    /// Forward search counters; default if the forward phase never ran.
    pub search: SearchStats,
    pub free_goal: FreeGoalStats,
    pub lookups: u64,
    pub lookup_hits: u64,
    pub nodes_created: usize,
    pub heuristic_evaluations: u64,
    pub neighbor_calls: u64,
    /// Per-axis jerk used by the forward phase.
    pub jerk: Vec<f64>,
    pub start_position: Vec<f64>,
    pub goal_position: Vec<f64>,
    pub elapsed: Duration,
}

/// A solved (or handled-as-empty) plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Start to goal inclusive, one state per unit time step. Empty only when
    /// a failure handler accepted the failure.
    pub path: Vec<KinematicState>,
    pub stats: PlanStats,
    /// Grid the path states were rounded onto.
    pub precision: Precision,
}

impl Plan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of unit time steps, `path.len() - 1`.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// JSON rendering of the deterministic parts of the plan. Real values are
    /// integer ticks on the plan's grid.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let ticks = |xs: &[f64]| -> Vec<i64> { xs.iter().map(|x| self.precision.ticks(*x)).collect() };
        let path: Vec<serde_json::Value> = self
            .path
            .iter()
            .map(|state| {
                serde_json::json!({
                    "s": ticks(state.position()),
                    "v": ticks(state.velocity()),
                    "a": ticks(state.acceleration()),
                })
            })
            .collect();
        serde_json::json!({
            "schema_version": "kinoplan.plan.v1",
            "decimals": self.precision.decimals(),
            "jerk": ticks(&self.stats.jerk),
            "path": path,
        })
    }

    /// Canonical JSON bytes of [`Plan::to_json_value`].
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Canon`] if rendering produced a non-integer number.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, PlanError> {
        Ok(canonical_json_bytes(&self.to_json_value())?)
    }

    /// Content hash of the canonical rendering. Equal for plans that take the
    /// same grid states with the same jerk.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Canon`] if rendering fails.
    pub fn digest(&self) -> Result<ContentHash, PlanError> {
        Ok(canonical_hash(
            HashDomain::Plan,
            &self.to_canonical_json_bytes()?,
        ))
    }
}

impl KinematicGraph {
    /// Plan a trajectory from `start` to the resting `goal`.
    ///
    /// Clears the session, finds a free state behind the goal, sizes the jerk
    /// from the trip length, then searches forward to the free state.
    ///
    /// # Errors
    ///
    /// - [`PlanError::DimensionMismatch`] if either state has the wrong axis
    ///   count.
    /// - [`PlanError::NoPath`] if either phase fails and no `on_no_path`
    ///   handler is configured; otherwise whatever the handler returns.
    pub fn solve(
        &mut self,
        start: &KinematicState,
        goal: &KinematicState,
        observer: &mut dyn PlanObserver,
    ) -> Result<Plan, PlanError> {
        let span = info_span!("solve", dimensions = self.config.dimensions);
        let _guard = span.enter();
        let started = Instant::now();

        self.clear();
        let start_id = self.intern(start)?;
        let goal_id = self.intern(goal)?;
        let start_state = self.state(start_id);
        let goal_state = self.state(goal_id);

        let free = self.find_free_goal(goal_id)?;
        let jerk = self.jerk_for(&start_state, &goal_state);
        self.set_jerk(jerk.clone());
        debug!(?jerk, free_goal = ?free.path.first(), "phase one finished");

        let mut ids: Vec<StateId> = Vec::new();
        let search = match free.path.first() {
            Some(&free_id) => {
                let mut bridge = Bridge {
                    graph: self,
                    inner: observer,
                };
                let outcome = self.engine.solve(&*self, start_id, free_id, &mut bridge);
                if !outcome.path.is_empty() {
                    ids = outcome.path;
                    ids.extend_from_slice(&free.path[1..]);
                }
                outcome.stats
            }
            None => SearchStats::default(),
        };

        if ids.is_empty() {
            warn!(
                start = ?start_state.position(),
                goal = ?goal_state.position(),
                nodes = self.node_count(),
                free_goal_found = free.stats.found,
                termination = %search.termination,
                "no path found"
            );
            match &self.config.on_no_path {
                Some(handler) => handler(&start_state, &goal_state)?,
                None => {
                    return Err(PlanError::NoPath {
                        start: start_state,
                        goal: goal_state,
                        nodes: self.node_count(),
                        max_iterations: self.config.max_iterations,
                    })
                }
            }
        }

        let counters = self.counters();
        let path: Vec<KinematicState> = ids.iter().map(|id| self.state(*id)).collect();
        let stats = PlanStats {
            search,
            free_goal: free.stats,
            lookups: counters.lookups,
            lookup_hits: counters.lookup_hits,
            nodes_created: self.node_count(),
            heuristic_evaluations: counters.heuristic_evaluations,
            neighbor_calls: counters.neighbor_calls,
            jerk,
            start_position: start_state.position().to_vec(),
            goal_position: goal_state.position().to_vec(),
            elapsed: started.elapsed(),
        };
        debug!(
            steps = path.len().saturating_sub(1),
            nodes = stats.nodes_created,
            iterations = stats.search.iterations,
            "plan found"
        );
        Ok(Plan {
            path,
            stats,
            precision: self.config.precision,
        })
    }
}
