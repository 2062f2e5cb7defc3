//! Backward search from a constrained goal to the nearest unconstrained state.
//!
//! Forward search runs in the unconstrained regime, so a goal inside a
//! constrained region is first connected to a free state by walking the
//! predecessor relation. The predecessor relation is a deliberately small
//! under-approximation: slow cruising states that stop or pass through in one
//! step.

use std::collections::{HashMap, HashSet};

use kinoplan_kernel::state::KinematicState;
use kinoplan_search::ApproxPriorityQueue;
use tracing::debug;

use crate::error::PlanError;
use crate::graph::KinematicGraph;
use crate::session::StateId;

/// Counters for one free-goal search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreeGoalStats {
    /// Queue extractions.
    pub iterations: u64,
    /// Predecessors discovered.
    pub nodes: u64,
    /// Whether an unconstrained state was reached.
    pub found: bool,
}

/// Result of [`KinematicGraph::find_free_goal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeGoalSearch {
    /// Forward-ordered path from the free state to the goal; empty if none
    /// was found within the budget.
    pub path: Vec<StateId>,
    pub stats: FreeGoalStats,
}

#[derive(Debug, Clone, Copy)]
struct BackEntry {
    cost: f64,
    node: StateId,
}

fn by_cost(a: &BackEntry, b: &BackEntry) -> std::cmp::Ordering {
    a.cost.total_cmp(&b.cost)
}

impl KinematicGraph {
    /// States that reach `id` in one step, filtered by the feasibility filter.
    ///
    /// A moving state is preceded by the same velocity one step back. A
    /// resting state is preceded, per axis, by a full-acceleration velocity on
    /// that axis alone, in both directions.
    ///
    /// # Errors
    ///
    /// Propagates [`PlanError::State`] if a predecessor cannot be built.
    pub fn predecessors(&self, id: StateId) -> Result<Vec<StateId>, PlanError> {
        let state = self.state(id);
        let mut candidates = Vec::new();
        if state.is_stationary() {
            for (i, a_max) in self.config.max_acceleration.iter().enumerate() {
                for v_i in [*a_max, -a_max] {
                    let mut velocity = vec![0.0; state.dimensions()];
                    velocity[i] = v_i;
                    let mut position = state.position().to_vec();
                    position[i] -= v_i;
                    candidates.push(KinematicState::moving(position, velocity)?);
                }
            }
        } else {
            let position = state
                .position()
                .iter()
                .zip(state.velocity())
                .map(|(s, v)| s - v)
                .collect();
            candidates.push(KinematicState::moving(position, state.velocity().to_vec())?);
        }

        Ok(candidates
            .iter()
            .map(|candidate| self.intern_unchecked(candidate))
            .filter(|pred| self.admits(*pred))
            .collect())
    }

    /// Cheapest-first backward search from `goal` to the first unconstrained
    /// state, bounded by the configured iteration budget.
    ///
    /// An unconstrained goal is its own free state.
    ///
    /// # Errors
    ///
    /// Propagates [`PlanError::State`] from predecessor construction.
    pub fn find_free_goal(&self, goal: StateId) -> Result<FreeGoalSearch, PlanError> {
        let max_iterations = self.config.max_iterations;
        let mut open: ApproxPriorityQueue<BackEntry, _> =
            ApproxPriorityQueue::with_config(self.config.queue.clone(), by_cost);
        let mut seen: HashSet<StateId> = HashSet::from([goal]);
        let mut next_toward_goal: HashMap<StateId, StateId> = HashMap::new();
        let mut stats = FreeGoalStats::default();
        let mut path = Vec::new();

        open.insert(BackEntry {
            cost: 0.0,
            node: goal,
        });
        while stats.iterations < max_iterations {
            let Some(BackEntry { cost, node }) = open.extract_min() else {
                break;
            };
            stats.iterations += 1;
            if !self.is_constrained(node) {
                path.push(node);
                let mut cursor = node;
                while let Some(next) = next_toward_goal.get(&cursor) {
                    path.push(*next);
                    cursor = *next;
                }
                stats.found = true;
                break;
            }
            for pred in self.predecessors(node)? {
                if !seen.insert(pred) {
                    continue;
                }
                stats.nodes += 1;
                next_toward_goal.insert(pred, node);
                let step = self.config.cost.between(&self.state(pred), &self.state(node));
                open.insert(BackEntry {
                    cost: cost + step,
                    node: pred,
                });
            }
        }

        debug!(
            iterations = stats.iterations,
            nodes = stats.nodes,
            found = stats.found,
            path_len = path.len(),
            "free-goal search finished"
        );
        Ok(FreeGoalSearch { path, stats })
    }
}
