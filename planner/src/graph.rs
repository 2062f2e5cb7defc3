//! `KinematicGraph`: the state graph searched by the planner.
//!
//! Nodes are interned [`KinematicState`]s. An edge is one unit time step
//! under a per-axis acceleration choice; see [`crate::neighbors`] for how the
//! choices are enumerated and [`crate::backward`] for the reverse relation used
//! to escape constrained goals.

use std::cell::RefCell;

use kinoplan_kernel::state::KinematicState;
use kinoplan_search::{AStar, SearchGraph, Successor};

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::neighbors::NeighborIter;
use crate::session::{Session, SessionCounters, StateId};

/// Planner graph bound to one configuration.
///
/// Interned states live in a session owned by the graph and reset at the start
/// of every [`KinematicGraph::solve`]. The session sits behind a `RefCell`, so
/// a graph serves one solve at a time and is not `Sync`.
pub struct KinematicGraph {
    pub(crate) config: PlannerConfig,
    pub(crate) engine: AStar,
    jerk: Vec<f64>,
    session: RefCell<Session>,
}

impl KinematicGraph {
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] if the configuration fails
    /// [`PlannerConfig::validate`].
    pub fn new(config: PlannerConfig) -> Result<Self, PlanError> {
        config.validate()?;
        let engine = AStar::new(config.search_policy())?;
        Ok(Self {
            jerk: config.max_acceleration.clone(),
            engine,
            config,
            session: RefCell::new(Session::default()),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Per-axis acceleration step. Equals the acceleration bound until a solve
    /// picks one from the trip length.
    #[must_use]
    pub fn jerk(&self) -> &[f64] {
        &self.jerk
    }

    /// Jerk for a trip from `start` to `goal`: the rounded per-axis distance,
    /// clamped between the configured minimum jerk and the acceleration bound.
    #[must_use]
    pub fn jerk_for(&self, start: &KinematicState, goal: &KinematicState) -> Vec<f64> {
        start
            .position()
            .iter()
            .zip(goal.position())
            .zip(self.config.min_jerk.iter().zip(&self.config.max_acceleration))
            .map(|((s, g), (j_min, a_max))| {
                let distance = self.config.precision.round((g - s).abs());
                a_max.min(distance.max(*j_min))
            })
            .collect()
    }

    pub(crate) fn set_jerk(&mut self, jerk: Vec<f64>) {
        self.jerk = jerk;
    }

    pub(crate) fn count_neighbor_call(&self) {
        self.session.borrow_mut().counters.neighbor_calls += 1;
    }

    /// Drop every interned state, memoized heuristic, and counter.
    pub fn clear(&self) {
        self.session.borrow_mut().clear();
    }

    /// Number of states interned in the current session.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.session.borrow().len()
    }

    #[must_use]
    pub fn counters(&self) -> SessionCounters {
        self.session.borrow().counters
    }

    /// Canonical handle for `state`.
    ///
    /// The state is rounded onto the precision grid. The first time a grid
    /// point is seen its region membership is evaluated and cached.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::DimensionMismatch`] if `state` does not have the
    /// configured number of axes.
    pub fn intern(&self, state: &KinematicState) -> Result<StateId, PlanError> {
        if state.dimensions() != self.config.dimensions {
            return Err(PlanError::DimensionMismatch {
                expected: self.config.dimensions,
                actual: state.dimensions(),
            });
        }
        Ok(self.intern_unchecked(state))
    }

    pub(crate) fn intern_unchecked(&self, state: &KinematicState) -> StateId {
        let precision = self.config.precision;
        let key = state.key(precision);
        if let Some(id) = self.session.borrow_mut().lookup(&key) {
            return id;
        }
        let rounded = state.rounded(precision);
        let constrained = (self.config.is_constrained)(&rounded);
        self.session.borrow_mut().insert(key, rounded, constrained)
    }

    /// Copy of the interned state behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to the current session.
    #[must_use]
    pub fn state(&self, id: StateId) -> KinematicState {
        self.session.borrow().state(id).clone()
    }

    /// Run `f` on the interned state behind `id` without copying it.
    pub fn with_state<R>(&self, id: StateId, f: impl FnOnce(&KinematicState) -> R) -> R {
        f(self.session.borrow().state(id))
    }

    /// Region membership cached when `id` was interned.
    #[must_use]
    pub fn is_constrained(&self, id: StateId) -> bool {
        self.session.borrow().record(id).constrained
    }

    /// Whether the feasibility filter accepts `id`.
    #[must_use]
    pub fn admits(&self, id: StateId) -> bool {
        let session = self.session.borrow();
        (self.config.constrain)(session.state(id))
    }

    /// Cruising and unconstrained: the planner's reduced-branching regime.
    #[must_use]
    pub fn is_cruise_node(&self, id: StateId) -> bool {
        let session = self.session.borrow();
        let record = session.record(id);
        !record.constrained && record.state.is_cruising()
    }

    /// Heuristic estimate from `id` to `goal`, memoized for the current goal.
    ///
    /// Constrained states use the constrained heuristic.
    #[must_use]
    pub fn estimate(&self, id: StateId, goal: StateId) -> f64 {
        if let Some(h) = self.session.borrow_mut().memoized_h(id, goal) {
            return h;
        }
        let h = {
            let session = self.session.borrow();
            let record = session.record(id);
            let heuristic = if record.constrained {
                &self.config.heuristic_constrained
            } else {
                &self.config.heuristic_free
            };
            heuristic.estimate(&record.state, session.state(goal), &self.config.limits())
        };
        self.session.borrow_mut().memoize_h(id, h);
        h
    }

    /// Whether the zero-velocity `goal` is reachable from `node` in one step.
    ///
    /// Every axis must be within one jerk step of the goal in position,
    /// velocity, and acceleration, with velocity not pointing away from the
    /// goal and acceleration not pushing the wrong way while stopping.
    #[must_use]
    pub fn is_goal_neighbor(&self, node: &KinematicState, goal: &KinematicState) -> bool {
        (0..self.config.dimensions).all(|i| {
            let j = self.jerk[i];
            let ds = goal.position()[i] - node.position()[i];
            let v = node.velocity()[i];
            let a = node.acceleration()[i];
            let dv = -v;
            let near = (-j..=j).contains(&ds);
            let slow = (-j..=j).contains(&v);
            let toward = !(v < 0.0 && ds > 0.0 || v > 0.0 && ds < 0.0);
            let smooth = (-j..=j).contains(&a);
            let braking = !(dv > 0.0 && a < -j || dv < 0.0 && a > j);
            near && slow && toward && smooth && braking
        })
    }

    /// Admissible acceleration choices for axis `i` of `state`, given the
    /// signed distance `ds_goal` to the goal on that axis.
    ///
    /// Choices are drawn from holding the current acceleration and stepping it
    /// one jerk up or down, clipped to the acceleration bound. Each must keep
    /// the resulting velocity within the velocity bound. Unconstrained states
    /// also drop choices that would carry the axis past the goal; deceleration
    /// is exempt. Choices come in progress order: hold, up, down when the goal
    /// lies ahead, hold, down, up otherwise.
    #[must_use]
    pub fn axis_accelerations(
        &self,
        state: &KinematicState,
        constrained: bool,
        i: usize,
        ds_goal: f64,
    ) -> Vec<f64> {
        let a = state.acceleration()[i];
        let v = state.velocity()[i];
        let a_max = self.config.max_acceleration[i];
        let v_max = self.config.max_velocity[i];
        let j = self.jerk[i];

        let a_up = (a + j).min(a_max);
        let a_down = (a - j).max(-a_max);
        let can_up = a < a_max;
        let can_down = -a_max < a;
        let (v_hold, v_up, v_down) = (v + a, v + a_up, v + a_down);
        let bounded = |v_next: f64| (-v_max..=v_max).contains(&v_next);

        let mut out = Vec::with_capacity(3);
        if constrained {
            let hold = bounded(v_hold);
            let up = can_up && bounded(v_up);
            let down = can_down && bounded(v_down);
            push_in_progress_order(&mut out, ds_goal, (hold, a), (up, a_up), (down, a_down));
        } else if ds_goal >= 0.0 {
            let ceiling = ds_goal.min(v_max);
            let hold = (-v_max..=ceiling).contains(&v_hold);
            let up = can_up && (-v_max..=ceiling).contains(&v_up);
            let down = can_down && bounded(v_down);
            push_in_progress_order(&mut out, ds_goal, (hold, a), (up, a_up), (down, a_down));
        } else {
            let floor = ds_goal.max(-v_max);
            let hold = (floor..=v_max).contains(&v_hold);
            let down = can_down && (floor..=v_max).contains(&v_down);
            let up = can_up && bounded(v_up);
            push_in_progress_order(&mut out, ds_goal, (hold, a), (up, a_up), (down, a_down));
        }
        out
    }
}

fn push_in_progress_order(
    out: &mut Vec<f64>,
    ds_goal: f64,
    hold: (bool, f64),
    up: (bool, f64),
    down: (bool, f64),
) {
    let order = if ds_goal >= 0.0 {
        [hold, up, down]
    } else {
        [hold, down, up]
    };
    out.extend(order.into_iter().filter(|(ok, _)| *ok).map(|(_, a)| a));
}

impl std::fmt::Debug for KinematicGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KinematicGraph")
            .field("config", &self.config)
            .field("jerk", &self.jerk)
            .field("nodes", &self.node_count())
            .finish_non_exhaustive()
    }
}

impl SearchGraph for KinematicGraph {
    type Node = StateId;

    fn neighbors<'a>(
        &'a self,
        node: StateId,
        goal: StateId,
    ) -> Box<dyn Iterator<Item = Successor<StateId>> + 'a> {
        Box::new(NeighborIter::new(self, node, goal))
    }

    fn cost(&self, from: StateId, to: StateId) -> f64 {
        if from == to {
            return 0.0;
        }
        let session = self.session.borrow();
        self.config
            .cost
            .between(session.state(from), session.state(to))
    }

    fn heuristic(&self, node: StateId, goal: StateId) -> f64 {
        self.estimate(node, goal)
    }
}
