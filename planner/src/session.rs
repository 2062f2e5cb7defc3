//! Per-solve state interning.
//!
//! A session owns every state created during one top-level solve. States are
//! rounded onto the precision grid and deduplicated by their quantized key, so
//! equal rounded states share one [`StateId`]. Region membership is evaluated
//! once when a state is first interned; heuristic values are memoized for one
//! goal at a time.

use std::collections::HashMap;
use std::fmt;

use kinoplan_kernel::state::{KinematicState, StateKey};

/// Handle to an interned state: its creation index within the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    /// Creation order within the session, starting at 0.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interning and evaluation counters, reset with the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    /// Intern calls.
    pub lookups: u64,
    /// Intern calls that found an existing state.
    pub lookup_hits: u64,
    /// Heuristic evaluations that missed the memo.
    pub heuristic_evaluations: u64,
    /// Neighbour generations started.
    pub neighbor_calls: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct StateRecord {
    pub(crate) state: KinematicState,
    pub(crate) constrained: bool,
    h: Option<f64>,
}

#[derive(Debug, Default)]
pub(crate) struct Session {
    records: Vec<StateRecord>,
    index: HashMap<StateKey, StateId>,
    memo_goal: Option<StateId>,
    pub(crate) counters: SessionCounters,
}

impl Session {
    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
        self.memo_goal = None;
        self.counters = SessionCounters::default();
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Existing handle for `key`, counting the lookup.
    pub(crate) fn lookup(&mut self, key: &StateKey) -> Option<StateId> {
        self.counters.lookups += 1;
        let found = self.index.get(key).copied();
        if found.is_some() {
            self.counters.lookup_hits += 1;
        }
        found
    }

    /// Store a new rounded state under `key`.
    pub(crate) fn insert(&mut self, key: StateKey, state: KinematicState, constrained: bool) -> StateId {
        let id = StateId(self.records.len());
        self.records.push(StateRecord {
            state,
            constrained,
            h: None,
        });
        self.index.insert(key, id);
        id
    }

    pub(crate) fn record(&self, id: StateId) -> &StateRecord {
        &self.records[id.index()]
    }

    pub(crate) fn state(&self, id: StateId) -> &KinematicState {
        &self.record(id).state
    }

    /// Memoized heuristic of `id` towards `goal`. Switching goals drops every
    /// memoized value.
    pub(crate) fn memoized_h(&mut self, id: StateId, goal: StateId) -> Option<f64> {
        if self.memo_goal != Some(goal) {
            for record in &mut self.records {
                record.h = None;
            }
            self.memo_goal = Some(goal);
        }
        self.records[id.index()].h
    }

    pub(crate) fn memoize_h(&mut self, id: StateId, h: f64) {
        self.counters.heuristic_evaluations += 1;
        self.records[id.index()].h = Some(h);
    }
}
