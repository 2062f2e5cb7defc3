//! A* entry point and expansion loop.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, trace};

use crate::contract::{SearchGraph, Successor};
use crate::error::SearchError;
use crate::node::{by_priority, NodeRecord, OpenEntry};
use crate::observer::{NeighborOutcome, SearchObserver};
use crate::outcome::{SearchOutcome, SearchStats, TerminationReason};
use crate::policy::SearchPolicy;
use crate::queue::{ApproxPriorityQueue, Comparator};

/// A* engine bound to a validated [`SearchPolicy`].
#[derive(Debug, Clone, Default)]
pub struct AStar {
    policy: SearchPolicy,
}

impl AStar {
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if the policy fails validation.
    pub fn new(policy: SearchPolicy) -> Result<Self, SearchError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    #[must_use]
    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Search from `start` to `goal`.
    ///
    /// Frontier exhaustion, budget exhaustion, and cancellation are ordinary
    /// outcomes with an empty path; check [`SearchOutcome::is_goal_reached`].
    pub fn solve<G>(
        &self,
        graph: &G,
        start: G::Node,
        goal: G::Node,
        observer: &mut dyn SearchObserver<G::Node>,
    ) -> SearchOutcome<G::Node>
    where
        G: SearchGraph + ?Sized,
    {
        let started = Instant::now();
        let mut records: HashMap<G::Node, NodeRecord<G::Node>> = HashMap::new();
        let mut open: ApproxPriorityQueue<OpenEntry<G::Node>, Comparator<OpenEntry<G::Node>>> =
            ApproxPriorityQueue::with_config(self.policy.queue.clone(), by_priority);
        let mut stats = SearchStats::default();
        let mut path = Vec::new();

        let h = graph.heuristic(start, goal);
        records.insert(
            start,
            NodeRecord {
                g: 0.0,
                f: h,
                open: true,
                closed: false,
                predecessor: None,
            },
        );
        open.insert(OpenEntry { f: h, node: start });
        stats.frontier_high_water = 1;

        let termination = loop {
            if stats.iterations >= self.policy.max_iterations {
                break TerminationReason::IterationBudgetExceeded;
            }
            let Some(entry) = open.extract_min() else {
                break TerminationReason::FrontierExhausted;
            };
            let current = entry.node;
            let g_current = match records.get_mut(&current) {
                Some(record) if record.open && record.f.total_cmp(&entry.f).is_eq() => {
                    record.open = false;
                    record.closed = true;
                    record.g
                }
                _ => continue,
            };
            stats.iterations += 1;

            if !observer.on_current(current) {
                break TerminationReason::Cancelled;
            }
            if current == goal {
                path = reconstruct(&records, goal);
                break TerminationReason::GoalReached;
            }
            stats.expansions += 1;
            trace!(node = ?current, f = entry.f, g = g_current, "expand");

            for successor in graph.neighbors(current, goal) {
                stats.neighbors_evaluated += 1;
                let neighbor = match successor {
                    Successor::Candidate(n) => n,
                    Successor::Rejected(n) => {
                        observer.on_neighbor(n, NeighborOutcome::Rejected);
                        continue;
                    }
                };
                let record = records.entry(neighbor).or_default();
                if record.closed {
                    observer.on_neighbor(neighbor, NeighborOutcome::AlreadyClosed);
                    continue;
                }
                let tentative = g_current + graph.cost(current, neighbor);
                if tentative >= record.g {
                    observer.on_neighbor(neighbor, NeighborOutcome::NotImproving);
                    continue;
                }
                record.predecessor = Some(current);
                record.g = tentative;
                record.f = tentative + graph.heuristic(neighbor, goal);
                let outcome = if record.open {
                    stats.reprioritized += 1;
                    NeighborOutcome::ImprovedOpen
                } else {
                    record.open = true;
                    NeighborOutcome::Opened
                };
                open.insert(OpenEntry {
                    f: record.f,
                    node: neighbor,
                });
                observer.on_neighbor(neighbor, outcome);
            }
            stats.frontier_high_water = stats.frontier_high_water.max(open.len() as u64);
        };

        let queue_stats = open.stats();
        stats.queue_fills = queue_stats.fills;
        stats.queue_splits = queue_stats.splits;
        stats.termination = termination;
        stats.elapsed = started.elapsed();
        debug!(
            %termination,
            iterations = stats.iterations,
            expansions = stats.expansions,
            path_len = path.len(),
            open = open.len(),
            "search finished"
        );
        SearchOutcome { path, stats }
    }
}

/// Walk predecessor links back from `goal` and return the path start-first.
fn reconstruct<N>(records: &HashMap<N, NodeRecord<N>>, goal: N) -> Vec<N>
where
    N: Copy + Eq + std::hash::Hash,
{
    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(prev) = records.get(&cursor).and_then(|r| r.predecessor) {
        path.push(prev);
        cursor = prev;
    }
    path.reverse();
    path
}
