//! Search graph contract trait.

use std::fmt::Debug;
use std::hash::Hash;

/// One item yielded by [`SearchGraph::neighbors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Successor<N> {
    /// A usable neighbour.
    Candidate(N),
    /// A neighbour the graph's feasibility filter dropped. Reported to the
    /// observer, never expanded.
    Rejected(N),
}

impl<N: Copy> Successor<N> {
    /// The node regardless of verdict.
    #[must_use]
    pub fn node(&self) -> N {
        match self {
            Self::Candidate(n) | Self::Rejected(n) => *n,
        }
    }
}

/// Trait for graphs that support A* search.
///
/// # Contract
///
/// - `neighbors` yields a finite, duplicate-free sequence per call. It is
///   consumed once and may be generated lazily.
/// - `cost` is non-negative and zero only for identical nodes.
/// - `heuristic` is non-negative and should not overestimate the remaining
///   cost; an overestimate trades optimality for speed.
/// - Node handles compare by identity: two handles are the same node exactly
///   when they are equal.
pub trait SearchGraph {
    /// Cheap node handle.
    type Node: Copy + Eq + Hash + Debug;

    /// Successors of `node`, given the search goal.
    fn neighbors<'a>(
        &'a self,
        node: Self::Node,
        goal: Self::Node,
    ) -> Box<dyn Iterator<Item = Successor<Self::Node>> + 'a>;

    /// Exact transition cost from `from` to its neighbour `to`.
    fn cost(&self, from: Self::Node, to: Self::Node) -> f64;

    /// Estimated remaining cost from `node` to `goal`.
    fn heuristic(&self, node: Self::Node, goal: Self::Node) -> f64;
}
