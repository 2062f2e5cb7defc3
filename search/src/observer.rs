//! Search observation hooks.

/// What happened to a neighbour while its parent was being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeighborOutcome {
    /// The neighbour was already expanded.
    AlreadyClosed,
    /// The path through the current node is no shorter than the known one.
    NotImproving,
    /// An open neighbour got a shorter path and a new priority.
    ImprovedOpen,
    /// The neighbour entered the open set.
    Opened,
    /// The graph's feasibility filter dropped the neighbour.
    Rejected,
}

impl NeighborOutcome {
    /// Short tag for trace output.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::AlreadyClosed => "closed",
            Self::NotImproving => "not-improving",
            Self::ImprovedOpen => "improved",
            Self::Opened => "opened",
            Self::Rejected => "rejected",
        }
    }
}

/// Trait for search observers.
///
/// Both hooks default to no-ops. Returning `false` from `on_current` cancels
/// the search before the node is expanded.
pub trait SearchObserver<N> {
    /// Called with each node about to be expanded.
    fn on_current(&mut self, _node: N) -> bool {
        true
    }

    /// Called with each neighbour and its outcome.
    fn on_neighbor(&mut self, _node: N, _outcome: NeighborOutcome) {}
}

/// Default observer: observes nothing, never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl<N> SearchObserver<N> for NullObserver {}

/// Observer that records every callback in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingObserver<N> {
    /// Nodes passed to `on_current`, in order.
    pub current: Vec<N>,
    /// Neighbours and outcomes passed to `on_neighbor`, in order.
    pub neighbors: Vec<(N, NeighborOutcome)>,
    /// Cancel once this many nodes have been observed.
    pub cancel_after: Option<usize>,
}

impl<N> Default for RecordingObserver<N> {
    fn default() -> Self {
        Self {
            current: Vec::new(),
            neighbors: Vec::new(),
            cancel_after: None,
        }
    }
}

impl<N> SearchObserver<N> for RecordingObserver<N> {
    fn on_current(&mut self, node: N) -> bool {
        if self.cancel_after.is_some_and(|limit| self.current.len() >= limit) {
            return false;
        }
        self.current.push(node);
        true
    }

    fn on_neighbor(&mut self, node: N, outcome: NeighborOutcome) {
        self.neighbors.push((node, outcome));
    }
}
