//! Per-node search bookkeeping.
//!
//! Records live in a side table owned by one search run, keyed by the graph's
//! node handle. Graph nodes themselves carry no search state.

/// Search metadata for one node.
///
/// A closed node is never re-opened. `predecessor` is only reassigned on a
/// strictly smaller `g` while the node is not closed, so predecessor links
/// form a forest rooted at the start node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRecord<N> {
    /// Best known cost from the start; `+∞` until first reached.
    pub g: f64,
    /// `g + h`: the open-set priority.
    pub f: f64,
    /// In the open set.
    pub open: bool,
    /// Expanded.
    pub closed: bool,
    /// Node through which the best known path arrives.
    pub predecessor: Option<N>,
}

impl<N> NodeRecord<N> {
    /// A node that has not been reached yet.
    #[must_use]
    pub fn unreached() -> Self {
        Self {
            g: f64::INFINITY,
            f: f64::INFINITY,
            open: false,
            closed: false,
            predecessor: None,
        }
    }
}

impl<N> Default for NodeRecord<N> {
    fn default() -> Self {
        Self::unreached()
    }
}

/// Open-set entry: a node with the priority it was queued at.
///
/// A node whose priority improves is queued again; the older entry becomes
/// stale and is skipped when extracted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenEntry<N> {
    pub(crate) f: f64,
    pub(crate) node: N,
}

pub(crate) fn by_priority<N>(a: &OpenEntry<N>, b: &OpenEntry<N>) -> std::cmp::Ordering {
    a.f.total_cmp(&b.f)
}
