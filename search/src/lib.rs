//! Kinoplan Search: generic A* over an approximate bucketed priority queue.
//!
//! This crate knows nothing about kinematics. It depends on no other
//! workspace crate.
//!
//! # Crate dependency graph
//!
//! ```text
//! kinoplan_kernel  ←  kinoplan_planner  →  kinoplan_search
//! (states, tsvva)     (graph, two-phase)    (queue, A*)
//! ```
//!
//! # Key types
//!
//! - [`ApproxPriorityQueue`] -- bucketed min-queue tuned for many inserts per extract
//! - [`SearchGraph`] -- trait for graphs that support A* search
//! - [`AStar`] -- the search engine, bound to a [`SearchPolicy`]
//! - [`SearchObserver`] -- per-node and per-neighbour hooks, with cancellation
//! - [`SearchOutcome`] -- path plus [`SearchStats`]

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod astar;
pub mod contract;
pub mod error;
pub mod node;
pub mod observer;
pub mod outcome;
pub mod policy;
pub mod queue;

pub use astar::AStar;
pub use contract::{SearchGraph, Successor};
pub use error::SearchError;
pub use node::NodeRecord;
pub use observer::{NeighborOutcome, NullObserver, RecordingObserver, SearchObserver};
pub use outcome::{SearchOutcome, SearchStats, TerminationReason};
pub use policy::SearchPolicy;
pub use queue::{ApproxPriorityQueue, QueueConfig, QueueInvariantError, QueueStats};
