//! Kinoplan Kernel: numeric and identity primitives for the motion planner.
//!
//! # API Surface
//!
//! - [`vector`] -- elementwise arithmetic over fixed-length axis arrays
//! - [`state::KinematicState`] -- per-axis position/velocity/acceleration value
//! - [`motion::tsvva`] -- closed-form minimum traverse time under bounded acceleration
//! - [`proof`] -- canonical JSON bytes and domain-separated content hashing
//!
//! # Module Dependency Direction
//!
//! `state` depends on `vector`; `motion` and `proof` depend on nothing internal.
//!
//! The kernel knows nothing about search. It carries no domain policy beyond
//! rounding and identity.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod motion;
pub mod proof;
pub mod state;
pub mod vector;
