//! Proof module: canonical JSON bytes and domain-separated content hashing.
//!
//! Used to digest plans so that two runs of the planner can be compared byte
//! for byte.

pub mod canon;
pub mod hash;
pub mod hash_domain;
