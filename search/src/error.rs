//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only. Runtime terminations
//! (frontier exhaustion, budget exhaustion, cancellation) are expressed via
//! [`crate::outcome::TerminationReason`] and always produce a
//! [`crate::outcome::SearchOutcome`].

/// Typed failure for pre-flight search validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A policy or queue setting is out of range.
    InvalidPolicy { detail: String },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPolicy { detail } => write!(f, "invalid search policy: {detail}"),
        }
    }
}

impl std::error::Error for SearchError {}
