//! Typed domain separators for content hashing.
//!
//! Every digest is `sha256(prefix || payload)` where the prefix comes from a
//! [`HashDomain`]. A new kind of digest gets its own variant and prefix here,
//! so it cannot collide with plan digests over the same bytes. This file is
//! the only place prefix literals live.

use std::fmt;

/// What a digest identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashDomain {
    /// Canonical plan rendering.
    Plan,
}

impl HashDomain {
    /// Every domain, in declaration order.
    pub const ALL: &'static [HashDomain] = &[Self::Plan];

    /// Null-terminated prefix fed to the hasher ahead of the payload.
    #[must_use]
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Plan => b"KINOPLAN::PLAN::V1\0",
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Plan => "Plan",
        }
    }
}

impl fmt::Display for HashDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
