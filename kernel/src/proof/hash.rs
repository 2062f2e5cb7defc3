//! Domain-separated SHA-256 digests rendered as `sha256:<hex>`.

use std::fmt;

use sha2::{Digest, Sha256};

use super::hash_domain::HashDomain;

const ALGORITHM: &str = "sha256";

/// A SHA-256 digest in its `sha256:<lowercase hex>` rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    rendered: String,
}

impl ContentHash {
    #[must_use]
    pub fn algorithm(&self) -> &str {
        ALGORITHM
    }

    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.rendered[ALGORITHM.len() + 1..]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// `sha256(domain prefix || data)`.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update(data);
    ContentHash {
        rendered: format!("{ALGORITHM}:{}", hex::encode(hasher.finalize())),
    }
}
