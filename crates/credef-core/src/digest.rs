//! # Content Digest
//!
//! Fingerprints a compiled artifact so that a published schema or context
//! can be compared against a fresh compilation without diffing documents.
//!
//! Digests are SHA-256 over JCS-canonical bytes and render as
//! `sha256:<64 lowercase hex>`, which is also their serialized form.
//! [`sha256_digest`] takes only [`CanonicalBytes`], so nothing can be
//! hashed off the canonical path.

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// Prefix naming the hash function in the rendered form.
const PREFIX: &str = "sha256";

/// SHA-256 digest of an artifact's canonical bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex of the raw digest, without the algorithm prefix.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{PREFIX}:{}", self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest(bytes)
}
