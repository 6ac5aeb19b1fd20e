//! Digests for catalogue sources and resolved mappings.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hex digest of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Incremental digest over an ordered sequence of string components.
///
/// Components are NUL separated so `["ab", "c"]` and `["a", "bc"]` differ.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0");
        self
    }

    /// Finish and return the hex digest.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
