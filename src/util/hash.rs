//! Hashing utilities for fingerprinting.

use sha2::{Digest, Sha256};

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a length-prefixed string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.update_len(s.len());
        self.hasher.update(s.as_bytes());
        self
    }

    /// Add a count, such as the number of entries that follow.
    pub fn update_len(&mut self, len: usize) -> &mut Self {
        self.hasher.update((len as u64).to_le_bytes());
        self
    }

    /// Add a length-prefixed list of strings.
    ///
    /// The prefix keeps `["a", "b"], []` apart from `["a"], ["b"]`.
    pub fn update_list<S: AsRef<str>>(&mut self, items: &[S]) -> &mut Self {
        self.update_len(items.len());
        for item in items {
            self.update_str(item.as_ref());
        }
        self
    }

    /// Finish and return the hex digest.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
