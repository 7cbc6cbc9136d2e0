//! Per-run memo of inputs this unit has already processed.

use std::{collections::HashSet, fmt};

use sha2::{Digest, Sha256};

/// Payloads longer than this are keyed by their digest instead of verbatim.
pub const MAX_VERBATIM_KEY_LEN: usize = 1024;

/// Identity of an input within one run: the exact event payload, or a
/// `sha256:` digest of it when the payload is large.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeenKey(String);

impl SeenKey {
    pub fn from_data(data: &str) -> Self {
        if data.len() > MAX_VERBATIM_KEY_LEN {
            let digest = Sha256::digest(data.as_bytes());
            return Self(format!("sha256:{}", hex::encode(digest)));
        }
        Self(data.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grows monotonically for the lifetime of a run; nothing is ever evicted.
#[derive(Debug, Default)]
pub struct SeenSet {
    keys: HashSet<SeenKey>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &SeenKey) -> bool {
        self.keys.contains(key)
    }

    /// Returns `true` when the key was not present before.
    pub fn mark(&mut self, key: SeenKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_is_idempotent() {
        let mut seen = SeenSet::new();
        let key = SeenKey::from_data("198.51.100.7");

        assert!(!seen.has(&key));
        assert!(seen.mark(key.clone()));
        assert!(!seen.mark(key.clone()));
        assert!(seen.has(&key));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn keys_match_exact_payloads_only() {
        let mut seen = SeenSet::new();
        seen.mark(SeenKey::from_data("example.com"));

        assert!(!seen.has(&SeenKey::from_data("Example.com")));
        assert!(!seen.has(&SeenKey::from_data("example.com ")));
    }

    #[test]
    fn large_payloads_are_digested() {
        let big = "a".repeat(MAX_VERBATIM_KEY_LEN + 1);
        let key = SeenKey::from_data(&big);

        assert!(key.as_str().starts_with("sha256:"));
        assert_eq!(key.as_str().len(), "sha256:".len() + 64);
        assert_eq!(key, SeenKey::from_data(&big));

        let small = "a".repeat(MAX_VERBATIM_KEY_LEN);
        assert_eq!(SeenKey::from_data(&small).as_str(), small);
    }
}
