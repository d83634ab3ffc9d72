//! Run-scoped sentence deduplication
//!
//! Every sentence in the output stream must be unique across the whole run,
//! comparing case- and whitespace-normalized forms. The set stores 64-bit
//! hashes of the normalized keys rather than the strings themselves, which
//! keeps a full-archive run's footprint small. The tradeoff: a 64-bit hash
//! collision drops a distinct sentence. At tens of millions of sentences the
//! expected collision count stays far below one, and a false drop only loses
//! a sentence rather than corrupting the stream.
//!
//! The set is explicitly owned by the writer role and passed by reference;
//! it is the single mutual-exclusion point of the pipeline, never ambient
//! global state.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::simplify::collapse_whitespace;

/// Normalized comparison key for a sentence: trimmed, internal whitespace
/// collapsed, case-folded. The emitted value keeps its original casing.
pub fn normalize(sentence: &str) -> String {
    collapse_whitespace(sentence).to_lowercase()
}

/// Set of sentences already emitted during this run
#[derive(Debug, Default)]
pub struct DedupSet {
    seen: HashSet<u64>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sentence; returns true on first occurrence, false if an
    /// equivalent sentence was already emitted anywhere in the run.
    pub fn insert(&mut self, sentence: &str) -> bool {
        self.seen.insert(Self::key(&normalize(sentence)))
    }

    /// Number of distinct sentences recorded
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn key(normalized: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        normalized.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_wins() {
        let mut set = DedupSet::new();
        assert!(set.insert("The sky is blue."));
        assert!(!set.insert("The sky is blue."));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn comparison_ignores_case_and_whitespace() {
        let mut set = DedupSet::new();
        assert!(set.insert("The sky is blue."));
        assert!(!set.insert("  THE  sky\tis BLUE.  "));
    }
}
