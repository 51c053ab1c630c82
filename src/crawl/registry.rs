// src/crawl/registry.rs
// =============================================================================
// The visited registry: which identifiers has this crawl already claimed?
//
// There is exactly one operation crawl tasks may use: check_and_mark().
// It answers "was this new?" and records the identifier in the same step,
// while holding a lock. Two tasks racing on the same identifier can never
// both get `true`, so a page is fetched at most once per crawl.
//
// Identifiers are compared as exact strings. No URL normalization happens
// here, "http://a/" and "http://a" are different pages.
//
// Rust concepts:
// - Mutex: Only one thread at a time can touch the data inside
// - HashSet::insert: Returns true only if the value was not present
// =============================================================================

use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct VisitedRegistry {
    visited: Mutex<HashSet<String>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Records `id` as visited.
    // Returns true if this call was the first to see it.
    pub fn check_and_mark(&self, id: &str) -> bool {
        // A poisoned lock only means another task panicked while holding it.
        // The set itself is still valid, so keep going.
        let mut visited = self
            .visited
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if visited.contains(id) {
            return false;
        }
        visited.insert(id.to_string())
    }

    /// Copies the contents out for reporting, sorted.
    ///
    /// Only meaningful once every crawl task has finished.
    pub fn snapshot(&self) -> BTreeSet<String> {
        let visited = self
            .visited
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        visited.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_mark_wins() {
        let registry = VisitedRegistry::new();
        assert!(registry.check_and_mark("a"));
        assert!(!registry.check_and_mark("a"));
        assert!(registry.check_and_mark("b"));
    }

    #[test]
    fn test_exact_string_equality() {
        let registry = VisitedRegistry::new();
        assert!(registry.check_and_mark("http://a/"));
        assert!(registry.check_and_mark("http://a"));
        assert!(registry.check_and_mark("HTTP://a/"));
    }

    #[test]
    fn test_concurrent_marks_have_one_winner() {
        let registry = Arc::new(VisitedRegistry::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (0..100)
                        .filter(|n| registry.check_and_mark(&format!("page-{}", n)))
                        .count()
                })
            })
            .collect();

        let wins: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(wins, 100);
        assert_eq!(registry.snapshot().len(), 100);
    }
}
