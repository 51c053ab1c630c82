// src/crawl/report.rs
// =============================================================================
// What a crawl produces.
//
// While the crawl runs, tasks send CrawlEvents to the driver (one per page
// found, one per failed fetch). The driver collects them into a CrawlReport
// and adds the final visited set once every task is done.
//
// Rust concepts:
// - Serialize: So the whole report can be printed as JSON
// - BTreeSet: A sorted set, so the visited listing prints the same way
//   every run
// =============================================================================

use std::collections::BTreeSet;

use serde::Serialize;

use crate::fetch::FetchFailure;

/// A page that was fetched successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageVisit {
    /// Remaining depth budget when the page was fetched
    pub depth: usize,
    pub id: String,
    pub content: String,
    /// How many outbound links the page listed
    pub links: usize,
}

/// Sent from a crawl task to the driver.
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    Found(PageVisit),
    Failed(FetchFailure),
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: String,
    pub max_depth: usize,
    /// Pages in the order their fetches completed
    pub pages: Vec<PageVisit>,
    pub failures: Vec<FetchFailure>,
    /// Every identifier a task claimed, including ones whose fetch failed
    pub visited: BTreeSet<String>,
}

impl CrawlReport {
    pub fn new(seed: impl Into<String>, max_depth: usize) -> Self {
        Self {
            seed: seed.into(),
            max_depth,
            pages: Vec::new(),
            failures: Vec::new(),
            visited: BTreeSet::new(),
        }
    }

    pub fn record(&mut self, event: CrawlEvent) {
        match event {
            CrawlEvent::Found(page) => self.pages.push(page),
            CrawlEvent::Failed(failure) => self.failures.push(failure),
        }
    }

    /// True when no fetch failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_splits_pages_and_failures() {
        let mut report = CrawlReport::new("a", 2);
        report.record(CrawlEvent::Found(PageVisit {
            depth: 2,
            id: "a".to_string(),
            content: "Page A".to_string(),
            links: 1,
        }));
        assert!(report.is_clean());

        report.record(CrawlEvent::Failed(FetchFailure::new("b", "not found: b")));
        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = CrawlReport::new("a", 1);
        report.visited.insert("a".to_string());
        report.record(CrawlEvent::Failed(FetchFailure::new("a", "not found: a")));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seed"], "a");
        assert_eq!(json["failures"][0]["id"], "a");
        assert_eq!(json["failures"][0]["cause"], "not found: a");
        assert_eq!(json["visited"], serde_json::json!(["a"]));
    }
}
