// src/fetch/fixture.rs
// =============================================================================
// An in-memory fetcher: every "page" lives in a HashMap.
//
// How it works:
// 1. Look the identifier up in the map
// 2. Found -> return its body and links
// 3. Missing -> return a FetchFailure ("not found: <id>")
//
// Fixtures can come from:
// - The built-in demo data set (a tiny slice of golang.org)
// - A JSON file: { "<id>": { "body": "...", "links": ["...", ...] }, ... }
//
// An optional latency makes every fetch wait a little, which is handy for
// watching the concurrency limiter do its job.
//
// Rust concepts:
// - serde: Derive Serialize/Deserialize to read and write JSON
// - anyhow::Context: Attach a helpful message to an error
// - tokio::time::sleep: Non-blocking wait
// =============================================================================

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{FetchFailure, Fetcher, Page};

// One page as it appears in a fixture file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixturePage {
    pub body: String,
    #[serde(default)]
    pub links: Vec<String>,
}

impl FixturePage {
    pub fn new(body: impl Into<String>, links: &[&str]) -> Self {
        Self {
            body: body.into(),
            links: links.iter().map(|link| link.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, FixturePage>,
    latency: Duration,
}

impl FixtureFetcher {
    pub fn new(pages: HashMap<String, FixturePage>) -> Self {
        Self {
            pages,
            latency: Duration::ZERO,
        }
    }

    /// The built-in demo graph, rooted at `http://golang.org/`.
    ///
    /// `http://golang.org/cmd/` is linked to but not present, so a crawl
    /// of this fixture always reports one failure.
    pub fn demo() -> Self {
        let pages = [
            (
                "http://golang.org/",
                FixturePage::new(
                    "The Go Programming Language",
                    &["http://golang.org/pkg/", "http://golang.org/cmd/"],
                ),
            ),
            (
                "http://golang.org/pkg/",
                FixturePage::new(
                    "Packages",
                    &[
                        "http://golang.org/",
                        "http://golang.org/cmd/",
                        "http://golang.org/pkg/fmt/",
                        "http://golang.org/pkg/os/",
                    ],
                ),
            ),
            (
                "http://golang.org/pkg/fmt/",
                FixturePage::new(
                    "Package fmt",
                    &["http://golang.org/", "http://golang.org/pkg/"],
                ),
            ),
            (
                "http://golang.org/pkg/os/",
                FixturePage::new(
                    "Package os",
                    &["http://golang.org/", "http://golang.org/pkg/"],
                ),
            ),
        ];

        Self::new(
            pages
                .into_iter()
                .map(|(id, page)| (id.to_string(), page))
                .collect(),
        )
    }

    // Loads a fixture from a JSON file
    //
    // The file must be a JSON object mapping identifiers to pages.
    // "links" may be omitted for pages with no outbound links.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture file {}", path.display()))?;

        let pages: HashMap<String, FixturePage> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid fixture JSON in {}", path.display()))?;

        Ok(Self::new(pages))
    }

    /// Makes every fetch wait `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    // Serializes the fixture back to the same JSON shape it is loaded from.
    // BTreeMap gives stable key order so the output is diff-friendly.
    pub fn to_json_pretty(&self) -> Result<String> {
        let ordered: std::collections::BTreeMap<_, _> = self.pages.iter().collect();
        serde_json::to_string_pretty(&ordered).context("Failed to serialize fixture")
    }
}

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, id: &str) -> Result<Page, FetchFailure> {
        tracing::debug!(id = %id, "Fetching: {}", id);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.pages.get(id) {
            Some(page) => Ok(Page {
                content: page.body.clone(),
                links: page.links.clone(),
            }),
            None => Err(FetchFailure::new(id, format!("not found: {}", id))),
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[serde(default)] do?
//    - If "links" is missing from the JSON, serde fills in Vec::default()
//    - That's an empty Vec, so leaf pages can skip the field
//
// 2. Why with_context instead of context?
//    - with_context takes a closure, so the format!() only runs on error
//    - context takes a ready-made value, fine for static strings
//
// 3. Why does fetch() take &self?
//    - Many tasks call fetch() at the same time through an Arc
//    - We only read the map, so a shared reference is all we need
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_demo_root_page() {
        let fetcher = FixtureFetcher::demo();
        let page = fetcher.fetch("http://golang.org/").await.unwrap();
        assert_eq!(page.content, "The Go Programming Language");
        assert_eq!(
            page.links,
            vec!["http://golang.org/pkg/", "http://golang.org/cmd/"]
        );
    }

    #[tokio::test]
    async fn test_missing_page_fails_with_not_found() {
        let fetcher = FixtureFetcher::demo();
        let err = fetcher.fetch("http://golang.org/cmd/").await.unwrap_err();
        assert_eq!(err.id, "http://golang.org/cmd/");
        assert_eq!(err.cause, "not found: http://golang.org/cmd/");
    }

    #[tokio::test]
    async fn test_identifiers_are_not_normalized() {
        let fetcher = FixtureFetcher::demo();
        // No trailing slash -> different identifier
        assert!(fetcher.fetch("http://golang.org").await.is_err());
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "a": {{ "body": "Page A", "links": ["b"] }}, "b": {{ "body": "Page B" }} }}"#
        )
        .unwrap();

        let fetcher = FixtureFetcher::from_json_file(file.path()).unwrap();
        assert_eq!(fetcher.len(), 2);
        assert_eq!(fetcher.pages["b"].links, Vec::<String>::new());
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = FixtureFetcher::from_json_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid fixture JSON"));
    }

    #[test]
    fn test_json_output_loads_back() {
        let json = FixtureFetcher::demo().to_json_pretty().unwrap();
        let pages: HashMap<String, FixturePage> = serde_json::from_str(&json).unwrap();
        assert_eq!(pages.len(), 4);
        assert_eq!(pages["http://golang.org/pkg/os/"].body, "Package os");
    }
}
