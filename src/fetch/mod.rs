// src/fetch/mod.rs
// =============================================================================
// This module defines what "fetching a page" means to the crawler.
//
// The crawler never talks to the network itself. It only knows about the
// `Fetcher` trait: give it an identifier (usually a URL), get back the page
// content plus the identifiers that page links to, or a failure.
//
// Submodules:
// - fixture: An in-memory fetcher backed by a map of pages (used by the CLI
//   and by tests)
//
// Rust concepts:
// - Traits: Shared behavior that different types can implement
// - Trait objects: Arc<dyn Fetcher> lets the crawler work with any fetcher
// - async-trait: Async methods on traits that still work as trait objects
// =============================================================================

mod fixture;

pub use fixture::{FixtureFetcher, FixturePage};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// A successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Content label of the page (a title or body text)
    pub content: String,
    /// Outbound identifiers, in the order the page lists them.
    /// Duplicates are kept as-is.
    pub links: Vec<String>,
}

/// The one error a crawl can run into: a page that could not be fetched.
///
/// It never escapes the crawl task that hit it. The task reports it and
/// stops, and the rest of the crawl carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{cause}")]
pub struct FetchFailure {
    /// The identifier we tried to fetch
    pub id: String,
    /// Human-readable reason
    pub cause: String,
}

impl FetchFailure {
    pub fn new(id: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cause: cause.into(),
        }
    }
}

// Anything that can turn an identifier into a page
//
// Send + Sync is required because many crawl tasks share one fetcher
// across tokio worker threads.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Page, FetchFailure>;
}
