// src/crawl/mod.rs
// =============================================================================
// This module runs a crawl.
//
// Features:
// - Concurrent: every discovered link becomes its own tokio task
// - Never fetches the same identifier twice in one crawl
// - Depth-bounded: each hop spends one unit of the depth budget
// - A failed fetch only ends its own branch of the crawl
// - Configurable number of simultaneous fetches
//
// Pieces (one file each):
// - registry: the shared visited set (atomic check-and-mark)
// - limiter:  caps simultaneous fetches
// - tracker:  counts unfinished tasks so we know when we're done
// - task:     what a single crawl task does
// - report:   events and the final report
//
// Rust concepts:
// - Arc: Shared ownership, so every task can reach the same context
// - mpsc channels: Tasks send events, the driver receives them
// - tokio::select!: Wait on two things at once
// =============================================================================

mod limiter;
mod registry;
mod report;
mod task;
mod tracker;

pub use report::{CrawlEvent, CrawlReport, PageVisit};

use limiter::ConcurrencyLimiter;
use registry::VisitedRegistry;
use tracker::CompletionTracker;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::fetch::Fetcher;

/// Default depth budget for a crawl.
pub const DEFAULT_MAX_DEPTH: usize = 4;
/// Default number of fetches allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Depth budget of the seed. The seed is fetched at this depth and each
    /// hop costs one; nothing is fetched at depth 0.
    pub max_depth: usize,
    /// Maximum simultaneous fetches (at least 1)
    pub concurrency: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl CrawlOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

// Everything a crawl task needs, shared by all tasks of one crawl.
// Created fresh for every crawl, never global.
pub(crate) struct CrawlContext {
    fetcher: Arc<dyn Fetcher>,
    registry: VisitedRegistry,
    limiter: ConcurrencyLimiter,
    tracker: Arc<CompletionTracker>,
    events: mpsc::UnboundedSender<CrawlEvent>,
}

impl CrawlContext {
    fn emit(&self, event: CrawlEvent) {
        // The driver holds the receiver until every task is done, so this
        // only fails if the driver itself was dropped mid-crawl.
        let _ = self.events.send(event);
    }
}

// Crawls from `seed` and returns once every spawned task has finished
//
// Parameters:
//   fetcher:  where pages come from
//   seed:     the first identifier to crawl
//   options:  depth budget and fetch concurrency
//   on_event: called for every page found / fetch failed, in the order
//             fetches complete (used by the CLI for live output)
//
// Returns: CrawlReport with pages, failures, and the full visited set
//
// Example:
//   max_depth=1: Only fetch the seed
//   max_depth=2: Fetch the seed + the pages it links to
pub async fn crawl<F>(
    fetcher: Arc<dyn Fetcher>,
    seed: &str,
    options: &CrawlOptions,
    mut on_event: F,
) -> CrawlReport
where
    F: FnMut(&CrawlEvent),
{
    let (events, mut received) = mpsc::unbounded_channel();

    let ctx = Arc::new(CrawlContext {
        fetcher,
        registry: VisitedRegistry::new(),
        limiter: ConcurrencyLimiter::new(options.concurrency),
        tracker: Arc::new(CompletionTracker::new()),
        events,
    });

    tracing::info!(
        seed = %seed,
        max_depth = options.max_depth,
        concurrency = ctx.limiter.capacity(),
        "Starting crawl"
    );

    let mut report = CrawlReport::new(seed, options.max_depth);

    // Counts the root task (outstanding = 1) and spawns it
    task::spawn_task(&ctx, seed.to_string(), options.max_depth);

    let finished = ctx.tracker.wait();
    tokio::pin!(finished);

    loop {
        tokio::select! {
            biased;
            Some(event) = received.recv() => {
                on_event(&event);
                report.record(event);
            }
            () = &mut finished => break,
        }
    }

    // Events sent right before the last task finished
    while let Ok(event) = received.try_recv() {
        on_event(&event);
        report.record(event);
    }

    report.visited = ctx.registry.snapshot();

    tracing::info!(
        seed = %seed,
        pages = report.pages.len(),
        failures = report.failures.len(),
        visited = report.visited.len(),
        "Crawl finished"
    );

    report
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn Fetcher> and not a generic F: Fetcher?
//    - Each task is spawned separately and must be 'static
//    - An Arc'd trait object is easy to clone into every task and keeps
//      the task type the same no matter which fetcher is used
//
// 2. What does `biased;` in select! do?
//    - select! normally picks a random ready branch
//    - biased checks branches top to bottom, so pending events are
//      handled before we notice the crawl is finished
//
// 3. Why tokio::pin!?
//    - We poll the same wait() future on every loop iteration
//    - Polling a future by reference requires it to be pinned
// -----------------------------------------------------------------------------
