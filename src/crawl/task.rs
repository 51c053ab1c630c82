// src/crawl/task.rs
// =============================================================================
// One crawl task = one (identifier, depth) pair.
//
// Lifecycle:
//   start ── depth == 0 ─────────────────────────────┐
//     │                                              │
//   check_and_mark ── already visited ───────────────┤
//     │                                              │
//   fetch (inside a limiter slot) ── failed ─ report ┤
//     │                                              │
//   report page, spawn one task per link at depth-1 ─┴─> finished
//
// "finished" is the TaskGuard being dropped, which takes this task off the
// completion tracker. Each child is tracked before it is spawned, and the
// limiter slot is already released by the time children are spawned.
//
// Duplicates are only filtered at check_and_mark. The same link can be
// spawned several times (from different parents, or twice in one list);
// every copy after the first just finds it visited and stops.
//
// Rust concepts:
// - tokio::spawn: Run a future as an independent task
// - BoxFuture: A heap-allocated future with a fixed type, needed because
//   a task spawns more tasks of its own kind
// =============================================================================

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info, warn};

use super::report::{CrawlEvent, PageVisit};
use super::tracker::TaskGuard;
use super::CrawlContext;

// Counts a new task on the tracker, then spawns it.
// The order matters: counting first means the tracker can't read zero
// while this task exists but hasn't started.
pub(super) fn spawn_task(ctx: &Arc<CrawlContext>, id: String, depth: usize) {
    let guard = ctx.tracker.track();
    tokio::spawn(run_task(Arc::clone(ctx), id, depth, guard));
}

fn run_task(
    ctx: Arc<CrawlContext>,
    id: String,
    depth: usize,
    guard: TaskGuard,
) -> BoxFuture<'static, ()> {
    async move {
        // Dropped at the end of this block, whichever way we leave it
        let _guard = guard;

        if depth == 0 {
            debug!(id = %id, "Depth budget exhausted");
            return;
        }

        if !ctx.registry.check_and_mark(&id) {
            debug!(id = %id, depth, "Already visited, skipping");
            return;
        }

        let result = {
            let _slot = ctx.limiter.acquire().await;
            ctx.fetcher.fetch(&id).await
        };

        let page = match result {
            Ok(page) => page,
            Err(failure) => {
                warn!(id = %failure.id, cause = %failure.cause, "Fetch failed");
                ctx.emit(CrawlEvent::Failed(failure));
                return;
            }
        };

        info!(depth, id = %id, content = %page.content, links = page.links.len(), "Found page");
        ctx.emit(CrawlEvent::Found(PageVisit {
            depth,
            id,
            content: page.content,
            links: page.links.len(),
        }));

        for link in page.links {
            spawn_task(&ctx, link, depth - 1);
        }
    }
    .boxed()
}
