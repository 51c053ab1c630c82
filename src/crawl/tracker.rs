// src/crawl/tracker.rs
// =============================================================================
// Knows when the whole crawl is finished.
//
// It keeps a count of crawl tasks that have been scheduled but have not
// finished yet:
// - add(n)  before scheduling n new tasks
// - done()  once, when a task finishes
// - wait()  until the count reaches zero
//
// A child is always counted BEFORE it is spawned. The parent is still
// counted at that point, so the total can't drop to zero while work is
// still being handed out.
//
// Tasks don't call done() by hand. They hold a TaskGuard, and dropping the
// guard calls done(). Every way out of a task (early return, failure, even
// a panic) drops the guard exactly once.
//
// Rust concepts:
// - AtomicUsize: A counter many threads can update without a lock
// - tokio::sync::Notify: Wake up whoever is waiting
// - Drop: Code that runs when a value goes away
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct CompletionTracker {
    outstanding: AtomicUsize,
    drained: Notify,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, n: usize) {
        self.outstanding.fetch_add(n, Ordering::AcqRel);
    }

    pub fn done(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "done() called more times than add()");

        if previous == 1 {
            self.drained.notify_waiters();
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    // Resolves once the count is zero.
    //
    // The Notified future is created before the count is read, so a
    // notify_waiters() landing between the read and the await still
    // wakes us.
    pub async fn wait(&self) {
        loop {
            let drained = self.drained.notified();
            if self.outstanding() == 0 {
                return;
            }
            drained.await;
        }
    }

    /// Counts one new task and returns the guard that uncounts it.
    pub fn track(self: &Arc<Self>) -> TaskGuard {
        self.add(1);
        TaskGuard {
            tracker: Arc::clone(self),
        }
    }
}

/// Owned by exactly one crawl task. Calls `done()` when dropped.
#[derive(Debug)]
pub struct TaskGuard {
    tracker: Arc<CompletionTracker>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.tracker.done();
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Ordering::AcqRel and not Relaxed?
//    - The driver reads "zero" and then looks at the visited set
//    - Acquire/Release makes sure everything the tasks wrote before
//      finishing is visible to the driver after it sees zero
//
// 2. Why loop in wait()?
//    - notify_waiters() wakes everyone currently waiting
//    - We re-check the count after waking rather than trusting the wakeup
//
// 3. What is `self: &Arc<Self>`?
//    - A method that can only be called on an Arc-wrapped tracker
//    - It lets the guard keep its own Arc clone alive
// -----------------------------------------------------------------------------
