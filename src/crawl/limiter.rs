// src/crawl/limiter.rs
// =============================================================================
// Caps how many crawl tasks can be fetching at the same moment.
//
// Spawning a task is cheap and we spawn one per discovered link, so the
// number of live tasks can grow quickly. The limiter doesn't stop tasks from
// existing, it only stops more than `capacity` of them from being inside a
// fetch at once.
//
//   capacity = 1  -> fetches run one after another
//   capacity = 8  -> up to 8 fetches in flight
//
// The slot is a permit value. Dropping the permit gives the slot back, so
// it is returned on every path out of the fetch (success, failure, panic).
//
// Rust concepts:
// - tokio::sync::Semaphore: An async counting semaphore
// - RAII: Cleanup happens automatically when a value goes out of scope
// =============================================================================

use tokio::sync::{Semaphore, SemaphorePermit};

#[derive(Debug)]
pub struct ConcurrencyLimiter {
    slots: Semaphore,
    capacity: usize,
}

/// A held fetch slot. Released on drop.
#[derive(Debug)]
pub struct FetchSlot<'a> {
    _permit: SemaphorePermit<'a>,
}

impl ConcurrencyLimiter {
    // A capacity of 0 would make every fetch wait forever, so it is
    // treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Semaphore::new(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Waits until a slot is free and takes it
    pub async fn acquire(&self) -> FetchSlot<'_> {
        // acquire() only errors once the semaphore is closed, and we never
        // close it.
        let permit = match self.slots.acquire().await {
            Ok(permit) => permit,
            Err(_) => unreachable!("fetch limiter semaphore is never closed"),
        };
        FetchSlot { _permit: permit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_zero_capacity_becomes_one() {
        assert_eq!(ConcurrencyLimiter::new(0).capacity(), 1);
        assert_eq!(ConcurrencyLimiter::new(3).capacity(), 3);
    }

    #[tokio::test]
    async fn test_slot_is_released_on_drop() {
        let limiter = ConcurrencyLimiter::new(1);
        {
            let _slot = limiter.acquire().await;
            assert_eq!(limiter.slots.available_permits(), 0);
        }
        assert_eq!(limiter.slots.available_permits(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_never_exceeds_capacity() {
        let limiter = Arc::new(ConcurrencyLimiter::new(2));
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                tokio::spawn(async move {
                    let _slot = limiter.acquire().await;
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(limiter.slots.available_permits(), 2);
    }
}
