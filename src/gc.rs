//! Concurrency / GC coordination (spec.md §5): a write-then-publish
//! notification word that lets a read-only collector thread observe the
//! mutator's committed prefix without any locking.
//!
//! The core stays single-threaded per arena — this module only carries the
//! one cross-thread primitive spec.md names (`the cross-thread notification
//! word with a preceding barrier`), not a scheduler or thread pool.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::arena::Offset;

/// A generation counter the mutator bumps every time it publishes a new
/// committed prefix (i.e. every successful mutation), paired with the
/// lower-bound set's cached minimum so a collector can decide what is safe
/// to reclaim.
pub struct Notification {
    generation: AtomicU64,
    published_cutoff: AtomicU64,
}

impl Notification {
    #[must_use]
    pub fn new() -> Self {
        Self { generation: AtomicU64::new(0), published_cutoff: AtomicU64::new(0) }
    }

    /// Called by the mutator after a mutation succeeds and the new root is
    /// visible to readers. `cutoff` is the reclaimable boundary as of this
    /// publish (ordinarily the lower-bound set's current minimum).
    ///
    /// The cutoff write happens first and is itself atomic, but the
    /// generation bump is what readers actually wait on: once they observe
    /// it with `Acquire`, the preceding `Release` store guarantees the
    /// cutoff they then load is at least as fresh.
    pub fn publish(&self, cutoff: Offset) {
        self.published_cutoff.store(cutoff, Ordering::Relaxed);
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Called by the collector thread. Returns the most recently published
    /// `(generation, cutoff)` pair; the collector may reclaim any arena
    /// bytes at offsets strictly less than `cutoff`.
    #[must_use]
    pub fn observe(&self) -> (u64, Offset) {
        let generation = self.generation.load(Ordering::Acquire);
        let cutoff = self.published_cutoff.load(Ordering::Relaxed);
        (generation, cutoff)
    }
}

impl Default for Notification {
    fn default() -> Self {
        Self::new()
    }
}
