//! Atomic pool statistics for lock-free usage tracking.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Statistics for pool usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Resources created by the handler, eager ones included.
    pub created: u64,
    /// Resources created eagerly when the pool was built.
    pub eager: u64,
    /// Takes served from the available set.
    pub reused: u64,
    /// Resources put back in the pool.
    pub released: u64,
    /// Takes refused under the reject policy.
    pub rejected: u64,
    /// Waits abandoned through cancellation or timeout.
    pub interrupted: u64,
}

impl PoolStats {
    /// Total successful takes.
    #[must_use]
    pub fn takes(&self) -> u64 {
        self.reused + self.created_on_take()
    }

    /// Fraction of successful takes served without creating a resource.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn reuse_ratio(&self) -> f64 {
        let takes = self.takes();
        if takes == 0 {
            0.0
        } else {
            self.reused as f64 / takes as f64
        }
    }

    fn created_on_take(&self) -> u64 {
        // Eager resources are counted in `reused` once taken.
        self.created.saturating_sub(self.eager)
    }
}

/// Atomic pool statistics for lock-free updates.
#[derive(Debug, Default)]
pub struct AtomicPoolStats {
    created: AtomicU64,
    eager: AtomicU64,
    reused: AtomicU64,
    released: AtomicU64,
    rejected: AtomicU64,
    interrupted: AtomicU64,
}

impl AtomicPoolStats {
    /// Create new zeroed stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a snapshot of current stats.
    pub fn snapshot(&self) -> PoolStats {
        PoolStats {
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            interrupted: self.interrupted.load(Ordering::Relaxed),
            eager: self.eager.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        for counter in [
            &self.created,
            &self.eager,
            &self.reused,
            &self.released,
            &self.rejected,
            &self.interrupted,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Count a resource created while building the pool.
    pub fn record_eager_creation(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
        self.eager.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a resource created to serve a take.
    pub fn record_creation(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a take served from the available set.
    pub fn record_reuse(&self) {
        self.reused.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a release.
    pub fn record_release(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a rejected take.
    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Count an interrupted wait.
    pub fn record_interruption(&self) {
        self.interrupted.fetch_add(1, Ordering::Relaxed);
    }
}
