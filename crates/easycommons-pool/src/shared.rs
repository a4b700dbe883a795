//! Process-wide pools with explicit, lazy construction.
//!
//! A [`SharedPool`] is declared as a `static` and builds its inner
//! [`ResourcePool`] on first use. Code that needs an isolated pool (tests,
//! embedded use) constructs a `ResourcePool` directly instead.
//!
//! ```
//! use easycommons_pool::{BufferHandler, PoolConfig, PoolError, ResourcePool, SharedPool};
//!
//! fn scratch_buffers() -> Result<ResourcePool<BufferHandler>, PoolError> {
//!     ResourcePool::new(BufferHandler::new(4096), PoolConfig::unbounded())
//! }
//!
//! static SCRATCH: SharedPool<BufferHandler> = SharedPool::new(scratch_buffers);
//!
//! let len = SCRATCH
//!     .with(|buf| {
//!         buf.extend_from_slice(b"<doc/>");
//!         buf.len()
//!     })
//!     .unwrap();
//! assert_eq!(len, 6);
//! ```

use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cancel::CancellationToken;
use crate::error::PoolError;
use crate::handler::ResourceHandler;
use crate::pool::{Lease, Pooled, ResourcePool};

/// Builds the pool behind a [`SharedPool`].
pub type PoolInit<H> = fn() -> Result<ResourcePool<H>, PoolError>;

/// A lazily built pool with process lifetime.
pub struct SharedPool<H: ResourceHandler> {
    cell: OnceLock<ResourcePool<H>>,
    building: Mutex<()>,
    init: PoolInit<H>,
}

impl<H: ResourceHandler> SharedPool<H> {
    /// Declare a shared pool built by `init` on first use.
    #[must_use]
    pub const fn new(init: PoolInit<H>) -> Self {
        Self {
            cell: OnceLock::new(),
            building: parking_lot::const_mutex(()),
            init,
        }
    }

    /// The inner pool, building it if needed.
    ///
    /// Only one thread runs `init` at a time; threads racing the first use
    /// wait for its pool. A failed build is reported to the caller and retried
    /// on the next call.
    pub fn get(&self) -> Result<&ResourcePool<H>, PoolError> {
        if let Some(pool) = self.cell.get() {
            return Ok(pool);
        }
        let _building = self.building.lock();
        if let Some(pool) = self.cell.get() {
            return Ok(pool);
        }
        let pool = (self.init)()?;
        Ok(self.cell.get_or_init(|| pool))
    }

    /// Whether the inner pool has been built.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// See [`ResourcePool::take`].
    pub fn take(&self) -> Result<Lease<H::Resource>, PoolError> {
        self.get()?.take()
    }

    /// See [`ResourcePool::take_cancellable`].
    pub fn take_cancellable(
        &self,
        token: &CancellationToken,
    ) -> Result<Lease<H::Resource>, PoolError> {
        self.get()?.take_cancellable(token)
    }

    /// See [`ResourcePool::take_timeout`].
    pub fn take_timeout(&self, timeout: Duration) -> Result<Lease<H::Resource>, PoolError> {
        self.get()?.take_timeout(timeout)
    }

    /// See [`ResourcePool::release`].
    pub fn release(&self, lease: Lease<H::Resource>) -> Result<(), PoolError> {
        self.get()?.release(lease)
    }

    /// See [`ResourcePool::lease`].
    pub fn lease(&self) -> Result<Pooled<'_, H>, PoolError> {
        self.get()?.lease()
    }

    /// See [`ResourcePool::with`].
    pub fn with<R>(&self, f: impl FnOnce(&mut H::Resource) -> R) -> Result<R, PoolError> {
        self.get()?.with(f)
    }
}

impl<H: ResourceHandler> fmt::Debug for SharedPool<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedPool")
            .field("pool", &self.cell.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    use super::*;
    use crate::config::{PoolConfig, PoolPolicy};
    use crate::handlers::StringHandler;

    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    fn build_strings() -> Result<ResourcePool<StringHandler>, PoolError> {
        BUILDS.fetch_add(1, Ordering::SeqCst);
        ResourcePool::new(StringHandler::new(32), PoolConfig::new(1, 2, PoolPolicy::Reject))
    }

    fn build_broken() -> Result<ResourcePool<StringHandler>, PoolError> {
        ResourcePool::new(StringHandler::new(32), PoolConfig::new(3, 1, PoolPolicy::Wait))
    }

    static STRINGS: SharedPool<StringHandler> = SharedPool::new(build_strings);
    static BROKEN: SharedPool<StringHandler> = SharedPool::new(build_broken);

    #[test]
    fn builds_once_and_shares_state() {
        let first = STRINGS.take().unwrap();
        let second = STRINGS.take().unwrap();
        assert!(STRINGS.is_initialized());
        assert!(STRINGS.take().unwrap_err().is_exhausted());
        STRINGS.release(first).unwrap();
        STRINGS.release(second).unwrap();

        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        assert_eq!(STRINGS.get().unwrap().in_use(), 0);
    }

    static RACE_BUILDS: AtomicUsize = AtomicUsize::new(0);

    fn build_slowly() -> Result<ResourcePool<StringHandler>, PoolError> {
        RACE_BUILDS.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(20));
        ResourcePool::new(StringHandler::new(8), PoolConfig::new(2, 4, PoolPolicy::Wait))
    }

    static RACED: SharedPool<StringHandler> = SharedPool::new(build_slowly);

    #[test]
    fn racing_first_use_builds_one_pool() {
        let barrier = Barrier::new(8);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    barrier.wait();
                    RACED.get().unwrap();
                });
            }
        });
        assert_eq!(RACE_BUILDS.load(Ordering::SeqCst), 1);
        assert_eq!(RACED.get().unwrap().available(), 2);
    }

    #[test]
    fn failed_build_is_reported() {
        assert!(matches!(BROKEN.take(), Err(PoolError::Config(_))));
        assert!(!BROKEN.is_initialized());
    }

    #[test]
    fn with_releases_after_use() {
        let pool: SharedPool<StringHandler> = SharedPool::new(|| {
            ResourcePool::new(StringHandler::new(8), PoolConfig::new(0, 1, PoolPolicy::Reject))
        });
        let out = pool.with(|s| {
            s.push_str("abc");
            s.clone()
        });
        assert_eq!(out.unwrap(), "abc");
        assert!(pool.with(|s| s.is_empty()).unwrap());
    }
}
