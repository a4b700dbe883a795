//! Bounded resource pool with wait and reject exhaustion policies.
//!
//! Capacity is accounted by a counting [`Semaphore`] holding `max_size`
//! permits. Membership (which resources are available, which are in use)
//! lives behind a separate mutex. A taker first acquires a permit, then
//! moves a resource from the available set to the in-use set, creating one
//! if the available set is empty. Releasing does the reverse and returns
//! the permit last, so `available + in_use <= max_size` always holds.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cancel::CancellationToken;
use crate::config::{PoolConfig, PoolPolicy};
use crate::error::{Interruption, PoolError};
use crate::handler::ResourceHandler;
use crate::semaphore::Semaphore;
use crate::stats::{AtomicPoolStats, PoolStats};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// A resource checked out of a [`ResourcePool`].
///
/// The lease must be handed back with [`ResourcePool::release`]; dropping it
/// instead permanently consumes one unit of the pool's capacity. Use
/// [`ResourcePool::lease`] for a guard that releases on drop.
pub struct Lease<T> {
    pool_id: u64,
    id: u64,
    resource: T,
}

impl<T> Lease<T> {
    /// Pool-unique identifier of the leased resource.
    ///
    /// The same resource keeps its id across takes.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<T> Deref for Lease<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.resource
    }
}

impl<T> DerefMut for Lease<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.resource
    }
}

impl<T: fmt::Debug> fmt::Debug for Lease<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("id", &self.id)
            .field("resource", &self.resource)
            .finish()
    }
}

struct Slots<T> {
    available: VecDeque<(u64, T)>,
    in_use: HashSet<u64>,
    next_id: u64,
}

impl<T> Slots<T> {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// How a take waits for capacity under [`PoolPolicy::Wait`].
#[derive(Clone, Copy)]
enum WaitMode<'a> {
    Forever,
    Cancellable(&'a CancellationToken),
    Until(Instant),
}

/// A pool of resources whose lifecycle is managed by a [`ResourceHandler`].
///
/// At most `max_size` resources exist in use at once. `min_size` resources
/// are created when the pool is built; the rest are created on demand and
/// never destroyed while the pool lives.
pub struct ResourcePool<H: ResourceHandler> {
    id: u64,
    handler: H,
    config: PoolConfig,
    permits: Semaphore,
    slots: Mutex<Slots<H::Resource>>,
    stats: AtomicPoolStats,
}

impl<H: ResourceHandler> ResourcePool<H> {
    /// Build a pool, eagerly creating `config.min_size` resources.
    pub fn new(handler: H, config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;

        let stats = AtomicPoolStats::new();
        let mut slots = Slots {
            available: VecDeque::with_capacity(config.min_size),
            in_use: HashSet::new(),
            next_id: 0,
        };
        for _ in 0..config.min_size {
            let resource = handler.create()?;
            let id = slots.allocate_id();
            slots.available.push_back((id, resource));
            stats.record_eager_creation();
        }

        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        debug!(
            pool = id,
            min_size = config.min_size,
            max_size = config.max_size,
            policy = %config.policy,
            "resource pool created"
        );

        Ok(Self {
            id,
            handler,
            config,
            permits: Semaphore::new(config.max_size),
            slots: Mutex::new(slots),
            stats,
        })
    }

    /// Take a resource.
    ///
    /// Under [`PoolPolicy::Wait`] this blocks until a resource is available.
    /// Under [`PoolPolicy::Reject`] it fails with [`PoolError::Exhausted`] when
    /// every resource is in use.
    pub fn take(&self) -> Result<Lease<H::Resource>, PoolError> {
        self.take_with(WaitMode::Forever)
    }

    /// Like [`take`](Self::take), but a wait is abandoned with
    /// [`PoolError::Interrupted`] once `token` is cancelled.
    pub fn take_cancellable(
        &self,
        token: &CancellationToken,
    ) -> Result<Lease<H::Resource>, PoolError> {
        self.take_with(WaitMode::Cancellable(token))
    }

    /// Like [`take`](Self::take), but a wait is abandoned with
    /// [`PoolError::Interrupted`] after `timeout`.
    pub fn take_timeout(&self, timeout: Duration) -> Result<Lease<H::Resource>, PoolError> {
        self.take_with(WaitMode::Until(Instant::now() + timeout))
    }

    /// Put a resource back in the pool and return its capacity.
    ///
    /// Releasing a lease this pool did not hand out is a programming error:
    /// it trips a debug assertion, and in release builds returns
    /// [`PoolError::NotInUse`] without changing the pool.
    pub fn release(&self, lease: Lease<H::Resource>) -> Result<(), PoolError> {
        let Lease {
            pool_id,
            id,
            mut resource,
        } = lease;

        {
            let mut slots = self.slots.lock();
            let tracked = pool_id == self.id && slots.in_use.remove(&id);
            debug_assert!(tracked, "resource #{id} is not in use in this pool");
            if !tracked {
                return Err(PoolError::NotInUse { id });
            }
            self.handler.on_release(&mut resource);
            slots.available.push_back((id, resource));
        }

        self.stats.record_release();
        self.permits.release();
        Ok(())
    }

    /// Take a resource wrapped in a guard that releases it on drop.
    pub fn lease(&self) -> Result<Pooled<'_, H>, PoolError> {
        self.take().map(|lease| Pooled::new(self, lease))
    }

    /// Guarded variant of [`take_cancellable`](Self::take_cancellable).
    pub fn lease_cancellable(&self, token: &CancellationToken) -> Result<Pooled<'_, H>, PoolError> {
        self.take_cancellable(token)
            .map(|lease| Pooled::new(self, lease))
    }

    /// Guarded variant of [`take_timeout`](Self::take_timeout).
    pub fn lease_timeout(&self, timeout: Duration) -> Result<Pooled<'_, H>, PoolError> {
        self.take_timeout(timeout)
            .map(|lease| Pooled::new(self, lease))
    }

    /// Take a resource, run `f` on it, and release it.
    pub fn with<R>(&self, f: impl FnOnce(&mut H::Resource) -> R) -> Result<R, PoolError> {
        let mut pooled = self.lease()?;
        Ok(f(&mut pooled))
    }

    /// Number of resources waiting in the available set.
    #[must_use]
    pub fn available(&self) -> usize {
        self.slots.lock().available.len()
    }

    /// Number of resources currently taken.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.slots.lock().in_use.len()
    }

    /// Number of takes that could succeed right now without waiting.
    #[must_use]
    pub fn permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// The exhaustion policy.
    #[must_use]
    pub fn policy(&self) -> PoolPolicy {
        self.config.policy
    }

    /// Resources created when the pool was built.
    #[must_use]
    pub fn min_size(&self) -> usize {
        self.config.min_size
    }

    /// Maximum number of resources in use at once.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.config.max_size
    }

    /// The handler managing this pool's resources.
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    /// Reset pool statistics counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    fn take_with(&self, mode: WaitMode<'_>) -> Result<Lease<H::Resource>, PoolError> {
        self.acquire_permit(mode)?;
        self.checkout()
    }

    fn acquire_permit(&self, mode: WaitMode<'_>) -> Result<(), PoolError> {
        match self.config.policy {
            PoolPolicy::Reject => {
                if let WaitMode::Cancellable(token) = mode {
                    token.check_cancelled()?;
                }
                if self.permits.try_acquire() {
                    Ok(())
                } else {
                    self.stats.record_rejection();
                    warn!(pool = self.id, "resource pool exhausted, take rejected");
                    Err(PoolError::Exhausted)
                }
            }
            PoolPolicy::Wait => {
                let outcome = match mode {
                    WaitMode::Forever => {
                        self.permits.acquire();
                        Ok(())
                    }
                    WaitMode::Cancellable(token) => self.permits.acquire_cancellable(token),
                    WaitMode::Until(deadline) => self.permits.acquire_until(deadline),
                };
                outcome.map_err(|reason: Interruption| {
                    self.stats.record_interruption();
                    debug!(pool = self.id, %reason, "wait for pooled resource interrupted");
                    PoolError::Interrupted(reason)
                })
            }
        }
    }

    /// Move a resource into the in-use set. The caller holds a permit.
    fn checkout(&self) -> Result<Lease<H::Resource>, PoolError> {
        let mut slots = self.slots.lock();
        let reused = slots.available.pop_front();
        let (id, mut resource) = if let Some(entry) = reused {
            self.stats.record_reuse();
            entry
        } else {
            match self.handler.create() {
                Ok(resource) => {
                    self.stats.record_creation();
                    let id = slots.allocate_id();
                    debug!(pool = self.id, resource = id, "pooled resource created");
                    (id, resource)
                }
                Err(err) => {
                    drop(slots);
                    self.permits.release();
                    warn!(pool = self.id, error = %err, "failed to create pooled resource");
                    return Err(err);
                }
            }
        };

        slots.in_use.insert(id);
        self.handler.on_take(&mut resource);
        Ok(Lease {
            pool_id: self.id,
            id,
            resource,
        })
    }
}

impl<H: ResourceHandler> fmt::Debug for ResourcePool<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.lock();
        f.debug_struct("ResourcePool")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("available", &slots.available.len())
            .field("in_use", &slots.in_use.len())
            .finish_non_exhaustive()
    }
}

/// A pooled resource that goes back to its pool when dropped.
pub struct Pooled<'a, H: ResourceHandler> {
    pool: &'a ResourcePool<H>,
    lease: Option<Lease<H::Resource>>,
}

impl<'a, H: ResourceHandler> Pooled<'a, H> {
    fn new(pool: &'a ResourcePool<H>, lease: Lease<H::Resource>) -> Self {
        Self {
            pool,
            lease: Some(lease),
        }
    }

    /// Pool-unique identifier of the guarded resource.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.lease().id
    }

    /// Give up the guard and keep the raw lease. The caller becomes
    /// responsible for releasing it.
    #[must_use]
    pub fn into_lease(mut self) -> Lease<H::Resource> {
        self.lease
            .take()
            .expect("pooled resource is present until drop")
    }

    fn lease(&self) -> &Lease<H::Resource> {
        self.lease
            .as_ref()
            .expect("pooled resource is present until drop")
    }
}

impl<H: ResourceHandler> Deref for Pooled<'_, H> {
    type Target = H::Resource;

    fn deref(&self) -> &H::Resource {
        &self.lease().resource
    }
}

impl<H: ResourceHandler> DerefMut for Pooled<'_, H> {
    fn deref_mut(&mut self) -> &mut H::Resource {
        &mut self
            .lease
            .as_mut()
            .expect("pooled resource is present until drop")
            .resource
    }
}

impl<H: ResourceHandler> Drop for Pooled<'_, H> {
    fn drop(&mut self) {
        if let Some(lease) = self.lease.take() {
            if let Err(err) = self.pool.release(lease) {
                warn!(pool = self.pool.id, error = %err, "failed to release pooled resource");
            }
        }
    }
}

impl<H> fmt::Debug for Pooled<'_, H>
where
    H: ResourceHandler,
    H::Resource: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pooled").field(&self.lease).finish()
    }
}
