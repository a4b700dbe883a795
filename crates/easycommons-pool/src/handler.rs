//! Resource lifecycle capability supplied by the owner of a resource type.

use crate::error::PoolError;

/// Creates resources and reacts to them entering and leaving use.
///
/// `on_take` and `on_release` run while the pool's membership lock is held,
/// so they should be cheap (resetting parser state, clearing a buffer).
pub trait ResourceHandler: Send + Sync {
    /// The pooled resource type.
    type Resource: Send;

    /// Create a new resource.
    fn create(&self) -> Result<Self::Resource, PoolError>;

    /// Called after a resource is taken from the pool, before it is returned
    /// to the caller.
    fn on_take(&self, _resource: &mut Self::Resource) {}

    /// Called when a resource is put back in the pool.
    fn on_release(&self, _resource: &mut Self::Resource) {}
}
