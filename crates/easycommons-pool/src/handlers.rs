//! Ready-made handlers for common resource types.

use std::fmt;
use std::marker::PhantomData;

use crate::error::PoolError;
use crate::handler::ResourceHandler;

/// Handler built from a factory closure and a reset closure.
///
/// The reset closure runs on release, so a resource always comes back out of
/// the pool in its reset state.
pub struct FnHandler<R, C, F> {
    create: C,
    reset: F,
    _resource: PhantomData<fn() -> R>,
}

impl<R, C, F> FnHandler<R, C, F>
where
    C: Fn() -> R,
    F: Fn(&mut R),
{
    /// Create a handler from a factory and a reset closure.
    pub fn new(create: C, reset: F) -> Self {
        Self {
            create,
            reset,
            _resource: PhantomData,
        }
    }
}

impl<R, C, F> ResourceHandler for FnHandler<R, C, F>
where
    R: Send,
    C: Fn() -> R + Send + Sync,
    F: Fn(&mut R) + Send + Sync,
{
    type Resource = R;

    fn create(&self) -> Result<R, PoolError> {
        Ok((self.create)())
    }

    fn on_release(&self, resource: &mut R) {
        (self.reset)(resource);
    }
}

impl<R, C, F> fmt::Debug for FnHandler<R, C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

/// Byte buffers with a preallocated capacity, cleared on release.
#[derive(Debug, Clone, Copy)]
pub struct BufferHandler {
    capacity: usize,
}

impl BufferHandler {
    /// Buffers start with `capacity` bytes reserved.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl ResourceHandler for BufferHandler {
    type Resource = Vec<u8>;

    fn create(&self) -> Result<Vec<u8>, PoolError> {
        Ok(Vec::with_capacity(self.capacity))
    }

    fn on_release(&self, buffer: &mut Vec<u8>) {
        buffer.clear();
    }
}

/// Strings with a preallocated capacity, cleared on release.
#[derive(Debug, Clone, Copy)]
pub struct StringHandler {
    capacity: usize,
}

impl StringHandler {
    /// Strings start with `capacity` bytes reserved.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl ResourceHandler for StringHandler {
    type Resource = String;

    fn create(&self) -> Result<String, PoolError> {
        Ok(String::with_capacity(self.capacity))
    }

    fn on_release(&self, s: &mut String) {
        s.clear();
    }
}
