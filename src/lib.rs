//! Shared fixtures for the workspace integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use easycommons_pool::{PoolError, ResourceHandler};

/// Creates numbered strings `"test1"`, `"test2"`, … and counts calls.
#[derive(Debug, Default)]
pub struct CountingHandler {
    created: AtomicUsize,
    released: AtomicUsize,
}

impl CountingHandler {
    /// A handler that has created nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resources created so far.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Release callbacks run so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl ResourceHandler for CountingHandler {
    type Resource = String;

    fn create(&self) -> Result<String, PoolError> {
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("test{n}"))
    }

    fn on_release(&self, _resource: &mut String) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
