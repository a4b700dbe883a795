//! String-keyed resource registry.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::RegistryError;

/// A registry binding string keys to shared resources.
///
/// All operations are thread safe. A key holds at most one resource:
/// registering over a bound key fails, and so does unregistering a key that
/// is not bound.
pub struct ResourceRegistry<T> {
    entries: RwLock<HashMap<String, Arc<T>>>,
}

impl<T> ResourceRegistry<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Bind `resource` to `key`.
    pub fn register(&self, key: impl Into<String>, resource: Arc<T>) -> Result<(), RegistryError> {
        let key = key.into();
        match self.entries.write().entry(key) {
            Entry::Occupied(entry) => Err(RegistryError::KeyAlreadyBound(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!(key = %entry.key(), "resource registered");
                entry.insert(resource);
                Ok(())
            }
        }
    }

    /// Remove the binding for `key`, returning the resource it held.
    pub fn unregister(&self, key: &str) -> Result<Arc<T>, RegistryError> {
        let removed = self.entries.write().remove(key);
        match removed {
            Some(resource) => {
                debug!(key, "resource unregistered");
                Ok(resource)
            }
            None => Err(RegistryError::KeyNotFound(key.to_string())),
        }
    }

    /// The resource bound to `key`, if any.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<Arc<T>> {
        self.entries.read().get(key).map(Arc::clone)
    }

    /// Whether `key` is bound.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// All bound keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of bound keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no key is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<T> Default for ResourceRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ResourceRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
