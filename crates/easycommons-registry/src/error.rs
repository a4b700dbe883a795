//! Registry error type.

/// Error type for registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The key already has a resource bound to it.
    #[error("the provided key is already bound: {0}")]
    KeyAlreadyBound(String),

    /// The key has no resource bound to it.
    #[error("the given key isn't found in registry: {0}")]
    KeyNotFound(String),
}
