//! Pool error type.

use std::fmt;

/// Why a blocking take gave up before a resource became available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// The caller's cancellation token was triggered.
    Cancelled,
    /// The deadline passed.
    TimedOut,
}

impl fmt::Display for Interruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("cancelled"),
            Self::TimedOut => f.write_str("timed out"),
        }
    }
}

/// Error type for pool operations.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// No capacity was left and the pool rejects instead of waiting.
    #[error("there is no more available resource in the pool")]
    Exhausted,

    /// The wait for a resource was interrupted.
    #[error("wait for a pooled resource was interrupted: {0}")]
    Interrupted(Interruption),

    /// The released resource is not tracked as in use by this pool.
    #[error("resource #{id} is not in use in this pool")]
    NotInUse {
        /// Identifier of the offending lease.
        id: u64,
    },

    /// The handler failed to create a resource.
    #[error("failed to create resource: {0}")]
    Creation(String),

    /// Invalid pool configuration.
    #[error("invalid pool configuration: {0}")]
    Config(String),
}

impl PoolError {
    /// Whether this error means the pool had no capacity left.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Whether this error means a wait was cancelled or timed out.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}
