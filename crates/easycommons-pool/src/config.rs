//! Pool sizing and exhaustion policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PoolError;

/// Largest pool size used by the process-wide pools.
pub const UNBOUNDED_MAX_SIZE: usize = i32::MAX as usize;

/// What a pool does when every resource is in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolPolicy {
    /// Block the caller until another thread releases a resource.
    #[default]
    Wait,
    /// Fail immediately with [`PoolError::Exhausted`].
    Reject,
}

impl fmt::Display for PoolPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wait => f.write_str("wait"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for PoolPolicy {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wait" => Ok(Self::Wait),
            "reject" => Ok(Self::Reject),
            other => Err(PoolError::Config(format!("unknown pool policy: {other}"))),
        }
    }
}

/// Sizing and policy for a [`ResourcePool`](crate::ResourcePool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Resources created eagerly when the pool is built.
    pub min_size: usize,
    /// Maximum number of resources in use at the same time.
    pub max_size: usize,
    /// Behaviour once `max_size` resources are in use.
    pub policy: PoolPolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_size: 0,
            max_size: 8,
            policy: PoolPolicy::Wait,
        }
    }
}

impl PoolConfig {
    /// Create a configuration.
    #[must_use]
    pub fn new(min_size: usize, max_size: usize, policy: PoolPolicy) -> Self {
        Self {
            min_size,
            max_size,
            policy,
        }
    }

    /// One eager resource, effectively no upper bound, blocking policy.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(1, UNBOUNDED_MAX_SIZE, PoolPolicy::Wait)
    }

    /// Set the eager size.
    #[must_use]
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the maximum size.
    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the exhaustion policy.
    #[must_use]
    pub fn with_policy(mut self, policy: PoolPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check the sizing constraints.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.max_size == 0 {
            return Err(PoolError::Config("max_size must be at least 1".into()));
        }
        if self.min_size > self.max_size {
            return Err(PoolError::Config(format!(
                "min_size ({}) exceeds max_size ({})",
                self.min_size, self.max_size
            )));
        }
        Ok(())
    }
}
