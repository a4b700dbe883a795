//! # easycommons-pool
//!
//! Bounded pools of expensive-to-create resources.
//!
//! A [`ResourcePool`] hands out at most `max_size` resources at a time. When
//! capacity is exhausted the pool either blocks the caller until a resource
//! is released ([`PoolPolicy::Wait`]) or fails immediately
//! ([`PoolPolicy::Reject`]). Resource lifecycle is delegated to a
//! [`ResourceHandler`].
//!
//! ```
//! use easycommons_pool::{PoolConfig, PoolPolicy, ResourcePool, StringHandler};
//!
//! let config = PoolConfig::new(1, 2, PoolPolicy::Reject);
//! let pool = ResourcePool::new(StringHandler::new(64), config).unwrap();
//!
//! let mut s = pool.take().unwrap();
//! s.push_str("scratch");
//! pool.release(s).unwrap();
//!
//! // Released strings are cleared before they are reused.
//! assert!(pool.take().unwrap().is_empty());
//! ```
#![warn(missing_docs)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod pool;
pub mod semaphore;
pub mod shared;
pub mod stats;

pub use cancel::CancellationToken;
pub use config::{PoolConfig, PoolPolicy};
pub use error::{Interruption, PoolError};
pub use handler::ResourceHandler;
pub use handlers::{BufferHandler, FnHandler, StringHandler};
pub use pool::{Lease, Pooled, ResourcePool};
pub use shared::SharedPool;
pub use stats::PoolStats;
