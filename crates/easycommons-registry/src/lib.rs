//! # easycommons-registry
//!
//! A thread-safe, string-keyed registry of shared resources.
//!
//! ```
//! use std::sync::Arc;
//! use easycommons_registry::ResourceRegistry;
//!
//! let registry = ResourceRegistry::new();
//! let endpoint = Arc::new("http://localhost:8084/petals/services");
//! registry.register("endpoint", Arc::clone(&endpoint)).unwrap();
//!
//! assert!(Arc::ptr_eq(&registry.lookup("endpoint").unwrap(), &endpoint));
//! assert!(registry.register("endpoint", endpoint).is_err());
//! ```
#![warn(missing_docs)]

pub mod error;
pub mod registry;

pub use error::RegistryError;
pub use registry::ResourceRegistry;
