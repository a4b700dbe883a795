//! # easycommons-log
//!
//! A small logging facade over `tracing`.
//!
//! A [`Logger`] carries a display name that prefixes every message, gates
//! each call on the subscriber's verbosity, and adds the caller's source
//! location when trace output is enabled.
#![warn(missing_docs)]

pub mod init;
pub mod level;
pub mod logger;

pub use init::{init, level_for, try_init, LogError};
pub use level::LogLevel;
pub use logger::Logger;
