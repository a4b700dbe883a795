//! easycommons harness library: drives a resource pool from worker threads
//! and reports how it behaved.

pub mod app;
pub mod completion;
pub mod config;
pub mod errors;
pub mod output;
pub mod version;
