//! Error handling and exit codes.

use easycommons_pool::PoolError;

/// Process exit codes.
pub mod exit_codes {
    /// Run completed.
    pub const SUCCESS: u8 = 0;
    /// Any failure without a more specific code.
    pub const ERROR_GENERIC: u8 = 1;
    /// Invalid configuration.
    pub const ERROR_CONFIG: u8 = 4;
    /// Takes were rejected by an exhausted pool.
    pub const ERROR_EXHAUSTED: u8 = 5;
    /// The run was cancelled by Ctrl+C.
    pub const ERROR_CANCELED: u8 = 130;
}

/// Exit code for a pool error.
#[must_use]
pub fn handle_error(err: &PoolError) -> u8 {
    match err {
        PoolError::Exhausted => exit_codes::ERROR_EXHAUSTED,
        PoolError::Config(_) => exit_codes::ERROR_CONFIG,
        PoolError::Interrupted(_) => exit_codes::ERROR_CANCELED,
        PoolError::NotInUse { .. } | PoolError::Creation(_) => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for an error surfacing at the binary boundary.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<PoolError>()
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}
