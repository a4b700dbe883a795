//! Global subscriber installation.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A global subscriber was already installed, or the filter was invalid.
    #[error("failed to initialize logging: {0}")]
    Init(String),
}

/// Install a stderr subscriber at `level`.
///
/// `RUST_LOG` directives are honored on top of `level`.
pub fn try_init(level: Level) -> Result<(), LogError> {
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| LogError::Init(e.to_string()))
}

/// Install a stderr subscriber at `level`, ignoring an already installed one.
pub fn init(level: Level) {
    let _ = try_init(level);
}

/// Pick the subscriber level from command-line verbosity flags.
#[must_use]
pub fn level_for(verbose: bool, quiet: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}
