//! Facade log levels and their `tracing` counterparts.

use std::fmt;

use tracing::Level;

/// Target of every event emitted through a [`Logger`](crate::Logger).
///
/// Verbosity checks ask about this target too, so `RUST_LOG` directives
/// naming it gate both.
pub const TARGET: &str = "easycommons_log::logger";

/// Severity of a facade log call, most verbose first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Finest-grained diagnostics.
    Trace,
    /// Debugging detail.
    Debug,
    /// Configuration details. Emitted at `DEBUG` with a `config` field.
    Config,
    /// Normal operation.
    Info,
    /// Something unexpected that the program recovered from.
    Warning,
    /// A failure.
    Error,
}

impl LogLevel {
    /// The `tracing` level events of this severity are emitted at.
    #[must_use]
    pub fn as_tracing(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug | Self::Config => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }

    /// Whether the current subscriber would record events of this severity.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        match self {
            Self::Trace => tracing::enabled!(target: TARGET, Level::TRACE),
            Self::Debug | Self::Config => tracing::enabled!(target: TARGET, Level::DEBUG),
            Self::Info => tracing::enabled!(target: TARGET, Level::INFO),
            Self::Warning => tracing::enabled!(target: TARGET, Level::WARN),
            Self::Error => tracing::enabled!(target: TARGET, Level::ERROR),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Config => "config",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}
