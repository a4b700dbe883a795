//! Named logger facade.

use std::error::Error;
use std::fmt::{self, Display};
use std::panic::Location;

use crate::level::{LogLevel, TARGET};

/// Reported through [`Logger::assert_or_log`] when an assertion fails.
#[derive(Debug, thiserror::Error)]
#[error("assertion failed: {0}")]
struct AssertionFailed(String);

/// A named logger.
///
/// Messages are prefixed with `[name] ` when the name is not blank. Every
/// call is a no-op unless the installed subscriber records its level. When
/// trace output is enabled, messages also carry the caller's `file:line`.
#[derive(Clone, PartialEq, Eq)]
pub struct Logger {
    name: String,
    prefix: String,
}

impl Logger {
    /// Create a logger with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("[{trimmed}] ")
        };
        Self { name, prefix }
    }

    /// Create a logger without a name prefix.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new("")
    }

    /// The display name this logger was created with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The prefix put in front of every message.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Trace marker for a call site.
    #[track_caller]
    pub fn call(&self) {
        self.marker("CALL", None, Location::caller());
    }

    /// Trace marker for a call site, with a message.
    #[track_caller]
    pub fn call_msg(&self, message: impl Display) {
        self.marker("CALL", Some(&message), Location::caller());
    }

    /// Trace marker for the start of an operation.
    #[track_caller]
    pub fn start(&self) {
        self.marker("START", None, Location::caller());
    }

    /// Trace marker for the start of an operation, with a message.
    #[track_caller]
    pub fn start_msg(&self, message: impl Display) {
        self.marker("START", Some(&message), Location::caller());
    }

    /// Trace marker for the end of an operation.
    #[track_caller]
    pub fn end(&self) {
        self.marker("END", None, Location::caller());
    }

    /// Trace marker for the end of an operation, with a message.
    #[track_caller]
    pub fn end_msg(&self, message: impl Display) {
        self.marker("END", Some(&message), Location::caller());
    }

    /// Log at trace level.
    #[track_caller]
    pub fn trace(&self, message: impl Display) {
        self.emit(LogLevel::Trace, &message, None, Location::caller());
    }

    /// Log at debug level.
    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.emit(LogLevel::Debug, &message, None, Location::caller());
    }

    /// Log at debug level with an attached error.
    #[track_caller]
    pub fn debug_with(&self, message: impl Display, error: &dyn Error) {
        self.emit(LogLevel::Debug, &message, Some(error), Location::caller());
    }

    /// Log configuration details.
    #[track_caller]
    pub fn config(&self, message: impl Display) {
        self.emit(LogLevel::Config, &message, None, Location::caller());
    }

    /// Log at info level.
    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.emit(LogLevel::Info, &message, None, Location::caller());
    }

    /// Log at info level with an attached error.
    #[track_caller]
    pub fn info_with(&self, message: impl Display, error: &dyn Error) {
        self.emit(LogLevel::Info, &message, Some(error), Location::caller());
    }

    /// Log at warning level.
    #[track_caller]
    pub fn warning(&self, message: impl Display) {
        self.emit(LogLevel::Warning, &message, None, Location::caller());
    }

    /// Log at warning level with an attached error.
    #[track_caller]
    pub fn warning_with(&self, message: impl Display, error: &dyn Error) {
        self.emit(LogLevel::Warning, &message, Some(error), Location::caller());
    }

    /// Log at error level.
    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.emit(LogLevel::Error, &message, None, Location::caller());
    }

    /// Log at error level with an attached error.
    #[track_caller]
    pub fn error_with(&self, message: impl Display, error: &dyn Error) {
        self.emit(LogLevel::Error, &message, Some(error), Location::caller());
    }

    /// Log at an arbitrary level.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Display, error: Option<&dyn Error>) {
        self.emit(level, &message, error, Location::caller());
    }

    /// Debug-assert `assertion`; when it does not hold, log an error.
    ///
    /// In debug builds a failed assertion panics before anything is logged.
    #[track_caller]
    pub fn assert_or_log(&self, assertion: bool, message: impl Display) {
        debug_assert!(assertion, "{message}");
        if !assertion {
            let failure = AssertionFailed(message.to_string());
            self.emit(
                LogLevel::Error,
                &"Assertion failed",
                Some(&failure),
                Location::caller(),
            );
        }
    }

    /// Whether trace output is recorded.
    #[must_use]
    pub fn is_trace_enabled(&self) -> bool {
        LogLevel::Trace.is_enabled()
    }

    /// Whether debug output is recorded.
    #[must_use]
    pub fn is_debug_enabled(&self) -> bool {
        LogLevel::Debug.is_enabled()
    }

    /// Whether configuration output is recorded.
    #[must_use]
    pub fn is_config_enabled(&self) -> bool {
        LogLevel::Config.is_enabled()
    }

    /// Whether info output is recorded.
    #[must_use]
    pub fn is_info_enabled(&self) -> bool {
        LogLevel::Info.is_enabled()
    }

    /// Whether warnings are recorded.
    #[must_use]
    pub fn is_warn_enabled(&self) -> bool {
        LogLevel::Warning.is_enabled()
    }

    /// Whether errors are recorded.
    #[must_use]
    pub fn is_error_enabled(&self) -> bool {
        LogLevel::Error.is_enabled()
    }

    fn marker(&self, tag: &str, message: Option<&dyn Display>, location: &Location<'_>) {
        if !LogLevel::Trace.is_enabled() {
            return;
        }
        let text = match message {
            Some(message) => format!(
                "{}-{tag}-{}:{} {message}",
                self.prefix,
                location.file(),
                location.line()
            ),
            None => format!("{}-{tag}-{}:{}", self.prefix, location.file(), location.line()),
        };
        self.dispatch(LogLevel::Trace, &text, None);
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &dyn Display,
        error: Option<&dyn Error>,
        location: &Location<'_>,
    ) {
        if !level.is_enabled() {
            return;
        }
        let text = if LogLevel::Trace.is_enabled() {
            format!(
                "{}{}:{} {message}",
                self.prefix,
                location.file(),
                location.line()
            )
        } else {
            format!("{}{message}", self.prefix)
        };
        self.dispatch(level, &text, error);
    }

    fn dispatch(&self, level: LogLevel, text: &str, error: Option<&dyn Error>) {
        let name = self.name.trim();
        let logger = (!name.is_empty()).then_some(tracing::field::display(name));
        let error = error.map(tracing::field::display);
        match level {
            LogLevel::Trace => tracing::trace!(target: TARGET, logger, error, "{text}"),
            LogLevel::Debug => tracing::debug!(target: TARGET, logger, error, "{text}"),
            LogLevel::Config => {
                tracing::debug!(target: TARGET, logger, error, config = true, "{text}");
            }
            LogLevel::Info => tracing::info!(target: TARGET, logger, error, "{text}"),
            LogLevel::Warning => tracing::warn!(target: TARGET, logger, error, "{text}"),
            LogLevel::Error => tracing::error!(target: TARGET, logger, error, "{text}"),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("name", &self.name).finish()
    }
}
