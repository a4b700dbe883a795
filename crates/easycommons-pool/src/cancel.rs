//! Cooperative cancellation for blocking takes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Interruption, PoolError};

/// Cooperative cancellation token using an atomic flag.
///
/// Clones share the same flag, so one thread can cancel a take that
/// another thread is blocked in.
///
/// # Example
/// ```
/// use easycommons_pool::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, untriggered token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check for cancellation, returning `PoolError::Interrupted` if cancelled.
    pub fn check_cancelled(&self) -> Result<(), PoolError> {
        if self.is_cancelled() {
            Err(PoolError::Interrupted(Interruption::Cancelled))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancellationToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn check_cancelled_reports_interruption() {
        let token = CancellationToken::new();
        assert!(token.check_cancelled().is_ok());
        token.cancel();
        assert!(matches!(
            token.check_cancelled(),
            Err(PoolError::Interrupted(Interruption::Cancelled))
        ));
    }
}
