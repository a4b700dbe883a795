//! Counting semaphore built on `parking_lot` primitives.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::cancel::CancellationToken;
use crate::error::Interruption;

/// Upper bound on how long a cancellable waiter sleeps before re-checking
/// its token.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// A counting semaphore.
///
/// Waiters are woken one per released permit. No FIFO fairness is
/// promised between waiters.
pub struct Semaphore {
    permits: Mutex<usize>,
    released: Condvar,
}

impl Semaphore {
    /// Create a semaphore holding `permits` permits.
    #[must_use]
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            released: Condvar::new(),
        }
    }

    /// Block until a permit is available, then take it.
    pub fn acquire(&self) {
        let mut permits = self.permits.lock();
        while *permits == 0 {
            self.released.wait(&mut permits);
        }
        *permits -= 1;
    }

    /// Take a permit if one is available right now.
    pub fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock();
        if *permits == 0 {
            return false;
        }
        *permits -= 1;
        true
    }

    /// Block until a permit is available or `deadline` passes.
    pub fn acquire_until(&self, deadline: Instant) -> Result<(), Interruption> {
        self.acquire_with(Some(deadline), None)
    }

    /// Block until a permit is available or `token` is cancelled.
    pub fn acquire_cancellable(&self, token: &CancellationToken) -> Result<(), Interruption> {
        self.acquire_with(None, Some(token))
    }

    fn acquire_with(
        &self,
        deadline: Option<Instant>,
        token: Option<&CancellationToken>,
    ) -> Result<(), Interruption> {
        let mut permits = self.permits.lock();
        loop {
            // A cancelled token wins even when a permit is free.
            if token.is_some_and(CancellationToken::is_cancelled) {
                return Err(self.give_up(*permits, Interruption::Cancelled));
            }
            if *permits > 0 {
                *permits -= 1;
                return Ok(());
            }

            let now = Instant::now();
            let mut wake_at = match deadline {
                Some(deadline) if now >= deadline => {
                    return Err(self.give_up(*permits, Interruption::TimedOut));
                }
                Some(deadline) => deadline,
                None => now + CANCEL_POLL_INTERVAL,
            };
            if token.is_some() {
                wake_at = wake_at.min(now + CANCEL_POLL_INTERVAL);
            }
            self.released.wait_until(&mut permits, wake_at);
        }
    }

    /// Abandon a wait. A free permit may have been signalled to this waiter,
    /// so the wakeup is handed on to the next one.
    fn give_up(&self, permits: usize, reason: Interruption) -> Interruption {
        if permits > 0 {
            self.released.notify_one();
        }
        reason
    }

    /// Return one permit and wake one waiter.
    pub fn release(&self) {
        let mut permits = self.permits.lock();
        *permits += 1;
        drop(permits);
        self.released.notify_one();
    }

    /// Number of permits currently available.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        *self.permits.lock()
    }
}

impl std::fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Semaphore")
            .field("permits", &self.available_permits())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn try_acquire_counts_down() {
        let sem = Semaphore::new(2);
        assert!(sem.try_acquire());
        assert!(sem.try_acquire());
        assert!(!sem.try_acquire());
        sem.release();
        assert_eq!(sem.available_permits(), 1);
    }

    #[test]
    fn acquire_until_times_out() {
        let sem = Semaphore::new(0);
        let deadline = Instant::now() + Duration::from_millis(20);
        assert_eq!(sem.acquire_until(deadline), Err(Interruption::TimedOut));
        assert!(Instant::now() >= deadline);
    }

    #[test]
    fn acquire_cancellable_returns_when_cancelled() {
        let sem = Arc::new(Semaphore::new(0));
        let token = CancellationToken::new();

        let waiter = {
            let sem = Arc::clone(&sem);
            let token = token.clone();
            std::thread::spawn(move || sem.acquire_cancellable(&token))
        };
        std::thread::sleep(Duration::from_millis(30));
        token.cancel();

        assert_eq!(waiter.join().unwrap(), Err(Interruption::Cancelled));
        assert_eq!(sem.available_permits(), 0);
    }

    #[test]
    fn cancelled_waiter_passes_wakeup_on() {
        for _ in 0..20 {
            let sem = Arc::new(Semaphore::new(0));
            let token = CancellationToken::new();

            let cancellable = {
                let sem = Arc::clone(&sem);
                let token = token.clone();
                std::thread::spawn(move || sem.acquire_cancellable(&token))
            };
            let (tx, rx) = crossbeam_channel::bounded(1);
            let blocking = {
                let sem = Arc::clone(&sem);
                std::thread::spawn(move || {
                    sem.acquire();
                    tx.send(()).unwrap();
                })
            };
            std::thread::sleep(Duration::from_millis(20));

            token.cancel();
            sem.release();

            assert!(
                rx.recv_timeout(Duration::from_secs(2)).is_ok(),
                "blocking waiter stayed asleep with a free permit"
            );
            blocking.join().unwrap();
            let _ = cancellable.join().unwrap();
            assert_eq!(sem.available_permits(), 0);
        }
    }

    #[test]
    fn timed_out_waiter_passes_wakeup_on() {
        let sem = Arc::new(Semaphore::new(0));
        let timed = {
            let sem = Arc::clone(&sem);
            std::thread::spawn(move || {
                sem.acquire_until(Instant::now() + Duration::from_millis(30))
            })
        };
        let (tx, rx) = crossbeam_channel::bounded(1);
        let blocking = {
            let sem = Arc::clone(&sem);
            std::thread::spawn(move || {
                sem.acquire();
                tx.send(()).unwrap();
            })
        };
        std::thread::sleep(Duration::from_millis(40));
        sem.release();

        // The timed waiter may still have won the permit before its deadline.
        if timed.join().unwrap().is_ok() {
            sem.release();
        }
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        blocking.join().unwrap();
    }

    #[test]
    fn release_wakes_blocked_acquirer() {
        let sem = Arc::new(Semaphore::new(0));
        let waiter = {
            let sem = Arc::clone(&sem);
            std::thread::spawn(move || sem.acquire())
        };
        std::thread::sleep(Duration::from_millis(20));
        sem.release();
        waiter.join().unwrap();
        assert_eq!(sem.available_permits(), 0);
    }
}
