//! Pool behaviour under concurrent takers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};
use easycommons_pool::{
    CancellationToken, Interruption, PoolConfig, PoolError, PoolPolicy, ResourcePool,
};
use easycommons_tests::CountingHandler;

const MAX_SIZE: usize = 3;

fn pool(min: usize, max: usize, policy: PoolPolicy) -> Arc<ResourcePool<CountingHandler>> {
    let config = PoolConfig::new(min, max, policy);
    Arc::new(ResourcePool::new(CountingHandler::new(), config).unwrap())
}

#[test]
fn wait_pool_never_exceeds_max_size() {
    let pool = pool(0, MAX_SIZE, PoolPolicy::Wait);
    let holding = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(12));

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let holding = Arc::clone(&holding);
            let peak = Arc::clone(&peak);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..20 {
                    let lease = pool.take().unwrap();
                    let now = holding.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    assert!(pool.in_use() <= MAX_SIZE);
                    thread::sleep(Duration::from_micros(200));
                    holding.fetch_sub(1, Ordering::SeqCst);
                    pool.release(lease).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert!(peak.load(Ordering::SeqCst) <= MAX_SIZE);
    assert!(pool.handler().created() <= MAX_SIZE);
    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.available(), pool.handler().created());
    assert_eq!(pool.permits(), MAX_SIZE);
    assert_eq!(pool.stats().takes(), 240);
}

#[test]
fn take_release_take_returns_same_resource() {
    let pool = pool(0, MAX_SIZE, PoolPolicy::Wait);
    let first = pool.take().unwrap();
    let first_id = first.id();
    assert_eq!(*first, "test1");
    pool.release(first).unwrap();

    let again = pool.take().unwrap();
    assert_eq!(again.id(), first_id);
    assert_eq!(*again, "test1");
    assert_eq!(pool.handler().created(), 1);
}

#[test]
fn reject_pool_fails_the_extra_taker_immediately() {
    let pool = pool(0, MAX_SIZE, PoolPolicy::Reject);
    let held: Vec<_> = (0..MAX_SIZE).map(|_| pool.take().unwrap()).collect();

    let contender = Arc::clone(&pool);
    let outcome = thread::spawn(move || contender.take().map(|lease| lease.id()))
        .join()
        .unwrap();
    assert!(matches!(outcome, Err(PoolError::Exhausted)));
    assert_eq!(pool.stats().rejected, 1);

    for lease in held {
        pool.release(lease).unwrap();
    }
    assert!(pool.take().is_ok());
}

#[test]
fn wait_pool_blocks_extra_taker_until_release() {
    let pool = pool(0, MAX_SIZE, PoolPolicy::Wait);
    let mut held: Vec<_> = (0..MAX_SIZE).map(|_| pool.take().unwrap()).collect();

    let (tx, rx) = bounded(1);
    let waiter = Arc::clone(&pool);
    let handle = thread::spawn(move || {
        let lease = waiter.take().unwrap();
        tx.send(lease.to_string()).unwrap();
        waiter.release(lease).unwrap();
    });

    assert_eq!(
        rx.recv_timeout(Duration::from_millis(100)),
        Err(RecvTimeoutError::Timeout)
    );

    let released = held.pop().unwrap();
    let released_value = released.to_string();
    pool.release(released).unwrap();

    let received = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(received, released_value);
    handle.join().unwrap();

    for lease in held {
        pool.release(lease).unwrap();
    }
    assert_eq!(pool.handler().created(), MAX_SIZE);
}

#[test]
fn cancelling_a_waiter_interrupts_it() {
    let pool = pool(1, 1, PoolPolicy::Wait);
    let held = pool.take().unwrap();

    let token = CancellationToken::new();
    let waiter_token = token.clone();
    let waiter = Arc::clone(&pool);
    let handle = thread::spawn(move || waiter.take_cancellable(&waiter_token).map(|l| l.id()));

    thread::sleep(Duration::from_millis(50));
    token.cancel();

    let outcome = handle.join().unwrap();
    assert!(matches!(
        outcome,
        Err(PoolError::Interrupted(Interruption::Cancelled))
    ));
    assert_eq!(pool.stats().interrupted, 1);

    // The interrupted waiter held no permit.
    pool.release(held).unwrap();
    assert_eq!(pool.permits(), 1);
    assert!(pool.take_timeout(Duration::from_millis(10)).is_ok());
}

#[test]
fn timed_out_waiter_is_interrupted() {
    let pool = pool(1, 1, PoolPolicy::Wait);
    let _held = pool.take().unwrap();
    let err = pool.take_timeout(Duration::from_millis(20)).unwrap_err();
    assert!(matches!(err, PoolError::Interrupted(Interruption::TimedOut)));
    assert!(err.is_interrupted());
    assert!(!err.is_exhausted());
}
