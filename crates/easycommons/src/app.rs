//! Application entry point and pool exercise.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use easycommons_log::Logger;
use easycommons_pool::{
    CancellationToken, Interruption, PoolConfig, PoolError, PoolPolicy, PoolStats, ResourcePool,
    StringHandler,
};
use easycommons_registry::ResourceRegistry;
use serde::Serialize;

use crate::config::AppConfig;
use crate::output::{format_duration, format_ratio};
use crate::version::full_version;

/// Initial capacity of the pooled strings.
const SCRATCH_CAPACITY: usize = 64;

/// Run the application.
pub fn run(config: &AppConfig, cancel: &CancellationToken) -> Result<()> {
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        crate::completion::generate_completion(&mut cmd, shell, &mut io::stdout());
        return Ok(());
    }

    config.validate_workload()?;
    let pool_config = config.pool_config()?;
    let workload = Workload {
        threads: config.threads,
        iterations: config.iterations,
        hold: config.hold_duration(),
    };

    let report = exercise(&workload, pool_config, cancel)?;

    let mut out = io::stdout().lock();
    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else if config.quiet {
        writeln!(out, "{}", report.summary_line())?;
    } else {
        write_report(&mut out, &report)?;
    }
    out.flush()?;

    report.outcome(cancel)
}

/// What each worker does against the pool.
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    /// Worker threads.
    pub threads: usize,
    /// Takes per worker.
    pub iterations: usize,
    /// How long a taken resource is held before release.
    pub hold: Duration,
}

/// Outcome of one worker thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    /// Worker index.
    pub worker: usize,
    /// Takes that were held and released.
    pub completed: u64,
    /// Takes refused by an exhausted pool.
    pub rejected: u64,
    /// Takes abandoned on cancellation.
    pub interrupted: u64,
    /// Takes or releases that failed otherwise.
    pub failed: u64,
}

/// Result of a pool exercise.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Harness version.
    pub version: String,
    /// Exhaustion policy of the pool.
    pub policy: PoolPolicy,
    /// Eager pool size.
    pub min_size: usize,
    /// Pool capacity.
    pub max_size: usize,
    /// Worker threads.
    pub threads: usize,
    /// Takes per worker.
    pub iterations: usize,
    /// Hold time per take, in milliseconds.
    pub hold_ms: u64,
    /// Takes that were held and released.
    pub completed: u64,
    /// Takes refused by an exhausted pool.
    pub rejected: u64,
    /// Takes abandoned on cancellation.
    pub interrupted: u64,
    /// Takes or releases that failed otherwise.
    pub failed: u64,
    /// Most resources observed in use at the same time.
    pub peak_in_use: usize,
    /// Available resources once the workers finished.
    pub available: usize,
    /// In-use resources once the workers finished.
    pub in_use: usize,
    /// Wall time of the exercise, in milliseconds.
    pub elapsed_ms: u64,
    /// Pool counters.
    pub stats: PoolStats,
    /// Per-worker outcomes, by worker index.
    pub workers: Vec<WorkerReport>,
    #[serde(skip)]
    elapsed: Duration,
}

impl RunReport {
    /// One-line summary for quiet mode.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "completed={} rejected={} interrupted={} peak={}",
            self.completed, self.rejected, self.interrupted, self.peak_in_use
        )
    }

    /// Map the run to the process outcome.
    pub fn outcome(&self, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            let err = anyhow::Error::new(PoolError::Interrupted(Interruption::Cancelled));
            return Err(err.context("run cancelled"));
        }
        if self.rejected > 0 {
            let err = anyhow::Error::new(PoolError::Exhausted);
            return Err(err.context(format!("{} takes were rejected", self.rejected)));
        }
        if self.failed > 0 {
            anyhow::bail!("{} takes failed", self.failed);
        }
        Ok(())
    }
}

/// Tracks how many resources workers hold at once.
#[derive(Debug, Default)]
struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Drive a string pool from `workload.threads` workers and report what
/// happened.
pub fn exercise(
    workload: &Workload,
    pool_config: PoolConfig,
    cancel: &CancellationToken,
) -> Result<RunReport> {
    let logger = Logger::new("easycommons");
    logger.config(format_args!(
        "pool {}..{} policy {}, {} workers x {} takes",
        pool_config.min_size,
        pool_config.max_size,
        pool_config.policy,
        workload.threads,
        workload.iterations
    ));

    let pool = ResourcePool::new(StringHandler::new(SCRATCH_CAPACITY), pool_config)?;

    let loggers: ResourceRegistry<Logger> = ResourceRegistry::new();
    for worker in 0..workload.threads {
        let name = worker_key(worker);
        loggers
            .register(name.clone(), Arc::new(Logger::new(name)))
            .context("registering worker logger")?;
    }

    let gauge = Gauge::default();
    let (tx, rx) = crossbeam_channel::unbounded::<WorkerReport>();
    let started = Instant::now();

    thread::scope(|s| {
        for worker in 0..workload.threads {
            let tx = tx.clone();
            let pool = &pool;
            let gauge = &gauge;
            let worker_logger = loggers
                .lookup(&worker_key(worker))
                .unwrap_or_else(|| Arc::new(Logger::anonymous()));
            s.spawn(move || {
                let report = run_worker(worker, pool, workload, cancel, gauge, &worker_logger);
                let _ = tx.send(report);
            });
        }
    });
    drop(tx);

    let elapsed = started.elapsed();
    let mut workers: Vec<WorkerReport> = rx.iter().collect();
    workers.sort_by_key(|w| w.worker);

    let report = RunReport {
        version: full_version(),
        policy: pool.policy(),
        min_size: pool.min_size(),
        max_size: pool.max_size(),
        threads: workload.threads,
        iterations: workload.iterations,
        hold_ms: u64::try_from(workload.hold.as_millis()).unwrap_or(u64::MAX),
        completed: workers.iter().map(|w| w.completed).sum(),
        rejected: workers.iter().map(|w| w.rejected).sum(),
        interrupted: workers.iter().map(|w| w.interrupted).sum(),
        failed: workers.iter().map(|w| w.failed).sum(),
        peak_in_use: gauge.peak(),
        available: pool.available(),
        in_use: pool.in_use(),
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        stats: pool.stats(),
        workers,
        elapsed,
    };
    logger.info(report.summary_line());
    Ok(report)
}

fn worker_key(worker: usize) -> String {
    format!("worker-{worker}")
}

fn run_worker(
    worker: usize,
    pool: &ResourcePool<StringHandler>,
    workload: &Workload,
    cancel: &CancellationToken,
    gauge: &Gauge,
    logger: &Logger,
) -> WorkerReport {
    logger.start();
    let mut report = WorkerReport {
        worker,
        ..WorkerReport::default()
    };

    for iteration in 0..workload.iterations {
        if cancel.is_cancelled() {
            break;
        }
        match pool.take_cancellable(cancel) {
            Ok(mut scratch) => {
                gauge.enter();
                scratch.push_str(&format!("worker {worker} iteration {iteration}"));
                if !workload.hold.is_zero() {
                    thread::sleep(workload.hold);
                }
                gauge.leave();
                match pool.release(scratch) {
                    Ok(()) => report.completed += 1,
                    Err(e) => {
                        logger.warning_with("release failed", &e);
                        report.failed += 1;
                    }
                }
            }
            Err(PoolError::Exhausted) => {
                report.rejected += 1;
            }
            Err(e @ PoolError::Interrupted(_)) => {
                logger.debug_with("take interrupted", &e);
                report.interrupted += 1;
                break;
            }
            Err(e) => {
                logger.error_with("take failed", &e);
                report.failed += 1;
            }
        }
    }

    logger.end_msg(format_args!(
        "{} completed, {} rejected",
        report.completed, report.rejected
    ));
    report
}

/// Write the human-readable report.
pub fn write_report(out: &mut dyn Write, report: &RunReport) -> io::Result<()> {
    writeln!(out, "Pool run ({})", report.version)?;
    writeln!(out, "  Policy:        {}", report.policy)?;
    writeln!(out, "  Size:          {}..{}", report.min_size, report.max_size)?;
    writeln!(
        out,
        "  Workload:      {} workers x {} takes, {}ms hold",
        report.threads, report.iterations, report.hold_ms
    )?;
    writeln!(out, "  Elapsed:       {}", format_duration(report.elapsed))?;
    writeln!(out, "  Completed:     {}", report.completed)?;
    writeln!(out, "  Rejected:      {}", report.rejected)?;
    writeln!(out, "  Interrupted:   {}", report.interrupted)?;
    if report.failed > 0 {
        writeln!(out, "  Failed:        {}", report.failed)?;
    }
    writeln!(out, "  Peak in use:   {}", report.peak_in_use)?;
    writeln!(out, "  Created:       {}", report.stats.created)?;
    writeln!(out, "  Reused:        {}", report.stats.reused)?;
    writeln!(
        out,
        "  Reuse ratio:   {}",
        format_ratio(report.stats.reuse_ratio())
    )?;
    Ok(())
}
