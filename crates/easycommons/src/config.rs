//! Application configuration from CLI flags, environment and a JSON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use easycommons_pool::{PoolConfig, PoolError, PoolPolicy};

/// easycommons: exercise a bounded resource pool from worker threads.
#[derive(Parser, Debug)]
#[command(name = "easycommons", version, about)]
pub struct AppConfig {
    /// Resources created eagerly when the pool is built.
    #[arg(long, env = "EASYCOMMONS_MIN")]
    pub min: Option<usize>,

    /// Maximum number of resources in use at once.
    #[arg(long, env = "EASYCOMMONS_MAX")]
    pub max: Option<usize>,

    /// Exhaustion policy: wait or reject.
    #[arg(long, env = "EASYCOMMONS_POLICY")]
    pub policy: Option<PoolPolicy>,

    /// Number of worker threads.
    #[arg(short, long, default_value_t = 4, env = "EASYCOMMONS_THREADS")]
    pub threads: usize,

    /// Takes performed by each worker.
    #[arg(short = 'n', long, default_value_t = 100, env = "EASYCOMMONS_ITERATIONS")]
    pub iterations: usize,

    /// Milliseconds each worker holds a resource.
    #[arg(long, default_value_t = 1, env = "EASYCOMMONS_HOLD_MS")]
    pub hold_ms: u64,

    /// JSON file with `min_size`, `max_size` and `policy`.
    #[arg(short, long, env = "EASYCOMMONS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (one summary line).
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Pool configuration: the config file (or defaults) with flag overrides
    /// applied, validated.
    pub fn pool_config(&self) -> Result<PoolConfig, PoolError> {
        let mut config = match &self.config {
            Some(path) => load_pool_config(path)?,
            None => PoolConfig::default(),
        };
        if let Some(min) = self.min {
            config = config.with_min_size(min);
        }
        if let Some(max) = self.max {
            config = config.with_max_size(max);
        }
        if let Some(policy) = self.policy {
            config = config.with_policy(policy);
        }
        config.validate()?;
        Ok(config)
    }

    /// Check the worker settings.
    pub fn validate_workload(&self) -> Result<(), PoolError> {
        if self.threads == 0 {
            return Err(PoolError::Config("threads must be at least 1".into()));
        }
        Ok(())
    }

    /// How long a worker holds each resource.
    #[must_use]
    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}

fn load_pool_config(path: &Path) -> Result<PoolConfig, PoolError> {
    let text = fs::read_to_string(path)
        .map_err(|e| PoolError::Config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| PoolError::Config(format!("invalid config {}: {e}", path.display())))
}
