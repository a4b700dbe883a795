//! Logger and pool diagnostics as seen by a subscriber.

use std::io;
use std::sync::{Arc, Mutex};

use easycommons_log::{LogLevel, Logger};
use easycommons_pool::{PoolConfig, PoolPolicy, ResourcePool};
use easycommons_registry::ResourceRegistry;
use easycommons_tests::CountingHandler;
use tracing::Level;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(max: Level, f: impl FnOnce()) -> String {
    let out = Capture::default();
    let writer = out.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(max)
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = out.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn registered_loggers_keep_their_prefix() {
    let loggers: ResourceRegistry<Logger> = ResourceRegistry::new();
    loggers
        .register("parser", Arc::new(Logger::new("parser")))
        .unwrap();
    loggers
        .register("writer", Arc::new(Logger::new("writer")))
        .unwrap();

    let out = capture(Level::INFO, || {
        loggers.lookup("parser").unwrap().info("document opened");
        loggers.lookup("writer").unwrap().warning("disk almost full");
    });
    assert!(out.contains("[parser] document opened"), "{out}");
    assert!(out.contains("[writer] disk almost full"), "{out}");
}

#[test]
fn disabled_levels_emit_nothing() {
    let logger = Logger::new("quiet");
    let out = capture(Level::ERROR, || {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Config,
            LogLevel::Info,
            LogLevel::Warning,
        ] {
            logger.log(level, format_args!("at {level}"), None);
        }
    });
    assert!(out.is_empty(), "{out}");

    let out = capture(Level::ERROR, || logger.log(LogLevel::Error, "at error", None));
    assert!(out.contains("[quiet] at error"), "{out}");
}

#[test]
fn pool_reports_rejections_as_warnings() {
    let config = PoolConfig::new(1, 1, PoolPolicy::Reject);
    let pool = ResourcePool::new(CountingHandler::new(), config).unwrap();
    let _held = pool.take().unwrap();

    let out = capture(Level::WARN, || {
        assert!(pool.take().is_err());
    });
    assert!(out.contains("WARN"), "{out}");
    assert!(out.contains("take rejected"), "{out}");
}

#[test]
fn pool_creation_is_debug_output() {
    let out = capture(Level::DEBUG, || {
        let config = PoolConfig::new(2, 4, PoolPolicy::Wait);
        let pool = ResourcePool::new(CountingHandler::new(), config).unwrap();
        assert_eq!(pool.available(), 2);
    });
    assert!(out.contains("DEBUG"), "{out}");
    assert!(out.contains("resource pool created"), "{out}");
    assert!(out.contains("min_size=2"), "{out}");
}
