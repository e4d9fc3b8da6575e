//! Test utilities for the update checker
//!
//! Available to the crate's own tests and, through the `test-utils` feature,
//! to hosts that want to exercise their update-check wiring.
//!
//! - [`fixtures`] - Mock lookups and a recording notification sink
//! - [`environment`] - Temporary timestamps folder and ready-made checkers
//! - [`LogCapture`] - Collects formatted log output for assertions
//!
//! # Example
//!
//! ```rust,no_run
//! use update_checker::test_utils::{RecordingSink, StaticLookup, TestEnvironment};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let env = TestEnvironment::new()?;
//! let sink = RecordingSink::new();
//! let mut checker = env
//!     .checker()?
//!     .with_lookup(StaticLookup::new("1.0.0"))
//!     .with_notification_sink(sink.clone());
//!
//! checker.initiate_version_retrieval().await;
//! checker.notify_if_update_is_available().await;
//! assert!(sink.joined().contains(">>> New version"));
//! # Ok(())
//! # }
//! ```

pub mod environment;
pub mod fixtures;

pub use environment::{
    TEST_PACKAGE_NAME, TEST_PACKAGE_VERSION, TestEnvironment, interactive_environment,
    write_marker_aged,
};
pub use fixtures::{FailingLookup, LookupFailure, RecordingSink, StaticLookup};

use std::io;
use std::sync::{Arc, Mutex, Once};
use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=update_checker=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// In-memory log sink for asserting on emitted log lines.
///
/// The subscriber is installed as the thread's default, so the code under
/// test must log from the same thread (the default `#[tokio::test]`
/// current-thread runtime qualifies).
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Capture events at `level` and above until the guard is dropped.
    pub fn install(level: Level) -> (Self, DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();

        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    /// Everything logged so far.
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .map(|buffer| String::from_utf8_lossy(&buffer).into_owned())
            .unwrap_or_default()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
