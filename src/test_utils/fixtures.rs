//! Test doubles for the checker's collaborators.

use futures::future::{BoxFuture, FutureExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::checker::NotificationSink;
use crate::core::UpdateCheckError;
use crate::registry::VersionLookup;

/// Lookup that always reports the same version.
///
/// Clones share the call counter, so a test can keep one clone and hand
/// the other to the checker.
#[derive(Debug, Clone)]
pub struct StaticLookup {
    version: String,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl StaticLookup {
    /// Lookup resolving immediately to `version`.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resolve only after `delay`, to simulate registry latency.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of lookups started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VersionLookup for StaticLookup {
    fn latest_version(
        &self,
        _package_name: &str,
    ) -> BoxFuture<'static, Result<String, UpdateCheckError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let version = self.version.clone();
        let delay = self.delay;

        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(version)
        }
        .boxed()
    }
}

/// How a [`FailingLookup`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    /// [`UpdateCheckError::PackageNotFound`]
    NotFound,
    /// [`UpdateCheckError::Network`]
    Network,
    /// The lookup task panics.
    Panic,
}

/// Lookup that always fails.
#[derive(Debug, Clone)]
pub struct FailingLookup {
    failure: LookupFailure,
    calls: Arc<AtomicUsize>,
}

impl FailingLookup {
    /// Lookup failing with `failure`.
    pub fn new(failure: LookupFailure) -> Self {
        Self {
            failure,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Lookup reporting that the package does not exist.
    pub fn not_found() -> Self {
        Self::new(LookupFailure::NotFound)
    }

    /// Number of lookups started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VersionLookup for FailingLookup {
    fn latest_version(
        &self,
        package_name: &str,
    ) -> BoxFuture<'static, Result<String, UpdateCheckError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let package = package_name.to_string();
        let failure = self.failure;

        async move {
            match failure {
                LookupFailure::NotFound => Err(UpdateCheckError::PackageNotFound { package }),
                LookupFailure::Network => Err(UpdateCheckError::Network {
                    package,
                    reason: "connection refused".to_string(),
                }),
                LookupFailure::Panic => panic!("lookup for {package} panicked"),
            }
        }
        .boxed()
    }
}

/// Sink that keeps every notification it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|messages| messages.clone()).unwrap_or_default()
    }

    /// All messages joined with newlines.
    pub fn joined(&self) -> String {
        self.messages().join("\n")
    }

    /// Forget the messages received so far.
    pub fn clear(&self) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.clear();
        }
    }
}

impl NotificationSink for RecordingSink {
    fn send(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
