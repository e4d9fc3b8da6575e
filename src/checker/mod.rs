//! Throttled update checks.
//!
//! [`UpdateChecker`] tells the user of a command-line tool that a newer
//! version has been published, at most once per configured interval.
//!
//! # Two-phase Usage
//!
//! Fetching the latest version needs a registry round-trip. The checker
//! therefore splits the work in two:
//!
//! 1. [`initiate_version_retrieval`] early in `main`. It decides whether a
//!    lookup is due and, if so, spawns it on the tokio runtime without
//!    waiting for it.
//! 2. [`notify_if_update_is_available`] just before exiting. It awaits the
//!    lookup, compares versions, notifies, and refreshes the timestamp.
//!
//! ```rust,no_run
//! use update_checker::checker::{UpdateChecker, config::UpdateCheckerOptions};
//! use update_checker::environment::EnvironmentSnapshot;
//!
//! # async fn example() -> Result<(), update_checker::core::UpdateCheckError> {
//! let options = UpdateCheckerOptions::new("xpm", env!("CARGO_PKG_VERSION"));
//! let mut checker = UpdateChecker::new(options, EnvironmentSnapshot::detect())?;
//!
//! checker.initiate_version_retrieval().await;
//! // ... the tool does its real work here ...
//! checker.notify_if_update_is_available().await;
//! # Ok(())
//! # }
//! ```
//!
//! # When Lookups Are Skipped
//!
//! - The check interval is zero
//! - Running in CI
//! - Standard output is not a terminal
//! - `NO_<PACKAGE>_UPDATE_NOTIFIER` is set (see [`suppress_env_var_name`])
//! - The timestamp marker is younger than the check interval
//!
//! # Timestamp Refresh
//!
//! After a lookup completes, successfully or not, the marker is recreated so
//! the next lookup waits a full interval. Runs with elevated privileges skip
//! this step: the marker usually lives in a user-owned folder, and writing
//! it as root would either fail or leave a root-owned file behind. Those
//! runs simply check every time.
//!
//! [`initiate_version_retrieval`]: UpdateChecker::initiate_version_retrieval
//! [`notify_if_update_is_available`]: UpdateChecker::notify_if_update_is_available

pub mod config;
pub mod marker;
pub mod notification;


use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{Level, debug, trace, warn};

use crate::core::UpdateCheckError;
use crate::environment::EnvironmentSnapshot;
use crate::registry::{self, NpmRegistryLookup, VersionLookup};
use crate::version;

pub use config::{UpdateCheckConfig, UpdateCheckerOptions};
pub use marker::TimestampMarker;
pub use notification::{LogNotificationSink, Notification, NotificationSink};

/// Where a checker is in its initiate/notify cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// No lookup in flight.
    Idle,
    /// A lookup was spawned and has not been awaited yet.
    Pending,
    /// The last lookup returned a version.
    Resolved,
    /// The last lookup failed; see [`UpdateChecker::returned_error`].
    Errored,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// Name of the environment variable that disables checks for `package_name`.
///
/// The package name is uppercased, every run of non-alphanumeric characters
/// becomes a single `_`, and leading/trailing underscores are dropped.
///
/// ```rust,no_run
/// use update_checker::checker::suppress_env_var_name;
///
/// assert_eq!(suppress_env_var_name("xpm"), "NO_XPM_UPDATE_NOTIFIER");
/// assert_eq!(suppress_env_var_name("@xpack/xpm-js"), "NO_XPACK_XPM_JS_UPDATE_NOTIFIER");
/// ```
pub fn suppress_env_var_name(package_name: &str) -> String {
    let mut stem = String::with_capacity(package_name.len());
    let mut pending_separator = false;

    for c in package_name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !stem.is_empty() {
                stem.push('_');
            }
            pending_separator = false;
            stem.push(c.to_ascii_uppercase());
        } else {
            pending_separator = true;
        }
    }

    format!("NO_{stem}_UPDATE_NOTIFIER")
}

/// Checks for and announces newer published versions of a package.
///
/// See the [module documentation](self) for the call sequence.
pub struct UpdateChecker {
    package_name: String,
    package_version: String,
    timestamps_folder: PathBuf,
    check_interval: Duration,
    install_command: String,
    marker: TimestampMarker,
    environment: EnvironmentSnapshot,
    lookup: Arc<dyn VersionLookup>,
    sink: Arc<dyn NotificationSink>,
    pending: Option<JoinHandle<Result<String, UpdateCheckError>>>,
    latest_version: Option<String>,
    returned_error: Option<UpdateCheckError>,
    state: CheckState,
}

impl fmt::Debug for UpdateChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateChecker")
            .field("package_name", &self.package_name)
            .field("package_version", &self.package_version)
            .field("timestamp_file_path", &self.marker.path())
            .field("check_interval", &self.check_interval)
            .field("environment", &self.environment)
            .field("state", &self.state)
            .field("latest_version", &self.latest_version)
            .field("returned_error", &self.returned_error)
            .finish_non_exhaustive()
    }
}

impl UpdateChecker {
    /// Create a checker for the package described by `options`.
    ///
    /// The environment flags are taken from `environment` and never
    /// re-evaluated. Unless replaced with [`with_lookup`](Self::with_lookup),
    /// versions come from the npm registry named by
    /// `options.registry_url`, else by `npm_config_registry` in the
    /// snapshot, else the public registry.
    ///
    /// # Errors
    ///
    /// [`UpdateCheckError::MissingParameter`] when the package name or
    /// version is empty. This is a programmer error, not a runtime
    /// condition: hosts are expected to fail fast on it, typically with
    /// `expect()`, rather than run without update checks.
    ///
    /// ```rust,should_panic
    /// use update_checker::{EnvironmentSnapshot, UpdateChecker, UpdateCheckerOptions};
    ///
    /// let options = UpdateCheckerOptions::new("", "0.0.1");
    /// UpdateChecker::new(options, EnvironmentSnapshot::default())
    ///     .expect("package name is set at compile time");
    /// ```
    pub fn new(
        options: UpdateCheckerOptions,
        environment: EnvironmentSnapshot,
    ) -> Result<Self, UpdateCheckError> {
        trace!("UpdateChecker::new()");

        if options.package_name.trim().is_empty() {
            return Err(UpdateCheckError::MissingParameter {
                name: "package_name",
            });
        }
        if options.package_version.trim().is_empty() {
            return Err(UpdateCheckError::MissingParameter {
                name: "package_version",
            });
        }

        let timestamps_folder = options.timestamps_folder();
        let check_interval = options.check_interval();
        let marker = TimestampMarker::new(&timestamps_folder, &options.package_name);

        let registry_url = options
            .registry_url
            .or_else(|| registry::registry_url_from_env(&environment.env))
            .unwrap_or_else(|| registry::DEFAULT_REGISTRY_URL.to_string());

        Ok(Self {
            package_name: options.package_name,
            package_version: options.package_version,
            timestamps_folder,
            check_interval,
            install_command: options.install_command,
            marker,
            environment,
            lookup: Arc::new(NpmRegistryLookup::with_registry(registry_url)),
            sink: Arc::new(LogNotificationSink),
            pending: None,
            latest_version: None,
            returned_error: None,
            state: CheckState::Idle,
        })
    }

    /// Use `lookup` to retrieve the latest version.
    #[must_use]
    pub fn with_lookup(mut self, lookup: impl VersionLookup + 'static) -> Self {
        self.lookup = Arc::new(lookup);
        self
    }

    /// Deliver notifications to `sink` instead of the log.
    #[must_use]
    pub fn with_notification_sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Start retrieving the latest version, if a check is due.
    ///
    /// Only the marker's metadata is awaited here; the lookup itself runs
    /// in a spawned task that [`notify_if_update_is_available`] awaits
    /// later. Any lookup still pending from an earlier call is discarded.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// [`notify_if_update_is_available`]: Self::notify_if_update_is_available
    pub async fn initiate_version_retrieval(&mut self) {
        trace!("UpdateChecker::initiate_version_retrieval()");

        if self.pending.take().is_some() {
            trace!("Discarding the previous pending lookup");
            self.state = CheckState::Idle;
        }

        if let Some(reason) = self.skip_reason() {
            trace!("Do not fetch latest version number: {}", reason);
            return;
        }

        if !self.marker.is_expired(self.check_interval).await {
            return;
        }

        trace!("Fetching latest version number of {}...", self.package_name);

        let lookup = self.lookup.latest_version(&self.package_name);
        self.pending = Some(tokio::spawn(lookup));
        self.state = CheckState::Pending;
    }

    /// Finish a lookup started by [`initiate_version_retrieval`] and notify
    /// when a newer version exists.
    ///
    /// Does nothing when no lookup is pending, so it is safe to call
    /// unconditionally and more than once. Lookup failures are logged and
    /// kept in [`returned_error`]; they are never returned.
    ///
    /// [`initiate_version_retrieval`]: Self::initiate_version_retrieval
    /// [`returned_error`]: Self::returned_error
    pub async fn notify_if_update_is_available(&mut self) {
        trace!("UpdateChecker::notify_if_update_is_available()");

        let Some(handle) = self.pending.take() else {
            trace!("No pending lookup, update silently ignored");
            return;
        };

        let outcome = handle.await.unwrap_or_else(|e| {
            Err(UpdateCheckError::LookupAborted {
                package: self.package_name.clone(),
                reason: e.to_string(),
            })
        });

        match outcome {
            Ok(latest_version) => {
                trace!("Latest {}@{}", self.package_name, latest_version);
                self.resolve(latest_version);
            }
            Err(e) => self.record_error(e),
        }

        if self.environment.is_running_as_root {
            // Elevated runs never write the marker; the check repeats on each of them.
            trace!("Running with elevated privileges, timestamp not refreshed");
            return;
        }

        match self.marker.refresh().await {
            Ok(()) => debug!("Timestamp {} created", self.marker.path().display()),
            Err(e) => debug!("{:?}", e),
        }
    }

    fn skip_reason(&self) -> Option<String> {
        if self.check_interval.is_zero() {
            return Some("check interval is zero".to_string());
        }
        if self.environment.is_ci {
            return Some("running in CI".to_string());
        }
        if !self.environment.is_tty {
            return Some("not running in a terminal".to_string());
        }

        let suppress_var = suppress_env_var_name(&self.package_name);
        if self.environment.has_var(&suppress_var) {
            return Some(format!("{suppress_var} is set"));
        }

        None
    }

    fn resolve(&mut self, latest_version: String) {
        let newer = version::is_newer(&latest_version, &self.package_version);
        self.latest_version = Some(latest_version);

        match newer {
            Ok(true) => {
                self.state = CheckState::Resolved;
                self.send_notification();
            }
            Ok(false) => {
                self.state = CheckState::Resolved;
                trace!("{} {} is up to date", self.package_name, self.package_version);
            }
            Err(e) => self.record_error(e),
        }
    }

    fn record_error(&mut self, error: UpdateCheckError) {
        if tracing::enabled!(Level::DEBUG) {
            debug!("{:?}", error);
        } else if let Some(hint) = error.suggestion() {
            warn!("{}. {}", error, hint);
        } else {
            warn!("{}", error);
        }

        self.returned_error = Some(error);
        self.state = CheckState::Errored;
    }

    fn send_notification(&self) {
        let Some(latest_version) = self.latest_version.as_deref() else {
            return;
        };

        let notification = Notification {
            package_name: &self.package_name,
            current_version: &self.package_version,
            latest_version,
            install_command: &self.install_command,
            is_installed_globally: self.environment.is_installed_globally,
            is_installed_as_root: self.environment.is_installed_as_root,
        };

        self.sink.send(&notification.to_string());
    }

    /// Package name as published.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Version currently running.
    pub fn package_version(&self) -> &str {
        &self.package_version
    }

    /// Latest version reported by the last completed lookup.
    pub fn latest_version(&self) -> Option<&str> {
        self.latest_version.as_deref()
    }

    /// Error from the last failed lookup, kept for the caller to inspect.
    pub fn returned_error(&self) -> Option<&UpdateCheckError> {
        self.returned_error.as_ref()
    }

    /// Take ownership of the error from the last failed lookup.
    pub fn take_returned_error(&mut self) -> Option<UpdateCheckError> {
        self.returned_error.take()
    }

    /// Current position in the initiate/notify cycle.
    pub fn state(&self) -> CheckState {
        self.state
    }

    /// Returns `true` while a spawned lookup has not been awaited.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Folder holding the timestamp markers.
    pub fn timestamps_folder(&self) -> &Path {
        &self.timestamps_folder
    }

    /// Path of this package's timestamp marker.
    pub fn timestamp_file_path(&self) -> &Path {
        self.marker.path()
    }

    /// Minimum interval between two lookups.
    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// The environment snapshot the checker was created with.
    pub fn environment(&self) -> &EnvironmentSnapshot {
        &self.environment
    }
}
