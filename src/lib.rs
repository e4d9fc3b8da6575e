//! update-checker - Throttled "new version available" notifications
//!
//! A small library for command-line tools published on the npm registry. It
//! looks up the latest published version of the running tool at most once
//! per interval and, when that version is newer, tells the user how to
//! update.
//!
//! # Architecture Overview
//!
//! A check is split in two so the registry round-trip overlaps with the
//! tool's real work:
//! - `initiate_version_retrieval()` decides whether a lookup is due and
//!   spawns it in the background
//! - `notify_if_update_is_available()` awaits the lookup, compares versions,
//!   prints the notification and refreshes the timestamp marker
//!
//! Throttling state is a single empty file per package,
//! `<timestamps folder>/<package>-update-check`, whose modification time
//! records the last completed lookup.
//!
//! # Core Modules
//!
//! - [`checker`] - The [`UpdateChecker`] state machine, marker, notification and options
//! - [`core`] - Error types
//! - [`environment`] - One-time snapshot of CI/terminal/privilege/installation facts
//! - [`registry`] - The [`VersionLookup`] seam and the npm registry client
//! - [`utils`] - Cross-platform helpers (home directory, CI and terminal detection)
//! - [`version`] - Semver precedence comparison
//!
//! # Example
//!
//! ```rust,no_run
//! use update_checker::{EnvironmentSnapshot, UpdateChecker, UpdateCheckerOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = UpdateCheckerOptions::new("xpm", "0.14.9");
//!     let mut checker = UpdateChecker::new(options, EnvironmentSnapshot::detect())?;
//!
//!     checker.initiate_version_retrieval().await;
//!     // ... the tool does its real work here ...
//!     checker.notify_if_update_is_available().await;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! Hosts can expose the settings in their own TOML configuration:
//!
//! ```toml
//! [update-check]
//! check_interval = 86400          # seconds, 0 disables checks
//! timestamps_folder = "~/.config/timestamps"
//! install_command = "npm install"
//! registry_url = "https://registry.npmjs.org"
//! ```
//!
//! See [`UpdateCheckConfig`] and [`UpdateCheckerOptions::from_config`].
//!
//! # Environment Variables
//!
//! - `NO_<PACKAGE>_UPDATE_NOTIFIER` - Disable checks for one package
//! - `CI` and common CI vendor variables - Disable checks in pipelines
//! - `npm_config_registry` - Registry used when none is configured
//! - `RUST_LOG` - Log filter for the crate's own tests

pub mod checker;
pub mod core;
pub mod environment;
pub mod registry;
pub mod utils;
pub mod version;

// Test utilities (only available in test builds or with the test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use checker::{
    CheckState, NotificationSink, UpdateCheckConfig, UpdateChecker, UpdateCheckerOptions,
};
pub use core::UpdateCheckError;
pub use environment::EnvironmentSnapshot;
pub use registry::{NpmRegistryLookup, VersionLookup};
