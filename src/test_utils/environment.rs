//! Temporary timestamps folder plus ready-made checkers.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use crate::checker::{UpdateChecker, UpdateCheckerOptions};
use crate::environment::EnvironmentSnapshot;

/// Package name used by the scenarios.
pub const TEST_PACKAGE_NAME: &str = "xpm";

/// Current version used by the scenarios.
pub const TEST_PACKAGE_VERSION: &str = "0.0.1";

/// Interactive, non-CI, unprivileged, locally installed run.
pub fn interactive_environment() -> EnvironmentSnapshot {
    EnvironmentSnapshot::default().tty(true)
}

/// Test environment owning a temporary timestamps folder.
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub timestamps_folder: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let timestamps_folder = temp_dir.path().join("timestamps");

        Ok(Self {
            temp_dir,
            timestamps_folder,
        })
    }

    /// Options for the test package with markers in this environment.
    pub fn options(&self) -> UpdateCheckerOptions {
        UpdateCheckerOptions::new(TEST_PACKAGE_NAME, TEST_PACKAGE_VERSION)
            .with_timestamps_folder(&self.timestamps_folder)
    }

    /// Checker for the test package in an interactive environment.
    ///
    /// The default npm lookup is left in place; replace it with
    /// [`UpdateChecker::with_lookup`] before initiating.
    pub fn checker(&self) -> Result<UpdateChecker> {
        self.checker_with(interactive_environment())
    }

    /// Checker for the test package in `environment`.
    pub fn checker_with(&self, environment: EnvironmentSnapshot) -> Result<UpdateChecker> {
        Ok(UpdateChecker::new(self.options(), environment)?)
    }

    /// Path of the test package's marker.
    pub fn marker_path(&self) -> PathBuf {
        self.timestamps_folder.join(format!("{TEST_PACKAGE_NAME}-update-check"))
    }

    /// Returns `true` if the test package's marker exists.
    pub fn marker_exists(&self) -> bool {
        self.marker_path().exists()
    }

    /// Modification time of the test package's marker.
    pub fn marker_mtime(&self) -> Result<SystemTime> {
        let path = self.marker_path();
        fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .with_context(|| format!("Failed to stat {}", path.display()))
    }

    /// Create the test package's marker with the given age.
    pub fn write_marker_aged(&self, age: Duration) -> Result<()> {
        write_marker_aged(&self.marker_path(), age)
    }
}

/// Create an empty marker at `path` whose modification time is `age` ago.
pub fn write_marker_aged(path: &Path, age: Duration) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create marker: {}", path.display()))?;
    file.set_modified(SystemTime::now() - age)
        .with_context(|| format!("Failed to set mtime of {}", path.display()))?;
    Ok(())
}
