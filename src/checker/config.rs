use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::utils::platform;

/// Default minimum interval between two lookups, in seconds (24 hours).
pub const DEFAULT_CHECK_INTERVAL_SECONDS: u64 = 24 * 60 * 60;

/// Default command suggested in the notification.
pub const DEFAULT_INSTALL_COMMAND: &str = "npm install";

/// Update-check settings a host tool can embed in its own configuration.
///
/// Hosts usually keep these under an `[update-check]` table:
///
/// ```toml
/// [update-check]
/// check_interval = 86400
/// timestamps_folder = "~/.config/timestamps"
/// install_command = "npm install"
/// registry_url = "https://registry.npmjs.org"
/// ```
///
/// Every field is optional; missing fields take the [`Default`] values.
///
/// # Examples
///
/// ```rust,no_run
/// use update_checker::checker::config::UpdateCheckConfig;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = UpdateCheckConfig::from_host_toml(
///     "name = \"my-tool\"\n[update-check]\ncheck_interval = 3600\n",
/// )?;
/// assert_eq!(config.check_interval, 3600);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCheckConfig {
    /// Minimum interval between lookups, in seconds. `0` disables checks.
    ///
    /// # Default: `86400` (24 hours)
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,

    /// Folder holding the timestamp markers. Supports `~` and `$VAR`.
    ///
    /// # Default: `$HOME/.config/timestamps`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps_folder: Option<String>,

    /// Command suggested in the notification, without `sudo`/`--global`.
    ///
    /// # Default: `npm install`
    #[serde(default = "default_install_command")]
    pub install_command: String,

    /// Registry queried by the built-in npm lookup.
    ///
    /// # Default: `npm_config_registry` from the environment, else the public registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
}

impl Default for UpdateCheckConfig {
    fn default() -> Self {
        Self {
            check_interval: default_check_interval(),
            timestamps_folder: None,
            install_command: default_install_command(),
            registry_url: None,
        }
    }
}

fn default_check_interval() -> u64 {
    DEFAULT_CHECK_INTERVAL_SECONDS
}

fn default_install_command() -> String {
    DEFAULT_INSTALL_COMMAND.to_string()
}

/// Host configuration file layout, reduced to the table we care about.
#[derive(Debug, Default, Deserialize)]
struct HostConfig {
    #[serde(rename = "update-check", default)]
    update_check: UpdateCheckConfig,
}

impl UpdateCheckConfig {
    /// Parse a standalone update-check TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse update-check configuration")
    }

    /// Extract the `[update-check]` table from a host configuration document.
    ///
    /// Other tables are ignored; a missing table yields the defaults.
    pub fn from_host_toml(content: &str) -> Result<Self> {
        let host: HostConfig =
            toml::from_str(content).context("Failed to parse host configuration")?;
        Ok(host.update_check)
    }

    /// Load the `[update-check]` table from a host configuration file.
    ///
    /// A missing file yields the defaults.
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        Self::from_host_toml(&content)
            .with_context(|| format!("Failed to parse configuration from {}", path.display()))
    }
}

/// Constructor inputs for [`UpdateChecker`](super::UpdateChecker).
///
/// # Examples
///
/// ```rust,no_run
/// use update_checker::checker::config::UpdateCheckerOptions;
///
/// let options = UpdateCheckerOptions::new("xpm", "0.14.9")
///     .with_check_interval_seconds(3600)
///     .with_timestamps_folder("/tmp/timestamps");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheckerOptions {
    /// Full package name, as published.
    pub package_name: String,
    /// Version currently running, in semver.
    pub package_version: String,
    /// Folder for timestamp markers; `None` selects the per-user default.
    pub timestamps_folder: Option<PathBuf>,
    /// Minimum interval between lookups in seconds; `None` selects 24 hours.
    pub check_interval_seconds: Option<u64>,
    /// Command suggested in the notification.
    pub install_command: String,
    /// Registry for the built-in npm lookup.
    pub registry_url: Option<String>,
}

impl UpdateCheckerOptions {
    /// Options with every optional setting left at its default.
    pub fn new(package_name: impl Into<String>, package_version: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            package_version: package_version.into(),
            timestamps_folder: None,
            check_interval_seconds: None,
            install_command: DEFAULT_INSTALL_COMMAND.to_string(),
            registry_url: None,
        }
    }

    /// Options for `package_name`/`package_version` taking the remaining
    /// settings from a host's [`UpdateCheckConfig`].
    ///
    /// # Errors
    ///
    /// Fails when `timestamps_folder` cannot be expanded (unknown variable,
    /// no home directory).
    pub fn from_config(
        package_name: impl Into<String>,
        package_version: impl Into<String>,
        config: &UpdateCheckConfig,
    ) -> Result<Self> {
        let timestamps_folder =
            config.timestamps_folder.as_deref().map(platform::resolve_path).transpose()?;

        Ok(Self {
            timestamps_folder,
            check_interval_seconds: Some(config.check_interval),
            install_command: config.install_command.clone(),
            registry_url: config.registry_url.clone(),
            ..Self::new(package_name, package_version)
        })
    }

    /// Use `folder` for timestamp markers.
    #[must_use]
    pub fn with_timestamps_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.timestamps_folder = Some(folder.into());
        self
    }

    /// Set the minimum interval between lookups; `0` disables checks.
    #[must_use]
    pub fn with_check_interval_seconds(mut self, seconds: u64) -> Self {
        self.check_interval_seconds = Some(seconds);
        self
    }

    /// Set the command suggested in the notification.
    #[must_use]
    pub fn with_install_command(mut self, command: impl Into<String>) -> Self {
        self.install_command = command.into();
        self
    }

    /// Query `url` instead of the default registry.
    #[must_use]
    pub fn with_registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = Some(url.into());
        self
    }

    /// The effective check interval.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds.unwrap_or(DEFAULT_CHECK_INTERVAL_SECONDS))
    }

    /// The effective timestamps folder.
    pub fn timestamps_folder(&self) -> PathBuf {
        self.timestamps_folder.clone().unwrap_or_else(default_timestamps_folder)
    }
}

/// `$HOME/.config/timestamps`, or a folder under the system temp dir when
/// the home directory is unknown.
pub fn default_timestamps_folder() -> PathBuf {
    match platform::get_home_dir() {
        Ok(home) => home.join(".config").join("timestamps"),
        Err(e) => {
            debug!("{}", e);
            std::env::temp_dir().join("timestamps")
        }
    }
}
