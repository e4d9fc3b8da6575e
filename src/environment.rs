//! Environment snapshot consumed by the update checker.
//!
//! The checker never probes the process directly. Everything it needs to
//! know about the environment is collected once into an
//! [`EnvironmentSnapshot`], either by [`EnvironmentSnapshot::detect`] for
//! real runs or by building the value by hand in tests and special hosts.
//!
//! # Examples
//!
//! ```rust,no_run
//! use update_checker::environment::EnvironmentSnapshot;
//!
//! // Real process
//! let live = EnvironmentSnapshot::detect();
//!
//! // Interactive, non-CI run of a globally installed tool
//! let fixed = EnvironmentSnapshot::default()
//!     .tty(true)
//!     .installed_globally(true);
//! assert!(fixed.is_tty && !fixed.is_ci);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::utils::platform;

/// System prefix under which a global install implies root ownership.
#[cfg(unix)]
const ROOT_INSTALL_PREFIX: &str = "/usr/local";

/// Environment variables naming the npm global prefix.
const NPM_PREFIX_ENV_VARS: &[&str] = &["npm_config_prefix", "NPM_CONFIG_PREFIX"];

/// Environment-derived facts, fixed for the lifetime of a checker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    /// Process environment variables.
    pub env: HashMap<String, String>,
    /// Running inside a continuous-integration job.
    pub is_ci: bool,
    /// Standard output is an interactive terminal.
    pub is_tty: bool,
    /// Running with elevated privileges (effective uid differs from real uid).
    pub is_running_as_root: bool,
    /// The host tool is installed globally rather than inside a project.
    pub is_installed_globally: bool,
    /// The global install lives in a root-owned system location.
    pub is_installed_as_root: bool,
}

impl EnvironmentSnapshot {
    /// Inspect the running process.
    ///
    /// - CI: well-known CI variables in the process environment
    /// - TTY: standard output is a terminal
    /// - Running as root: `geteuid() != getuid()` on unix, never elsewhere
    /// - Installed globally: the executable lives under a global install
    ///   prefix (`npm_config_prefix`, `/usr/local`, `~/.npm-global`,
    ///   `~/.cargo/bin`, `%APPDATA%\npm`) and not inside a `node_modules`
    ///   tree or the working directory's `target/`
    /// - Installed as root: installed globally under `/usr/local` (unix only)
    pub fn detect() -> Self {
        let env: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        let exe_dir = platform::current_exe_dir().ok();
        let cwd = std::env::current_dir().ok();

        let prefixes = global_prefixes(&env, platform::get_home_dir().ok().as_deref());
        let is_installed_globally = exe_dir
            .as_deref()
            .is_some_and(|exe_dir| is_global_install(exe_dir, cwd.as_deref(), &prefixes));
        let is_installed_as_root = exe_dir
            .as_deref()
            .is_some_and(|exe_dir| is_root_install(exe_dir, is_installed_globally));

        let snapshot = Self {
            is_ci: platform::is_ci(&env),
            is_tty: platform::is_terminal(),
            is_running_as_root: platform::is_running_as_root(),
            is_installed_globally,
            is_installed_as_root,
            env,
        };

        trace!(
            "Detected environment: ci={} tty={} root={} global={} root_install={}",
            snapshot.is_ci,
            snapshot.is_tty,
            snapshot.is_running_as_root,
            snapshot.is_installed_globally,
            snapshot.is_installed_as_root
        );

        snapshot
    }

    /// Replace the environment variable map.
    #[must_use]
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Set a single environment variable.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Set the CI flag.
    #[must_use]
    pub fn ci(mut self, is_ci: bool) -> Self {
        self.is_ci = is_ci;
        self
    }

    /// Set the TTY flag.
    #[must_use]
    pub fn tty(mut self, is_tty: bool) -> Self {
        self.is_tty = is_tty;
        self
    }

    /// Set the running-as-root flag.
    #[must_use]
    pub fn running_as_root(mut self, is_running_as_root: bool) -> Self {
        self.is_running_as_root = is_running_as_root;
        self
    }

    /// Set the installed-globally flag.
    #[must_use]
    pub fn installed_globally(mut self, is_installed_globally: bool) -> Self {
        self.is_installed_globally = is_installed_globally;
        self
    }

    /// Set the installed-as-root flag.
    #[must_use]
    pub fn installed_as_root(mut self, is_installed_as_root: bool) -> Self {
        self.is_installed_as_root = is_installed_as_root;
        self
    }

    /// Returns `true` when `name` is present in the environment map.
    pub fn has_var(&self, name: &str) -> bool {
        self.env.contains_key(name)
    }
}

/// Folders whose contents count as globally installed.
fn global_prefixes(env: &HashMap<String, String>, home: Option<&Path>) -> Vec<PathBuf> {
    let mut prefixes: Vec<PathBuf> = NPM_PREFIX_ENV_VARS
        .iter()
        .filter_map(|var| env.get(*var))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .collect();

    #[cfg(unix)]
    prefixes.push(PathBuf::from(ROOT_INSTALL_PREFIX));

    if let Some(home) = home {
        prefixes.push(home.join(".npm-global"));
        prefixes.push(home.join(".cargo").join("bin"));
    }

    if let Some(app_data) = env.get("APPDATA") {
        prefixes.push(Path::new(app_data).join("npm"));
    }

    prefixes
}

fn is_global_install(exe_dir: &Path, cwd: Option<&Path>, prefixes: &[PathBuf]) -> bool {
    if let Some(cwd) = cwd
        && exe_dir.starts_with(cwd.join("target"))
    {
        return false;
    }

    prefixes.iter().any(|prefix| {
        exe_dir.strip_prefix(prefix).is_ok_and(|relative| {
            // npm keeps global packages in `<prefix>/lib/node_modules` (unix)
            // or `<prefix>/node_modules` (Windows); any other `node_modules`
            // belongs to a project.
            let nested = relative
                .strip_prefix("lib/node_modules")
                .or_else(|_| relative.strip_prefix("node_modules"))
                .unwrap_or(relative);
            !nested.components().any(|component| component.as_os_str() == "node_modules")
        })
    })
}

#[cfg(unix)]
fn is_root_install(exe_dir: &Path, is_installed_globally: bool) -> bool {
    // Heuristic; installs under other system prefixes are not recognised.
    is_installed_globally && platform::is_path_inside(exe_dir, Path::new(ROOT_INSTALL_PREFIX))
}

#[cfg(not(unix))]
fn is_root_install(_exe_dir: &Path, _is_installed_globally: bool) -> bool {
    false
}
