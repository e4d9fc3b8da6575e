//! Platform-specific helpers used to inspect the running process.
//!
//! Everything here is a thin, side-effect free probe of the operating
//! system or of an environment map. The results are collected once into an
//! [`EnvironmentSnapshot`](crate::environment::EnvironmentSnapshot) and never
//! consulted again afterwards.
//!
//! # Examples
//!
//! ```rust,no_run
//! use update_checker::utils::platform::{get_home_dir, is_running_as_root, resolve_path};
//!
//! # fn example() -> anyhow::Result<()> {
//! let home = get_home_dir()?;
//! let folder = resolve_path("~/.config/timestamps")?;
//! assert!(folder.starts_with(&home));
//!
//! if is_running_as_root() {
//!     println!("effective and real user ids differ");
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Environment variables set by common CI providers.
///
/// `CI` itself is handled separately because some providers export
/// `CI=false` to opt out.
const CI_VENDOR_VARS: &[&str] = &[
    "CONTINUOUS_INTEGRATION",
    "BUILD_NUMBER",
    "RUN_ID",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TF_BUILD",
];

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Gets the home directory path for the current user.
///
/// # Platform Behavior
///
/// - **Windows**: Uses the `%USERPROFILE%` profile folder
/// - **Unix/Linux/macOS**: Uses `$HOME`
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Resolves a path with tilde expansion and environment variable substitution.
///
/// # Supported Patterns
///
/// - `~/path` - Expands to `{home}/path`
/// - `$VAR/path` and `${VAR}/path` - Expands environment variables
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full_with_context(
        path,
        || dirs::home_dir().map(|home| home.to_string_lossy().into_owned()),
        |var| std::env::var(var).map(Some),
    )
    .with_context(|| format!("Failed to expand path: {path}"))?;

    Ok(PathBuf::from(expanded.as_ref()))
}

/// Returns `true` when the environment map looks like a CI job.
///
/// `CI` counts unless it is set to `false` or `0`; any of the well-known
/// vendor variables counts when present at all.
#[must_use]
pub fn is_ci(env: &HashMap<String, String>) -> bool {
    if let Some(value) = env.get("CI")
        && value != "false"
        && value != "0"
    {
        return true;
    }

    CI_VENDOR_VARS.iter().any(|var| env.contains_key(*var))
}

/// Returns `true` when standard output is attached to a terminal.
#[must_use]
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Returns `true` when the process runs with elevated privileges.
///
/// On unix this means the effective user id differs from the real one
/// (set-uid execution). Always `false` elsewhere.
#[must_use]
pub fn is_running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() and getuid() are simple syscalls that cannot fail
        unsafe { libc::geteuid() != libc::getuid() }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Returns the directory that contains the running executable.
pub fn current_exe_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow::anyhow!("Executable has no parent directory: {}", exe.display()))
}

/// Returns `true` when `child` is strictly inside `parent`.
///
/// Comparison is component-wise, so `/usr/localfoo` is not inside
/// `/usr/local`.
#[must_use]
pub fn is_path_inside(child: &Path, parent: &Path) -> bool {
    child != parent && child.starts_with(parent)
}
