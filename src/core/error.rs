//! Error handling for the update checker
//!
//! The checker distinguishes three kinds of failure:
//!
//! - **Configuration errors** ([`UpdateCheckError::MissingParameter`]) are
//!   programmer errors raised by the constructor. Hosts should treat them as
//!   fatal.
//! - **Lookup errors** ([`UpdateCheckError::PackageNotFound`],
//!   [`UpdateCheckError::Network`], [`UpdateCheckError::Registry`],
//!   [`UpdateCheckError::InvalidVersion`], [`UpdateCheckError::LookupAborted`])
//!   are produced while retrieving the latest version. They never propagate
//!   out of [`notify_if_update_is_available`]; the checker logs them and keeps
//!   the last one for inspection via [`returned_error`].
//! - **Marker I/O errors** are plain [`anyhow::Error`] values with file-path
//!   context. The checker logs them at debug level and drops them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use update_checker::core::UpdateCheckError;
//!
//! let error = UpdateCheckError::PackageNotFound {
//!     package: "xpm".to_string(),
//! };
//! assert_eq!(error.to_string(), "Package 'xpm' was not found in the registry");
//! assert!(error.suggestion().is_some());
//! ```
//!
//! [`notify_if_update_is_available`]: crate::checker::UpdateChecker::notify_if_update_is_available
//! [`returned_error`]: crate::checker::UpdateChecker::returned_error

use thiserror::Error;

/// The error type for update-check operations.
///
/// # Error Categories
///
/// ## Configuration
/// - [`MissingParameter`] - A required constructor input is absent or blank
///
/// ## Version Lookup
/// - [`PackageNotFound`] - The registry does not know the package
/// - [`Network`] - The registry could not be reached
/// - [`Registry`] - The registry answered with something unusable
/// - [`LookupAborted`] - The background lookup task panicked or was cancelled
///
/// ## Version Comparison
/// - [`InvalidVersion`] - A version string is not valid semver
///
/// [`MissingParameter`]: UpdateCheckError::MissingParameter
/// [`PackageNotFound`]: UpdateCheckError::PackageNotFound
/// [`Network`]: UpdateCheckError::Network
/// [`Registry`]: UpdateCheckError::Registry
/// [`LookupAborted`]: UpdateCheckError::LookupAborted
/// [`InvalidVersion`]: UpdateCheckError::InvalidVersion
#[derive(Error, Debug)]
pub enum UpdateCheckError {
    /// A required constructor parameter is missing or empty.
    ///
    /// Raised by [`UpdateChecker::new`](crate::checker::UpdateChecker::new)
    /// when the package name or the current version is blank.
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// Name of the missing parameter (e.g., "package_name")
        name: &'static str,
    },

    /// The registry has no package with this name.
    #[error("Package '{package}' was not found in the registry")]
    PackageNotFound {
        /// The package that was looked up
        package: String,
    },

    /// The registry could not be reached.
    ///
    /// Covers DNS failures, refused connections, TLS errors and timeouts.
    #[error("Failed to reach the registry while looking up '{package}': {reason}")]
    Network {
        /// The package that was looked up
        package: String,
        /// Transport-level description of the failure
        reason: String,
    },

    /// The registry answered, but not with a usable latest version.
    #[error("Registry error while looking up '{package}': {message}")]
    Registry {
        /// The package that was looked up
        package: String,
        /// What was wrong with the response
        message: String,
    },

    /// A version string could not be parsed as semver.
    #[error("Invalid version '{version}': {source}")]
    InvalidVersion {
        /// The offending version string
        version: String,
        /// The underlying parse error
        #[source]
        source: semver::Error,
    },

    /// The background lookup task did not run to completion.
    #[error("Version lookup for '{package}' was aborted: {reason}")]
    LookupAborted {
        /// The package that was looked up
        package: String,
        /// Why the task stopped (panic message or cancellation)
        reason: String,
    },
}

impl UpdateCheckError {
    /// A short hint for the user, when one is useful.
    #[must_use]
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::MissingParameter { name } => {
                Some(format!("Pass a non-empty `{name}` when creating the checker"))
            }
            Self::PackageNotFound { package } => Some(format!(
                "Check that '{package}' is published, or set npm_config_registry to the registry that hosts it"
            )),
            Self::Network { .. } => Some(
                "Check your network connection; the check will be retried on a later run"
                    .to_string(),
            ),
            Self::Registry { .. } | Self::InvalidVersion { .. } | Self::LookupAborted { .. } => {
                None
            }
        }
    }
}
