//! Version comparison for update checks.
//!
//! - [`comparison`] - Semver ordering between the running and the published version
//!
//! [`is_newer`] is the comparator contract the checker relies on.

pub mod comparison;

pub use comparison::VersionComparator;

use crate::core::UpdateCheckError;

/// Returns `true` when `latest` is strictly greater than `current`.
///
/// Shorthand for [`VersionComparator::is_newer`].
pub fn is_newer(latest: &str, current: &str) -> Result<bool, UpdateCheckError> {
    VersionComparator::is_newer(latest, current)
}
