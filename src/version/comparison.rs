//! Semantic version comparison between the running and the published version.

use semver::Version;

use crate::core::UpdateCheckError;

/// Compares version strings using semver ordering.
pub struct VersionComparator;

impl VersionComparator {
    /// Returns `true` when `latest` is strictly greater than `current`.
    ///
    /// Both strings must be valid semver, optionally prefixed with `v`.
    /// Prereleases order below their release (`1.0.0-rc.1 < 1.0.0`) and build
    /// metadata is ignored for precedence.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateCheckError::InvalidVersion`] naming the first string
    /// that fails to parse.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use update_checker::version::comparison::VersionComparator;
    ///
    /// # fn example() -> Result<(), update_checker::core::UpdateCheckError> {
    /// assert!(VersionComparator::is_newer("1.0.0", "0.0.1")?);
    /// assert!(!VersionComparator::is_newer("v1.0.0", "1.0.0")?);
    /// assert!(!VersionComparator::is_newer("1.0.0-rc.1", "1.0.0")?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn is_newer(latest: &str, current: &str) -> Result<bool, UpdateCheckError> {
        let latest = Self::parse_version(latest)?;
        let current = Self::parse_version(current)?;

        Ok(latest.cmp_precedence(&current).is_gt())
    }

    fn parse_version(version_str: &str) -> Result<Version, UpdateCheckError> {
        let trimmed = version_str.trim();
        let clean_version = trimmed.strip_prefix('v').unwrap_or(trimmed);

        Version::parse(clean_version).map_err(|source| UpdateCheckError::InvalidVersion {
            version: version_str.to_string(),
            source,
        })
    }
}
