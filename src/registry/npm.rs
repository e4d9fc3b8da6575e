//! npm registry lookup.
//!
//! Fetches the abbreviated package document (`GET {registry}/{name}` with the
//! `application/vnd.npm.install-v1+json` media type) and reads its
//! `dist-tags.latest` entry.

use futures::future::{BoxFuture, FutureExt};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, trace};

use super::{DEFAULT_REGISTRY_URL, VersionLookup};
use crate::core::UpdateCheckError;

/// Abbreviated metadata first, full document as a fallback.
const ACCEPT_ABBREVIATED: &str =
    "application/vnd.npm.install-v1+json; q=1.0, application/json; q=0.8, */*";

/// Upper bound for a single registry request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The subset of the package document this lookup reads.
#[derive(Debug, Deserialize)]
struct PackageDocument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
}

/// [`VersionLookup`] backed by an npm-compatible registry.
///
/// # Examples
///
/// ```rust,no_run
/// use update_checker::registry::{NpmRegistryLookup, VersionLookup};
///
/// # async fn example() -> Result<(), update_checker::core::UpdateCheckError> {
/// let lookup = NpmRegistryLookup::new();
/// let latest = lookup.latest_version("xpm").await?;
/// println!("xpm {latest}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NpmRegistryLookup {
    client: reqwest::Client,
    registry_url: String,
}

impl Default for NpmRegistryLookup {
    fn default() -> Self {
        Self::with_registry(DEFAULT_REGISTRY_URL)
    }
}

impl NpmRegistryLookup {
    /// Lookup against the public npm registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup against a custom registry (mirror, private registry, test server).
    pub fn with_registry(registry_url: impl Into<String>) -> Self {
        Self::with_registry_and_timeout(registry_url, DEFAULT_TIMEOUT)
    }

    /// Lookup against a custom registry with an explicit request timeout.
    pub fn with_registry_and_timeout(registry_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                debug!("Falling back to a default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            registry_url: registry_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The registry base URL, without a trailing slash.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// URL of the package document for `package_name`.
    ///
    /// Scoped names keep their `@` and have the `/` percent-encoded, the form
    /// the registry expects (`@xpack/xpm` → `@xpack%2Fxpm`).
    pub fn package_url(&self, package_name: &str) -> String {
        format!("{}/{}", self.registry_url, package_name.replace('/', "%2F"))
    }
}

impl VersionLookup for NpmRegistryLookup {
    fn latest_version(
        &self,
        package_name: &str,
    ) -> BoxFuture<'static, Result<String, UpdateCheckError>> {
        let client = self.client.clone();
        let url = self.package_url(package_name);
        let package = package_name.to_string();

        async move {
            trace!("Fetching {}", url);

            let response = client
                .get(&url)
                .header(ACCEPT, ACCEPT_ABBREVIATED)
                .send()
                .await
                .map_err(|e| UpdateCheckError::Network {
                    package: package.clone(),
                    reason: e.to_string(),
                })?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(UpdateCheckError::PackageNotFound { package });
            }
            if !status.is_success() {
                return Err(UpdateCheckError::Registry {
                    package,
                    message: format!("HTTP {status}"),
                });
            }

            let document: PackageDocument = response.json().await.map_err(|e| {
                if e.is_decode() {
                    UpdateCheckError::Registry {
                        package: package.clone(),
                        message: format!("Malformed package document: {e}"),
                    }
                } else {
                    UpdateCheckError::Network {
                        package: package.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

            let latest = document.dist_tags.get("latest").cloned().ok_or_else(|| {
                UpdateCheckError::Registry {
                    package: package.clone(),
                    message: "No 'latest' dist-tag".to_string(),
                }
            })?;

            debug!("Registry reports {}@{}", package, latest);
            Ok(latest)
        }
        .boxed()
    }
}
