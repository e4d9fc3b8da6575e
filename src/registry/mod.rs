//! Latest-version lookup.
//!
//! The checker only needs one thing from a package registry: the latest
//! published version string of a package. That contract is the
//! [`VersionLookup`] trait. The lookup runs as a spawned tokio task, so the
//! returned future must be `Send + 'static` and must not borrow the lookup.
//!
//! - [`npm`] - The default implementation, backed by the npm registry API
//!
//! # Custom Lookups
//!
//! ```rust,no_run
//! use futures::future::{BoxFuture, FutureExt};
//! use update_checker::core::UpdateCheckError;
//! use update_checker::registry::VersionLookup;
//!
//! struct Pinned(&'static str);
//!
//! impl VersionLookup for Pinned {
//!     fn latest_version(
//!         &self,
//!         _package_name: &str,
//!     ) -> BoxFuture<'static, Result<String, UpdateCheckError>> {
//!         let version = self.0.to_string();
//!         async move { Ok(version) }.boxed()
//!     }
//! }
//! ```

pub mod npm;

pub use npm::NpmRegistryLookup;

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::UpdateCheckError;

/// Default npm registry endpoint.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Environment variables that override the registry, in priority order.
const REGISTRY_ENV_VARS: &[&str] = &["npm_config_registry", "NPM_CONFIG_REGISTRY"];

/// Retrieves the latest published version of a package.
pub trait VersionLookup: Send + Sync {
    /// Resolve the latest version of `package_name`.
    ///
    /// Fails with [`UpdateCheckError::PackageNotFound`] when the registry does
    /// not know the package, [`UpdateCheckError::Network`] when it cannot be
    /// reached, and [`UpdateCheckError::Registry`] when its answer is unusable.
    fn latest_version(
        &self,
        package_name: &str,
    ) -> BoxFuture<'static, Result<String, UpdateCheckError>>;
}

impl<T: VersionLookup + ?Sized> VersionLookup for Arc<T> {
    fn latest_version(
        &self,
        package_name: &str,
    ) -> BoxFuture<'static, Result<String, UpdateCheckError>> {
        (**self).latest_version(package_name)
    }
}

/// Picks the registry override from an environment map, if any.
///
/// Blank values are ignored.
#[must_use]
pub fn registry_url_from_env(env: &HashMap<String, String>) -> Option<String> {
    REGISTRY_ENV_VARS
        .iter()
        .filter_map(|var| env.get(*var))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
