//! Common test utilities for update-checker integration tests
//!
//! Wraps an httpmock server that stands in for the npm registry, so the
//! checker can be exercised end to end with the real HTTP lookup.

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

use httpmock::Mock;
use httpmock::prelude::*;
use serde_json::json;
use update_checker::NpmRegistryLookup;

/// A fake npm registry.
pub struct MockRegistry {
    pub server: MockServer,
}

impl MockRegistry {
    /// Start an empty registry.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start_async().await,
        }
    }

    /// Base URL to configure as the registry.
    pub fn url(&self) -> String {
        self.server.base_url()
    }

    /// Lookup pointed at this registry.
    pub fn lookup(&self) -> NpmRegistryLookup {
        NpmRegistryLookup::with_registry(self.url())
    }

    /// Publish `latest` as the `latest` dist-tag of `package`.
    ///
    /// `package` is the request path, so scoped names must be given
    /// encoded (`@scope%2Fname`).
    pub async fn publish(&self, package: &str, latest: &str) -> Mock<'_> {
        let path = format!("/{package}");
        let body = json!({
            "name": package,
            "dist-tags": { "latest": latest },
            "versions": { (latest): {} },
        });

        self.server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(body);
            })
            .await
    }

    /// Answer every request for `package` with `status`.
    pub async fn fail(&self, package: &str, status: u16) -> Mock<'_> {
        let path = format!("/{package}");

        self.server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(status).body("registry failure");
            })
            .await
    }
}
