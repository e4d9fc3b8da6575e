//! Integration test suite for update-checker
//!
//! End-to-end tests that drive [`UpdateChecker`](update_checker::UpdateChecker)
//! through complete initiate/notify cycles against a real timestamps folder
//! and, where a registry is involved, an httpmock server.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **end_to_end**: Full cycles against a mock npm registry
//! - **environment**: Suppression through real process environment variables
//! - **host_config**: Settings loaded from a host's TOML configuration
//! - **throttle**: Marker-based throttling shared between checkers

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod end_to_end;
mod environment;
mod host_config;
mod throttle;
