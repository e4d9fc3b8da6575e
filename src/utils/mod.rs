//! Cross-platform utilities.
//!
//! - [`platform`] - Process and OS probes (home directory, CI, TTY, privileges)

pub mod platform;

pub use platform::{get_home_dir, is_windows, resolve_path};
