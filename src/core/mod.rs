//! Core types shared across the crate.
//!
//! Currently this is the error taxonomy; see [`error`] for how the checker
//! treats each category.

pub mod error;

pub use error::UpdateCheckError;
