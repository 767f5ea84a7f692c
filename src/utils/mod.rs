//! Utility modules shared across the crate.
//!
//! - [`datetime`] - Date formats and remote timestamp parsing

pub mod datetime;
