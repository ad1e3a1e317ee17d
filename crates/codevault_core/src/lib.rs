//! Core domain library for CodeVault (config, storage, models, expiry).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer.
pub mod db;
/// Process-global environment helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Expiry calculation and enforcement.
pub mod expiry;
/// Paste identifier generation.
pub mod id;
/// Data models for API requests and persistence.
pub mod models;
/// Text normalization helpers.
pub mod text;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::*;
pub use db::Database;
pub use error::AppError;
pub use expiry::{compute_expiry, is_expired, Expiry};
pub use id::generate_id;
