//! Data models for requests, persistence, and listings.

/// Paste models.
pub mod paste;
