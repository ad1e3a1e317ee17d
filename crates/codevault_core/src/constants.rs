//! Shared constants used across CodeVault crates.

/// Default API port for CodeVault.
pub const DEFAULT_PORT: u16 = 3000;

/// Default maximum paste size accepted by the API layer.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 10 * 1024 * 1024;

/// Title assigned when a paste is created without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Language tag assigned when a paste is created without one.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Number of rows returned by the recent listing when no usable limit is given.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Length of generated paste identifiers.
pub const PASTE_ID_LENGTH: usize = 10;
/// Insert attempts before an id collision becomes a hard failure.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Default base URL for CLI/API clients.
pub const DEFAULT_CLI_SERVER_URL: &str = "http://localhost:3000";

/// File name of the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";
/// Process-lifetime owner lock file held by the process that opened the store.
pub const DB_OWNER_LOCK_FILE_NAME: &str = "db.owner.lock";
