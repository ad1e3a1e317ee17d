//! Database layer for CodeVault.

/// Cross-process owner lock.
pub mod lock;
/// Paste repository operations.
pub mod paste;
/// redb table definitions.
pub mod tables;

use crate::constants::REDB_FILE_NAME;
use crate::error::AppError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use self::paste::PasteDb;

/// Database handle owning the redb store and the owner lock.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub pastes: PasteDb,
    path: PathBuf,
    _owner_lock: lock::OwnerLockGuard,
}

#[cfg(test)]
mod tests;

impl Database {
    /// Open (or create) the database rooted at directory `path`.
    ///
    /// The owner lock is taken before redb opens its file and is released
    /// when the handle is dropped.
    ///
    /// # Errors
    /// Returns an error if another process owns the directory or redb cannot
    /// open the store.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let root = PathBuf::from(path);
        let owner_lock = lock::acquire_owner_lock(&root)?;
        let file = root.join(REDB_FILE_NAME);
        let db = Arc::new(redb::Database::create(&file)?);
        tracing::debug!("Opened paste store at {}", file.display());

        Ok(Self {
            pastes: PasteDb::new(db.clone())?,
            db,
            path: root,
            _owner_lock: owner_lock,
        })
    }

    /// Directory this database was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
