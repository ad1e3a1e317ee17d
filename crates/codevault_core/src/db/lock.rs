//! Cross-process ownership of a database directory.
//!
//! redb serializes writers inside one process. The owner lock extends that
//! guarantee across processes: only the holder of `db.owner.lock` may open
//! the store, so whole-record read-modify-write cycles never interleave.

use crate::constants::DB_OWNER_LOCK_FILE_NAME;
use crate::error::AppError;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Process-lifetime owner lock guard.
///
/// Keeping this value alive holds an exclusive OS lock on `db.owner.lock`.
#[derive(Debug)]
pub struct OwnerLockGuard {
    file: File,
    lock_path: PathBuf,
}

impl OwnerLockGuard {
    /// Path of the held lock file.
    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for OwnerLockGuard {
    fn drop(&mut self) {
        if let Err(err) = self.file.unlock() {
            tracing::warn!(
                "Failed to release owner lock {:?} during drop: {}",
                self.lock_path,
                err
            );
        }
    }
}

/// Return the owner lock file path for a database root.
pub fn owner_lock_path(db_path: &Path) -> PathBuf {
    db_path.join(DB_OWNER_LOCK_FILE_NAME)
}

/// Acquire and hold an exclusive owner lock for the process lifetime.
///
/// # Errors
/// Returns [`AppError::StorageMessage`] when the directory cannot be prepared
/// or another process already owns the database.
pub fn acquire_owner_lock(db_path: &Path) -> Result<OwnerLockGuard, AppError> {
    fs::create_dir_all(db_path).map_err(|err| {
        AppError::StorageMessage(format!(
            "Failed to create database directory '{}': {}",
            db_path.display(),
            err
        ))
    })?;
    let lock_path = owner_lock_path(db_path);
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to open owner lock '{}': {}",
                lock_path.display(),
                err
            ))
        })?;

    match file.try_lock_exclusive() {
        Ok(()) => Ok(OwnerLockGuard { file, lock_path }),
        Err(err)
            if matches!(
                err.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::PermissionDenied
            ) =>
        {
            Err(AppError::StorageMessage(format!(
                "Database '{}' is already in use by another CodeVault process.",
                db_path.display()
            )))
        }
        Err(err) => Err(AppError::StorageMessage(format!(
            "Failed to acquire owner lock '{}': {}",
            lock_path.display(),
            err
        ))),
    }
}
