//! Paste storage operations backed by redb.
//!
//! Every mutation (create, update, counted view) runs as a single redb write
//! transaction. redb admits one writer at a time, so read-modify-write cycles
//! on a record are serialized and a commit either lands completely or not at
//! all. Uncounted reads use read transactions and never write.

use crate::constants::{DEFAULT_RECENT_LIMIT, MAX_ID_ATTEMPTS};
use crate::db::tables::{COUNTERS, PASTES, PASTES_BY_CREATED, PASTE_SEQUENCE_KEY};
use crate::error::AppError;
use crate::id::generate_id;
use crate::models::paste::{require_content, CreatePasteRequest, Paste, PasteSummary};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable, ReadableTableMetadata};
use std::sync::Arc;

/// Accessor for paste-related redb tables.
pub struct PasteDb {
    db: Arc<redb::Database>,
}

enum InsertOutcome {
    Inserted,
    IdTaken,
}

impl PasteDb {
    /// Initialize paste tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.open_table(PASTES_BY_CREATED)?;
        write_txn.open_table(COUNTERS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Create a paste from a request, stamped with the current time.
    ///
    /// # Returns
    /// The stored record, including its generated id.
    ///
    /// # Errors
    /// [`AppError::Validation`] for missing or empty content; storage errors
    /// when the insert cannot be committed.
    pub fn create(&self, request: &CreatePasteRequest) -> Result<Paste, AppError> {
        self.create_at(request, Utc::now())
    }

    /// Create a paste as if the current time were `now`.
    ///
    /// # Errors
    /// See [`PasteDb::create`].
    pub fn create_at(
        &self,
        request: &CreatePasteRequest,
        now: DateTime<Utc>,
    ) -> Result<Paste, AppError> {
        self.create_with_ids(request, now, generate_id)
    }

    /// Create a paste drawing candidate ids from `next_id`.
    ///
    /// A candidate that already exists is discarded and a new one drawn, up
    /// to [`MAX_ID_ATTEMPTS`] times.
    ///
    /// # Errors
    /// See [`PasteDb::create`]; additionally [`AppError::StorageMessage`] when
    /// every candidate collided.
    pub fn create_with_ids<F>(
        &self,
        request: &CreatePasteRequest,
        now: DateTime<Utc>,
        mut next_id: F,
    ) -> Result<Paste, AppError>
    where
        F: FnMut() -> String,
    {
        let content = require_content(request.content.as_deref())?;

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let paste = Paste::from_request(next_id(), content, request, now);
            match self.insert_new(&paste)? {
                InsertOutcome::Inserted => {
                    tracing::debug!(
                        "Created paste {} (private: {}, expires: {})",
                        paste.id,
                        paste.is_private,
                        paste.expires_at
                    );
                    return Ok(paste);
                }
                InsertOutcome::IdTaken => {
                    tracing::warn!(
                        "Paste id collision on '{}' (attempt {}/{})",
                        paste.id,
                        attempt,
                        MAX_ID_ATTEMPTS
                    );
                }
            }
        }

        Err(AppError::StorageMessage(format!(
            "Could not allocate a unique paste id after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }

    fn insert_new(&self, paste: &Paste) -> Result<InsertOutcome, AppError> {
        let encoded = bincode::serialize(paste)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            if pastes.get(paste.id.as_str())?.is_some() {
                return Ok(InsertOutcome::IdTaken);
            }

            let mut counters = write_txn.open_table(COUNTERS)?;
            let sequence = counters
                .get(PASTE_SEQUENCE_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0)
                .saturating_add(1);
            counters.insert(PASTE_SEQUENCE_KEY, sequence)?;

            let mut by_created = write_txn.open_table(PASTES_BY_CREATED)?;
            pastes.insert(paste.id.as_str(), encoded.as_slice())?;
            by_created.insert(
                creation_key(paste.created_at, sequence),
                paste.id.as_str(),
            )?;
        }
        write_txn.commit()?;
        Ok(InsertOutcome::Inserted)
    }

    /// Replace a paste's content and stamp `updated_at`.
    ///
    /// # Returns
    /// The new `updated_at`.
    ///
    /// # Errors
    /// [`AppError::Validation`] for empty content, [`AppError::NotFound`] for
    /// an unknown id, storage errors otherwise.
    pub fn update(&self, id: &str, content: &str) -> Result<DateTime<Utc>, AppError> {
        self.update_at(id, content, Utc::now())
    }

    /// Update as if the current time were `now`.
    ///
    /// Expiry is neither checked nor extended.
    ///
    /// # Errors
    /// See [`PasteDb::update`].
    pub fn update_at(
        &self,
        id: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, AppError> {
        let content = require_content(Some(content))?;

        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let Some(guard) = pastes.get(id)? else {
                return Err(AppError::NotFound);
            };
            let mut paste = deserialize_paste(guard.value())?;
            drop(guard);

            paste.content = content.to_string();
            paste.updated_at = Some(now);
            let encoded = bincode::serialize(&paste)?;
            pastes.insert(id, encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(now)
    }

    /// Read a live paste, optionally counting the read as a view.
    ///
    /// # Errors
    /// [`AppError::NotFound`] for an unknown id, [`AppError::Expired`] once
    /// the expiry has passed, storage errors otherwise.
    pub fn get(&self, id: &str, count_view: bool) -> Result<Paste, AppError> {
        self.get_at(id, count_view, Utc::now())
    }

    /// Read as if the current time were `now`.
    ///
    /// A counted read increments `views` by one and commits before
    /// returning; the returned record reflects the increment. Expired pastes
    /// are never mutated.
    ///
    /// # Errors
    /// See [`PasteDb::get`].
    pub fn get_at(&self, id: &str, count_view: bool, now: DateTime<Utc>) -> Result<Paste, AppError> {
        if !count_view {
            return self.read_live(id, now);
        }

        let write_txn = self.db.begin_write()?;
        let paste = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let Some(guard) = pastes.get(id)? else {
                return Err(AppError::NotFound);
            };
            let mut paste = deserialize_paste(guard.value())?;
            drop(guard);

            if paste.is_expired(now) {
                return Err(AppError::Expired);
            }

            paste.views = paste.views.saturating_add(1);
            let encoded = bincode::serialize(&paste)?;
            pastes.insert(id, encoded.as_slice())?;
            paste
        };
        write_txn.commit()?;
        Ok(paste)
    }

    /// Return only the content of a live paste. Never counts a view.
    ///
    /// # Errors
    /// See [`PasteDb::get`].
    pub fn get_raw(&self, id: &str) -> Result<String, AppError> {
        self.get_raw_at(id, Utc::now())
    }

    /// Raw read as if the current time were `now`.
    ///
    /// # Errors
    /// See [`PasteDb::get`].
    pub fn get_raw_at(&self, id: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        self.read_live(id, now).map(|paste| paste.content)
    }

    /// Fetch the stored record regardless of expiry.
    ///
    /// Expired pastes stay on disk; this is the only accessor that sees them.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn find(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        match pastes.get(id)? {
            Some(guard) => Ok(Some(deserialize_paste(guard.value())?)),
            None => Ok(None),
        }
    }

    fn read_live(&self, id: &str, now: DateTime<Utc>) -> Result<Paste, AppError> {
        let paste = self.find(id)?.ok_or(AppError::NotFound)?;
        if paste.is_expired(now) {
            return Err(AppError::Expired);
        }
        Ok(paste)
    }

    /// List the newest public, unexpired pastes.
    ///
    /// # Returns
    /// Up to `limit` summaries ordered by creation time, newest first.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<PasteSummary>, AppError> {
        self.list_recent_at(limit, Utc::now())
    }

    /// List as if the current time were `now`.
    ///
    /// A `limit` of zero means [`DEFAULT_RECENT_LIMIT`].
    ///
    /// # Errors
    /// See [`PasteDb::list_recent`].
    pub fn list_recent_at(
        &self,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<PasteSummary>, AppError> {
        let limit = if limit == 0 {
            DEFAULT_RECENT_LIMIT
        } else {
            limit
        };

        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        let by_created = read_txn.open_table(PASTES_BY_CREATED)?;

        let mut summaries = Vec::with_capacity(limit.min(64));
        for entry in by_created.iter()? {
            let (_, id_guard) = entry?;
            let id = id_guard.value();
            let Some(row) = pastes.get(id)? else {
                tracing::warn!("Creation index references missing paste '{}'", id);
                continue;
            };
            let paste = deserialize_paste(row.value())?;
            if !paste.is_listed(now) {
                continue;
            }
            summaries.push(PasteSummary::from(&paste));
            if summaries.len() >= limit {
                break;
            }
        }
        Ok(summaries)
    }

    /// Number of stored pastes, expired ones included.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn len(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        Ok(pastes.len()?)
    }

    /// Whether the store holds no pastes at all.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }
}

pub(crate) fn deserialize_paste(bytes: &[u8]) -> Result<Paste, bincode::Error> {
    bincode::deserialize(bytes)
}

pub(crate) fn creation_key(created_at: DateTime<Utc>, sequence: u64) -> (u64, u64) {
    // Nanosecond resolution covers 1970..2262; outside that range the
    // timestamp clamps to the nearest end.
    let nanos = match created_at.timestamp_nanos_opt() {
        Some(nanos) => nanos.max(0),
        None if created_at.timestamp() < 0 => 0,
        None => i64::MAX,
    };
    let nanos = u64::try_from(nanos).unwrap_or(0);
    (u64::MAX - nanos, u64::MAX - sequence)
}

#[cfg(test)]
mod tests {
    use super::creation_key;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn creation_key_orders_newest_first() {
        let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let t2 = t1 + Duration::microseconds(1);
        assert!(creation_key(t2, 2) < creation_key(t1, 1));
    }

    #[test]
    fn creation_key_separates_times_within_one_microsecond() {
        let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let t2 = t1 + Duration::nanoseconds(500);
        // The later time wins even against a later insertion of the earlier one.
        assert!(creation_key(t2, 1) < creation_key(t1, 2));
    }

    #[test]
    fn creation_key_breaks_ties_by_latest_insertion() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(creation_key(t, 8) < creation_key(t, 7));
    }

    #[test]
    fn creation_key_clamps_pre_epoch_times() {
        let before_epoch = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(creation_key(before_epoch, 1).0, u64::MAX);
    }

    #[test]
    fn creation_key_clamps_times_past_nanosecond_range() {
        let far_future = Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap();
        let key = creation_key(far_future, 1).0;
        assert_eq!(key, u64::MAX - i64::MAX as u64);
        let latest_in_range = Utc.with_ymd_and_hms(2262, 1, 1, 0, 0, 0).unwrap();
        assert!(key < creation_key(latest_in_range, 1).0);
    }
}
