//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// Canonical paste rows (`Paste`, bincode-encoded).
pub const PASTES: TableDefinition<&str, &[u8]> = TableDefinition::new("pastes");

/// Creation-order index: `(reverse created nanos, reverse sequence)` -> id.
///
/// Forward iteration yields newest first; pastes with identical timestamps
/// are ordered by insertion, newest first.
pub const PASTES_BY_CREATED: TableDefinition<(u64, u64), &str> =
    TableDefinition::new("pastes_by_created");

/// Monotonic counters (currently only the paste insertion sequence).
pub const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Key in [`COUNTERS`] holding the last assigned insertion sequence.
pub const PASTE_SEQUENCE_KEY: &str = "paste_seq";
