//! Frozen memtable awaiting flush.

use crate::entry::{Entry, KeyValueDeletable};

use super::table::{MemTable, MemTableIterator};

/// Read-only snapshot of a [`MemTable`] tagged with its WAL watermark
///
/// Writes to the source memtable after freezing are never visible here.
#[derive(Debug, Clone)]
pub struct ImmutableMemTable {
    table: MemTable,
    last_wal_id: u64,
}

impl ImmutableMemTable {
    /// Freeze `memtable` as of now. O(1) regardless of table size.
    pub fn new(memtable: &MemTable, last_wal_id: u64) -> Self {
        let table = memtable.clone();
        tracing::debug!(
            wal_id = last_wal_id,
            entries = table.entry_count(),
            size = table.size(),
            "froze memtable"
        );
        Self { table, last_wal_id }
    }

    pub fn get(&self, key: &[u8]) -> Option<Entry> {
        self.table.get(key)
    }

    pub fn iter(&self) -> MemTableIterator {
        self.table.iter()
    }

    pub fn range_from(&self, key: &[u8]) -> MemTableIterator {
        self.table.range_from(key)
    }

    /// All records in key order, tombstones included
    pub fn entries(&self) -> impl Iterator<Item = KeyValueDeletable> {
        self.table.entries()
    }

    /// Records starting at the first key `>= key`, tombstones included
    pub fn entries_from(&self, key: &[u8]) -> impl Iterator<Item = KeyValueDeletable> {
        self.table.entries_from(key)
    }

    /// WAL id this snapshot is durable up to once flushed
    pub fn last_wal_id(&self) -> u64 {
        self.last_wal_id
    }

    pub fn size(&self) -> usize {
        self.table.size()
    }

    pub fn entry_count(&self) -> usize {
        self.table.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
