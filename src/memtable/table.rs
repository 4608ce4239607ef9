//! MemTable implementation
//!
//! Persistent-tree memtable behind a RwLock. Readers grab an O(1) snapshot
//! of the tree and release the lock before walking it.

use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use parking_lot::RwLock;

use crate::entry::{Entry, KeyValue, KeyValueDeletable};

use super::tree::{PersistentTree, TreeIter};

/// In-memory table for recent writes
///
/// ## Concurrency:
/// - `tree`: RwLock held only for a lookup, an insert, or a snapshot copy
/// - `size`: updated under the tree's write lock, read lock-free
/// - One writer at a time is assumed; concurrent writers are serialized by
///   the lock but their relative order is up to the caller
#[derive(Debug)]
pub struct MemTable {
    /// key → value or tombstone
    tree: RwLock<PersistentTree>,

    /// Accounted bytes of keys + live values
    size: AtomicUsize,

    /// Most recent WAL record whose effects are in this table
    last_wal_id: RwLock<Option<u64>>,
}

impl MemTable {
    /// Create a new empty MemTable
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(PersistentTree::new()),
            size: AtomicUsize::new(0),
            last_wal_id: RwLock::new(None),
        }
    }

    /// Insert or overwrite a value.
    ///
    /// Returns the change in accounted size: `key + value` for a new key,
    /// `new value - old value` for an overwrite (the key is already counted).
    pub fn put(&self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> i64 {
        let key = key.into();
        let value = value.into();
        let new_key_len = key.len() as i64;
        let value_len = value.len() as i64;

        let mut tree = self.tree.write();
        let delta = match tree.insert(key, Entry::Value(value)) {
            None => new_key_len + value_len,
            Some(old) => value_len - old.value_len() as i64,
        };
        self.apply_delta(delta);
        delta
    }

    /// Record a tombstone for `key`.
    ///
    /// The key stays in the table so lookups report it as deleted. Returns
    /// the change in accounted size: `key` for a new key, minus the old value
    /// for an existing one.
    pub fn delete(&self, key: impl Into<Bytes>) -> i64 {
        let key = key.into();
        let new_key_len = key.len() as i64;

        let mut tree = self.tree.write();
        let delta = match tree.insert(key, Entry::Tombstone) {
            None => new_key_len,
            Some(old) => -(old.value_len() as i64),
        };
        self.apply_delta(delta);
        delta
    }

    /// Look up a key.
    ///
    /// - `None` — never written
    /// - `Some(Entry::Tombstone)` — deleted
    /// - `Some(Entry::Value(_))` — live
    pub fn get(&self, key: &[u8]) -> Option<Entry> {
        self.tree.read().get(key).cloned()
    }

    /// Accounted size in bytes (keys + live values)
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    /// Number of keys, tombstones included
    pub fn entry_count(&self) -> usize {
        self.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Check if should flush (size >= limit)
    pub fn should_flush(&self, size_limit: usize) -> bool {
        self.size() >= size_limit
    }

    /// Record the WAL id whose effects this table now contains
    pub fn set_last_wal_id(&self, wal_id: u64) {
        tracing::trace!(wal_id, "memtable wal watermark updated");
        *self.last_wal_id.write() = Some(wal_id);
    }

    pub fn last_wal_id(&self) -> Option<u64> {
        *self.last_wal_id.read()
    }

    /// Live pairs in ascending key order
    pub fn iter(&self) -> MemTableIterator {
        MemTableIterator::new(self.snapshot().range_from(None))
    }

    /// Live pairs starting at the first key `>= key`
    pub fn range_from(&self, key: &[u8]) -> MemTableIterator {
        MemTableIterator::new(self.snapshot().range_from(Some(key)))
    }

    /// All records in key order, tombstones included (flush path)
    pub fn entries(&self) -> impl Iterator<Item = KeyValueDeletable> {
        self.snapshot().range_from(None)
    }

    /// Records starting at the first key `>= key`, tombstones included
    pub fn entries_from(&self, key: &[u8]) -> impl Iterator<Item = KeyValueDeletable> {
        self.snapshot().range_from(Some(key))
    }

    fn snapshot(&self) -> PersistentTree {
        self.tree.read().clone()
    }

    /// Caller holds the tree's write lock
    fn apply_delta(&self, delta: i64) {
        if delta >= 0 {
            self.size.fetch_add(delta as usize, Ordering::AcqRel);
        } else {
            self.size
                .fetch_sub(delta.unsigned_abs() as usize, Ordering::AcqRel);
        }
    }
}

impl Default for MemTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemTable {
    /// O(1): shares the tree's nodes; later writes on either side copy
    /// their own paths.
    fn clone(&self) -> Self {
        let tree = self.tree.read();
        Self {
            tree: RwLock::new(tree.clone()),
            size: AtomicUsize::new(self.size()),
            last_wal_id: RwLock::new(self.last_wal_id()),
        }
    }
}

/// Iterator over a MemTable snapshot taken at construction
///
/// `next` yields live pairs only; `next_entry` also yields tombstones.
pub struct MemTableIterator {
    inner: TreeIter,
}

impl MemTableIterator {
    fn new(inner: TreeIter) -> Self {
        Self { inner }
    }

    /// Next record, tombstones included
    pub fn next_entry(&mut self) -> Option<KeyValueDeletable> {
        self.inner.next()
    }
}

impl Iterator for MemTableIterator {
    type Item = KeyValue;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(kv) = self.next_entry()?.into_live() {
                return Some(kv);
            }
        }
    }
}
