//! Record types shared by blocks and memtables.

use bytes::Bytes;

/// Value stored for a key: either live bytes or a deletion marker.
///
/// A tombstone is not the same as a missing key. Lookups return
/// `Option<Entry>` so "never written" (`None`) and "deleted"
/// (`Some(Entry::Tombstone)`) stay distinguishable, which merging readers
/// need to shadow older values in lower layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A live value
    Value(Bytes),

    /// A tombstone (deleted key)
    Tombstone,
}

impl Entry {
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Entry::Tombstone)
    }

    /// Live value bytes, `None` for a tombstone
    pub fn value(&self) -> Option<&Bytes> {
        match self {
            Entry::Value(v) => Some(v),
            Entry::Tombstone => None,
        }
    }

    /// Bytes charged against a table's size (0 for a tombstone)
    pub fn value_len(&self) -> usize {
        self.value().map_or(0, |v| v.len())
    }
}

impl From<Option<Bytes>> for Entry {
    fn from(value: Option<Bytes>) -> Self {
        match value {
            Some(v) => Entry::Value(v),
            None => Entry::Tombstone,
        }
    }
}

/// A live key/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Bytes,
    pub value: Bytes,
}

/// A key paired with its value or tombstone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueDeletable {
    pub key: Bytes,
    pub entry: Entry,
}

impl KeyValueDeletable {
    /// Drop tombstones, keep live pairs
    pub fn into_live(self) -> Option<KeyValue> {
        match self.entry {
            Entry::Value(value) => Some(KeyValue { key: self.key, value }),
            Entry::Tombstone => None,
        }
    }
}
