//! Block Iterator
//!
//! Forward, single-pass iteration over a block's records.

use crate::entry::{KeyValue, KeyValueDeletable};

use super::Block;

/// Iterator over block records in key order
///
/// Borrows the block; records are handed out as zero-copy slices of the
/// block's buffer. Re-seeking means building a new iterator.
pub struct BlockIterator<'a> {
    block: &'a Block,
    /// Next record to return; `== block.len()` once exhausted
    offset_index: usize,
}

impl<'a> BlockIterator<'a> {
    /// Start at the first record
    pub fn new(block: &'a Block) -> Self {
        Self {
            block,
            offset_index: 0,
        }
    }

    /// Start at the first record whose key is `>= key`.
    ///
    /// Binary search over the offset array. If every key is smaller the
    /// iterator starts exhausted.
    pub fn from_key(block: &'a Block, key: &[u8]) -> Self {
        let offset_index = block
            .offsets
            .partition_point(|&offset| block.key_at(offset) < key);
        Self {
            block,
            offset_index,
        }
    }

    /// Next record, tombstones included
    pub fn next_entry(&mut self) -> Option<KeyValueDeletable> {
        let offset = *self.block.offsets.get(self.offset_index)?;
        self.offset_index += 1;
        Some(self.block.decode_record(offset))
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset_index >= self.block.offsets.len()
    }
}

impl<'a> Iterator for BlockIterator<'a> {
    /// Live pairs only; tombstones are skipped
    type Item = KeyValue;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(kv) = self.next_entry()?.into_live() {
                return Some(kv);
            }
        }
    }
}
