//! Block Module
//!
//! Size-bounded, sorted run of encoded records: the unit of on-disk storage.
//!
//! ## Block Format (big-endian throughout)
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Data (variable)                                         │
//! │   [KeyLen: u16][Key][ValLen: u32][Value]                │
//! │   ... repeated for each record, ascending key order ... │
//! │   (ValLen = u32::MAX means tombstone, no value bytes)   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Offsets: [Offset: u16] × N                              │
//! ├─────────────────────────────────────────────────────────┤
//! │ OffsetCount: u16 (2)                                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The trailing count lets a reader find the offset array without a header.
//! Binary search over the offsets gives O(log n) seeks.

mod builder;
mod iterator;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::entry::{Entry, KeyValueDeletable};
use crate::error::{EmberError, Result};

pub use builder::BlockBuilder;
pub use iterator::BlockIterator;

// =============================================================================
// Shared Constants (used by builder, iterator, decode)
// =============================================================================

pub(crate) const SIZE_OF_U16: usize = 2;
pub(crate) const SIZE_OF_U32: usize = 4;

/// Value length sentinel marking a tombstone
pub const TOMBSTONE_MARKER: u32 = u32::MAX;

// =============================================================================
// Block
// =============================================================================

/// Immutable, binary-encoded block of records with an offset index.
///
/// Keys are in ascending order; the builder's callers enforce that, the block
/// does not check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Concatenated encoded records
    data: Bytes,
    /// Start of each record within `data`, one per record
    offsets: Vec<u16>,
}

impl Block {
    /// Serialize to `[data][offsets][offset count]`
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(
            self.data.len() + self.offsets.len() * SIZE_OF_U16 + SIZE_OF_U16,
        );
        buf.put_slice(&self.data);
        for offset in &self.offsets {
            buf.put_u16(*offset);
        }
        buf.put_u16(self.offsets.len() as u16);
        buf.freeze()
    }

    /// Parse bytes produced by [`Block::encode`].
    ///
    /// The data section of the result is a zero-copy slice of `bytes`.
    /// Every offset is checked to point at a record that fits inside the
    /// data section, so iterating a decoded block cannot read out of bounds.
    pub fn decode(bytes: impl Into<Bytes>) -> Result<Self> {
        let bytes = bytes.into();

        if bytes.len() < SIZE_OF_U16 {
            return Err(corrupt(format!(
                "{} bytes is shorter than the offset count trailer",
                bytes.len()
            )));
        }

        let count_pos = bytes.len() - SIZE_OF_U16;
        let offset_count = (&bytes[count_pos..]).get_u16() as usize;
        let offsets_len = offset_count * SIZE_OF_U16;

        if offsets_len > count_pos {
            return Err(corrupt(format!(
                "{} offsets do not fit in {} bytes",
                offset_count, count_pos
            )));
        }

        let data_end = count_pos - offsets_len;
        let mut offset_bytes = &bytes[data_end..count_pos];
        let mut offsets = Vec::with_capacity(offset_count);
        for _ in 0..offset_count {
            offsets.push(offset_bytes.get_u16());
        }

        let data = bytes.slice(..data_end);
        validate_records(&data, &offsets)?;

        Ok(Self { data, offsets })
    }

    /// Number of records (tombstones included)
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Raw record bytes
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Record start positions within [`Block::data`]
    pub fn offsets(&self) -> &[u16] {
        &self.offsets
    }

    /// Smallest key in the block, used by an SSTable index
    pub fn first_key(&self) -> Option<Bytes> {
        self.offsets
            .first()
            .map(|&offset| self.decode_record(offset).key)
    }

    /// Iterate from the first record
    pub fn iter(&self) -> BlockIterator<'_> {
        BlockIterator::new(self)
    }

    /// Iterate from the first record whose key is `>= key`
    pub fn iter_from(&self, key: &[u8]) -> BlockIterator<'_> {
        BlockIterator::from_key(self, key)
    }

    /// Key of the record starting at `offset`
    pub(crate) fn key_at(&self, offset: u16) -> &[u8] {
        let start = offset as usize;
        let mut header = &self.data[start..];
        let key_len = header.get_u16() as usize;
        let key_start = start + SIZE_OF_U16;
        &self.data[key_start..key_start + key_len]
    }

    /// Decode the full record starting at `offset`
    pub(crate) fn decode_record(&self, offset: u16) -> KeyValueDeletable {
        let mut pos = offset as usize;

        let key_len = (&self.data[pos..]).get_u16() as usize;
        pos += SIZE_OF_U16;
        let key = self.data.slice(pos..pos + key_len);
        pos += key_len;

        let value_len = (&self.data[pos..]).get_u32();
        pos += SIZE_OF_U32;

        let entry = if value_len == TOMBSTONE_MARKER {
            Entry::Tombstone
        } else {
            Entry::Value(self.data.slice(pos..pos + value_len as usize))
        };

        KeyValueDeletable { key, entry }
    }
}

// =============================================================================
// Decode Validation
// =============================================================================

fn corrupt(msg: String) -> EmberError {
    tracing::warn!(reason = %msg, "rejecting corrupt block");
    EmberError::CorruptBlock(msg)
}

fn validate_records(data: &[u8], offsets: &[u16]) -> Result<()> {
    let mut previous: Option<u16> = None;

    for (index, &offset) in offsets.iter().enumerate() {
        if previous.is_some_and(|p| offset <= p) {
            return Err(corrupt(format!(
                "offset {} at index {} is not increasing",
                offset, index
            )));
        }
        previous = Some(offset);

        if record_end(data, offset as usize).is_none() {
            return Err(corrupt(format!(
                "record at offset {} overruns {} data bytes",
                offset,
                data.len()
            )));
        }
    }

    Ok(())
}

/// End position of the record at `start`, `None` if it does not fit
fn record_end(data: &[u8], start: usize) -> Option<usize> {
    let key_start = start.checked_add(SIZE_OF_U16)?;
    let mut key_len_bytes = data.get(start..key_start)?;
    let key_len = key_len_bytes.get_u16() as usize;

    let value_len_start = key_start + key_len;
    let value_start = value_len_start + SIZE_OF_U32;
    let mut value_len_bytes = data.get(value_len_start..value_start)?;
    let value_len = value_len_bytes.get_u32();

    let end = if value_len == TOMBSTONE_MARKER {
        value_start
    } else {
        value_start.checked_add(value_len as usize)?
    };

    (end <= data.len()).then_some(end)
}
