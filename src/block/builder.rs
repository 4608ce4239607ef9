//! Block Builder
//!
//! Accumulates sorted records into a block under a byte budget.

use bytes::{BufMut, BytesMut};

use crate::error::{EmberError, Result};

use super::{Block, SIZE_OF_U16, SIZE_OF_U32, TOMBSTONE_MARKER};

/// Builder for a single [`Block`]
///
/// Records must be added in ascending key order. Once `add` returns false
/// the block is full: build it and start a new builder for the rejected
/// record.
pub struct BlockBuilder {
    /// Encoded records so far
    data: BytesMut,
    /// Start of each record within `data`
    offsets: Vec<u16>,
    /// Target encoded size in bytes
    block_size: usize,
}

impl BlockBuilder {
    /// Create a builder with a target block size
    pub fn new(block_size: usize) -> Self {
        Self {
            data: BytesMut::new(),
            offsets: Vec::new(),
            block_size,
        }
    }

    /// Add a record; `None` writes a tombstone.
    ///
    /// Returns false without touching the builder when the record would push
    /// the encoded size past `block_size`. The first record is always
    /// accepted so an oversized record still gets a block of its own.
    ///
    /// # Panics
    /// If `key` is empty or longer than `u16::MAX`, or the value length
    /// collides with the tombstone marker.
    pub fn add(&mut self, key: &[u8], value: Option<&[u8]>) -> bool {
        assert!(!key.is_empty(), "key must not be empty");
        assert!(
            key.len() <= u16::MAX as usize,
            "key length {} exceeds u16::MAX",
            key.len()
        );

        let value_len = value.map_or(0, <[u8]>::len);
        check_value_len(value_len);

        // offset + key_len + key + val_len + value
        let new_size =
            self.estimated_size() + SIZE_OF_U16 * 2 + key.len() + SIZE_OF_U32 + value_len;

        if !self.is_empty()
            && (new_size > self.block_size || self.data.len() > u16::MAX as usize)
        {
            return false;
        }

        self.offsets.push(self.data.len() as u16);

        self.data.put_u16(key.len() as u16);
        self.data.put_slice(key);
        match value {
            Some(v) => {
                self.data.put_u32(v.len() as u32);
                self.data.put_slice(v);
            }
            None => self.data.put_u32(TOMBSTONE_MARKER),
        }

        true
    }

    /// Finish the block.
    ///
    /// Fails with [`EmberError::EmptyBlock`] if no record was accepted.
    pub fn build(self) -> Result<Block> {
        if self.is_empty() {
            return Err(EmberError::EmptyBlock);
        }

        let block = Block {
            data: self.data.freeze(),
            offsets: self.offsets,
        };
        tracing::trace!(
            entries = block.len(),
            encoded_size = block.data.len() + block.len() * SIZE_OF_U16 + SIZE_OF_U16,
            "built block"
        );
        Ok(block)
    }

    /// Encoded size of the block if built now (count + offsets + data)
    pub fn estimated_size(&self) -> usize {
        SIZE_OF_U16 + self.offsets.len() * SIZE_OF_U16 + self.data.len()
    }

    /// Number of accepted records
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// A value length must fit in a u32 and stay below the tombstone marker
fn check_value_len(value_len: usize) {
    assert!(
        value_len < TOMBSTONE_MARKER as usize,
        "value length {} collides with the tombstone marker",
        value_len
    );
}
