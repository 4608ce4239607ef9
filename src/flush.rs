//! Flush Module
//!
//! Turns a frozen memtable into encoded-ready blocks.
//!
//! ## Flow
//! ```text
//! ImmutableMemTable::entries()  (sorted, tombstones included)
//!          │
//!          ▼
//!   BlockBuilder::add ── false ──► build(), start a new builder
//!          │
//!          ▼
//!      Vec<Block>
//! ```
//!
//! Persisting the blocks (and the SSTable index over them) is up to the
//! caller.

use crate::block::{Block, BlockBuilder};
use crate::error::{EmberError, Result};
use crate::memtable::ImmutableMemTable;

/// Split `table` into blocks of at most `block_size` bytes each.
///
/// A record bigger than `block_size` gets a block of its own. An empty
/// table yields no blocks.
pub fn build_blocks(table: &ImmutableMemTable, block_size: usize) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut builder = BlockBuilder::new(block_size);
    let mut entries = 0usize;

    for kv in table.entries() {
        let value = kv.entry.value().map(|v| &v[..]);
        if !builder.add(&kv.key, value) {
            let full = std::mem::replace(&mut builder, BlockBuilder::new(block_size));
            blocks.push(full.build()?);
            // a fresh builder always takes its first record
            let added = builder.add(&kv.key, value);
            debug_assert!(added);
        }
        entries += 1;
    }

    match builder.build() {
        Ok(block) => blocks.push(block),
        Err(EmberError::EmptyBlock) => {}
        Err(e) => return Err(e),
    }

    tracing::debug!(
        wal_id = table.last_wal_id(),
        blocks = blocks.len(),
        entries,
        "flushed memtable into blocks"
    );
    Ok(blocks)
}
