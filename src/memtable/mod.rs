//! MemTable Module
//!
//! In-memory data structure for recent writes.
//!
//! ## Responsibilities
//! - Fast reads and writes in memory
//! - Single-writer/multi-reader access pattern
//! - Track size for flush triggers
//! - Track the WAL watermark for segment reclamation
//! - Ordered iteration for block creation
//!
//! ## Data Structure Choice
//! A persistent AVL tree wrapped in RwLock:
//! - Ordered keys (required for block generation)
//! - Clone is a root pointer copy, so freezing never pauses the writer for
//!   a full copy
//! - Iterators walk a snapshot and never see a half-applied write

mod immutable;
mod table;
mod tree;

pub use immutable::ImmutableMemTable;
pub use table::{MemTable, MemTableIterator};
