//! # EmberKV
//!
//! Write path and block codec of an LSM key-value storage engine:
//! - Size-bounded, big-endian block format with an offset index
//! - Seekable block iteration (binary search over offsets)
//! - Memtable with tombstones, size accounting, and WAL watermark
//! - O(1) freeze into an immutable memtable for background flush
//!
//! ## Architecture Overview
//!
//! ```text
//!   put / delete
//!        │
//! ┌──────▼──────┐   freeze (O(1) clone)   ┌──────────────────────┐
//! │  MemTable   ├────────────────────────►│  ImmutableMemTable   │
//! │  (RwLock)   │                         │  (wal watermark)     │
//! └─────────────┘                         └──────────┬───────────┘
//!                                                    │ flush
//!                                         ┌──────────▼───────────┐
//!                                         │ BlockBuilder → Block │
//!                                         │   encode / decode    │
//!                                         └──────────┬───────────┘
//!                                                    │ read path
//!                                         ┌──────────▼───────────┐
//!                                         │    BlockIterator     │
//!                                         └──────────────────────┘
//! ```
//!
//! Persistence, the WAL writer, SSTable indexes, and compaction live
//! outside this crate.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod entry;
pub mod block;
pub mod memtable;
pub mod flush;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{EmberError, Result};
pub use config::Config;
pub use entry::{Entry, KeyValue, KeyValueDeletable};
pub use block::{Block, BlockBuilder, BlockIterator};
pub use memtable::{ImmutableMemTable, MemTable, MemTableIterator};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of EmberKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
