//! Error types for EmberKV
//!
//! Recoverable failures only. Contract violations (an empty key handed to
//! `BlockBuilder::add`, an oversized key) panic instead of returning here.

use thiserror::Error;

/// Result type alias using EmberError
pub type Result<T> = std::result::Result<T, EmberError>;

/// Unified error type for EmberKV operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmberError {
    // -------------------------------------------------------------------------
    // Block Errors
    // -------------------------------------------------------------------------
    /// `build()` was called before any record was accepted
    #[error("Block is empty")]
    EmptyBlock,

    /// Bytes handed to `Block::decode` are not a well-formed block
    #[error("Corrupt block: {0}")]
    CorruptBlock(String),
}
