//! Configuration for EmberKV
//!
//! Centralized configuration with sensible defaults.

use crate::block::BlockBuilder;

/// Default block budget: one OS page
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Default memtable flush threshold
pub const DEFAULT_MEMTABLE_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Main configuration for the write path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Block Configuration
    // -------------------------------------------------------------------------
    /// Byte budget for one encoded block (data + offsets + count)
    pub block_size: usize,

    // -------------------------------------------------------------------------
    // MemTable Configuration
    // -------------------------------------------------------------------------
    /// Accounted memtable size (in bytes) at which it should be frozen
    pub memtable_size_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            memtable_size_limit: DEFAULT_MEMTABLE_SIZE_LIMIT,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Start a block builder with the configured budget
    pub fn block_builder(&self) -> BlockBuilder {
        BlockBuilder::new(self.block_size)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the block byte budget
    pub fn block_size(mut self, size: usize) -> Self {
        self.config.block_size = size;
        self
    }

    /// Set the memtable size limit (in bytes)
    pub fn memtable_size_limit(mut self, size: usize) -> Self {
        self.config.memtable_size_limit = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
