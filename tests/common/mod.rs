//! Shared test helpers

#![allow(dead_code)]

use bytes::Bytes;
use emberkv::{Block, BlockBuilder, KeyValue};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; honours RUST_LOG (e.g. `emberkv=trace`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn kv(key: &'static str, value: &'static str) -> KeyValue {
    KeyValue {
        key: Bytes::from_static(key.as_bytes()),
        value: Bytes::from_static(value.as_bytes()),
    }
}

/// Build a block from sorted live pairs
pub fn build_block(pairs: &[(&str, &str)], block_size: usize) -> Block {
    let mut builder = BlockBuilder::new(block_size);
    for (key, value) in pairs {
        assert!(builder.add(key.as_bytes(), Some(value.as_bytes())));
    }
    builder.build().unwrap()
}
