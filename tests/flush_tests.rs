//! Flush Tests
//!
//! Tests verify the write path end to end:
//! memtable → freeze → blocks → encode → decode → seek.

mod common;

use common::{init_tracing, kv};
use emberkv::block::BlockBuilder;
use emberkv::flush::build_blocks;
use emberkv::{Block, Config, ImmutableMemTable, KeyValue, MemTable};

// =============================================================================
// Flush Tests
// =============================================================================

#[test]
fn test_flush_empty_table_yields_no_blocks() {
    let imm = ImmutableMemTable::new(&MemTable::new(), 1);
    assert!(build_blocks(&imm, 4096).unwrap().is_empty());
}

#[test]
fn test_flush_single_block() {
    init_tracing();

    let memtable = MemTable::new();
    memtable.put("super", "mario");
    memtable.put("donkey", "kong");
    memtable.put("kratos", "atreus");
    let imm = ImmutableMemTable::new(&memtable, 1);

    let blocks = build_blocks(&imm, 1024).unwrap();
    assert_eq!(blocks.len(), 1);

    let block = Block::decode(blocks[0].encode()).unwrap();
    assert_eq!(
        block.iter_from(b"kratos").collect::<Vec<_>>(),
        vec![kv("kratos", "atreus"), kv("super", "mario")]
    );
}

#[test]
fn test_flush_splits_on_budget_and_keeps_tombstones() {
    init_tracing();

    let memtable = MemTable::new();
    for i in 0..500 {
        memtable.put(format!("key{:04}", i), format!("value{:04}", i));
    }
    for i in (0..500).step_by(7) {
        memtable.delete(format!("key{:04}", i));
    }
    memtable.set_last_wal_id(99);
    let imm = ImmutableMemTable::new(&memtable, 99);

    let blocks = build_blocks(&imm, 256).unwrap();
    assert!(blocks.len() > 1);

    let mut records = 0;
    let mut live: Vec<KeyValue> = Vec::new();
    let mut last_key = None;

    for block in &blocks {
        let encoded = block.encode();
        assert!(encoded.len() <= 256);

        let decoded = Block::decode(encoded).unwrap();
        let mut iter = decoded.iter();
        while let Some(entry) = iter.next_entry() {
            // blocks are contiguous and sorted across the whole flush
            assert!(last_key.as_ref().map_or(true, |k| *k < entry.key));
            last_key = Some(entry.key.clone());
            records += 1;
            if let Some(kv) = entry.into_live() {
                live.push(kv);
            }
        }
    }

    assert_eq!(records, 500);
    assert_eq!(live, imm.iter().collect::<Vec<_>>());
}

#[test]
fn test_flush_oversized_record_gets_own_block() {
    let memtable = MemTable::new();
    memtable.put("a", "1");
    memtable.put("b", "x".repeat(1000));
    memtable.put("c", "3");
    let imm = ImmutableMemTable::new(&memtable, 1);

    let blocks = build_blocks(&imm, 64).unwrap();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[1].len(), 1);
    assert_eq!(blocks[1].first_key().unwrap(), "b");
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.block_size, 4096);
    assert_eq!(config.memtable_size_limit, 64 * 1024 * 1024);
}

#[test]
fn test_config_builder_drives_write_path() {
    let config = Config::builder()
        .block_size(40)
        .memtable_size_limit(20)
        .build();

    let memtable = MemTable::new();
    memtable.put("k1", "v1");
    assert!(!memtable.should_flush(config.memtable_size_limit));
    for i in 2..=5 {
        memtable.put(format!("k{}", i), format!("v{}", i));
    }
    assert!(memtable.should_flush(config.memtable_size_limit));

    let mut builder: BlockBuilder = config.block_builder();
    let accepted = memtable
        .iter()
        .take_while(|kv| builder.add(&kv.key, Some(&kv.value[..])))
        .count();
    assert_eq!(accepted, 3);

    let imm = ImmutableMemTable::new(&memtable, 1);
    assert_eq!(build_blocks(&imm, config.block_size).unwrap().len(), 2);
}
