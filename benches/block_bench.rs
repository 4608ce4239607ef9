//! Benchmarks for EmberKV block and memtable operations

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use emberkv::{Block, BlockBuilder, ImmutableMemTable, MemTable};

fn keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key{:06}", i)).collect()
}

fn full_block() -> Block {
    let mut builder = BlockBuilder::new(4096);
    for key in keys(1000) {
        if !builder.add(key.as_bytes(), Some(b"value-value-value".as_slice())) {
            break;
        }
    }
    builder.build().expect("block has records")
}

fn block_benchmarks(c: &mut Criterion) {
    c.bench_function("block_build_4k", |b| {
        let keys = keys(1000);
        b.iter(|| {
            let mut builder = BlockBuilder::new(4096);
            for key in &keys {
                if !builder.add(key.as_bytes(), Some(b"value-value-value".as_slice())) {
                    break;
                }
            }
            black_box(builder.build().expect("block has records"))
        })
    });

    let encoded = full_block().encode();
    c.bench_function("block_decode_4k", |b| {
        b.iter(|| black_box(Block::decode(encoded.clone()).expect("valid block")))
    });

    let block = full_block();
    c.bench_function("block_seek", |b| {
        b.iter(|| black_box(block.iter_from(black_box(b"key000100")).next()))
    });
}

fn memtable_benchmarks(c: &mut Criterion) {
    c.bench_function("memtable_put_10k", |b| {
        let keys = keys(10_000);
        b.iter_batched(
            MemTable::new,
            |memtable| {
                for key in &keys {
                    memtable.put(key.clone(), "value");
                }
                memtable
            },
            BatchSize::SmallInput,
        )
    });

    let memtable = MemTable::new();
    for key in keys(100_000) {
        memtable.put(key, "value");
    }
    c.bench_function("memtable_freeze_100k", |b| {
        b.iter(|| black_box(ImmutableMemTable::new(&memtable, 1)))
    });
}

criterion_group!(benches, block_benchmarks, memtable_benchmarks);
criterion_main!(benches);
