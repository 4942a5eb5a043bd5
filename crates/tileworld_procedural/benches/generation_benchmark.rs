//! Benchmark for chunk generation throughput.
//!
//! A window shift generates up to three chunks inside one tick, so a single
//! chunk has to stay well under a frame.
//!
//! Run with: cargo bench --package tileworld_procedural --bench generation_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tileworld_procedural::{BlockPos, ChunkCoord, Dimension, SeedPair, WorldGenerator};

fn benchmark_single_chunk(c: &mut Criterion) {
    let generator = WorldGenerator::new(SeedPair::new(1, 1));

    c.bench_function("single_overworld_chunk", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(generator.generate(ChunkCoord::new(coord, coord / 2), Dimension::Overworld))
        });
    });

    c.bench_function("single_cave_chunk", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(generator.generate(ChunkCoord::new(coord, -coord), Dimension::Cave))
        });
    });
}

fn benchmark_window_fill(c: &mut Criterion) {
    let generator = WorldGenerator::new(SeedPair::new(1, 1));

    let mut group = c.benchmark_group("window_fill");
    group.throughput(Throughput::Elements(9));
    group.bench_function("3x3_chunks", |b| {
        b.iter(|| {
            for y in -1..=1 {
                for x in -1..=1 {
                    black_box(generator.generate(ChunkCoord::new(x, y), Dimension::Overworld));
                }
            }
        });
    });
    group.finish();
}

fn benchmark_tile_lookup(c: &mut Criterion) {
    let generator = WorldGenerator::new(SeedPair::new(1, 1));

    c.bench_function("global_tile_at", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x = x.wrapping_add(7);
            black_box(generator.tile_at(BlockPos::new(x, x / 3), Dimension::Overworld))
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_chunk,
    benchmark_window_fill,
    benchmark_tile_lookup
);
criterion_main!(benches);
