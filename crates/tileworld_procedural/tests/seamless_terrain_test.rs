//! # Seamless Terrain Integration Test
//!
//! Proves independently generated chunks agree on every shared coordinate
//! and that regeneration is bit-identical.

use tileworld_procedural::{
    BlockPos, ChunkCoord, Dimension, Feature, SeedPair, TileKind, WorldGenerator, CHUNK_SIZE,
};

fn block_in(coord: ChunkCoord, x: usize, y: usize) -> BlockPos {
    let origin = coord.origin();
    BlockPos::new(origin.x + x as i32, origin.y + y as i32)
}

/// Test: chunk (5,5) generated twice with the same seeds is identical.
#[test]
fn test_chunk_5_5_regenerates_identically() {
    let seeds = SeedPair::new(1, 1);
    let first = WorldGenerator::new(seeds).generate(ChunkCoord::new(5, 5), Dimension::Overworld);
    let second = WorldGenerator::new(seeds).generate(ChunkCoord::new(5, 5), Dimension::Overworld);

    assert_eq!(first.tiles, second.tiles, "Tile grids differ between runs");
    assert_eq!(first.features, second.features, "Feature placement differs between runs");
}

/// Test: every tile of a 3x3 block of chunks matches the global sampler,
/// in both dimensions, including negative coordinates.
#[test]
fn test_neighbouring_chunks_share_one_field() {
    let generator = WorldGenerator::new(SeedPair::new(-4021, 77));

    for dimension in [Dimension::Overworld, Dimension::Cave] {
        for cy in -1..=1 {
            for cx in -1..=1 {
                let coord = ChunkCoord::new(cx, cy);
                let chunk = generator.generate(coord, dimension);
                for y in 0..CHUNK_SIZE {
                    for x in 0..CHUNK_SIZE {
                        let block = block_in(coord, x, y);
                        assert_eq!(
                            chunk.tiles.get(x, y).kind,
                            generator.tile_at(block, dimension),
                            "Seam at {block:?} in {dimension}"
                        );
                    }
                }
            }
        }
    }
}

/// Test: the grass rule looks across chunk borders. The north neighbour of
/// row 0 lives in the chunk above, and the decision must not depend on which
/// chunk asked.
#[test]
fn test_grass_rule_crosses_chunk_border() {
    let generator = WorldGenerator::new(SeedPair::new(1, 1));

    for cx in -3..3 {
        let below = ChunkCoord::new(cx, 0);
        let above = ChunkCoord::new(cx, -1);
        let below_chunk = generator.generate(below, Dimension::Overworld);
        let above_chunk = generator.generate(above, Dimension::Overworld);

        for x in 0..CHUNK_SIZE {
            if below_chunk.features.get(x, 0) == Some(Feature::TallGrass) {
                assert_ne!(
                    above_chunk.features.get(x, CHUNK_SIZE - 1),
                    Some(Feature::Tree),
                    "Grass at row 0 of {below} sits under a tree"
                );
            }
        }
    }
}

/// Test: a wide overworld sample uses many of the ground tiles.
#[test]
fn test_overworld_variety() {
    let generator = WorldGenerator::new(SeedPair::new(1, 1));
    let mut seen = std::collections::HashSet::new();

    for y in (-4000..4000).step_by(97) {
        for x in (-4000..4000).step_by(89) {
            seen.insert(generator.tile_at(BlockPos::new(x, y), Dimension::Overworld));
        }
    }

    assert!(!seen.contains(&TileKind::Air));
    assert!(seen.len() >= 5, "Expected varied terrain, found {seen:?}");
}

/// Test: first-visit chunks carry a plausible amount of vegetation.
#[test]
fn test_features_are_sparse() {
    let generator = WorldGenerator::new(SeedPair::new(1, 1));
    let chunk = generator.generate(ChunkCoord::new(0, 0), Dimension::Overworld);

    let count = chunk.features.count();
    println!("Chunk (0,0) has {count} features");
    assert!(count < CHUNK_SIZE * CHUNK_SIZE, "Every tile got a feature");
}
