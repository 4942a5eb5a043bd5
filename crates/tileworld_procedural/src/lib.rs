//! # TILEWORLD Procedural Generation
//!
//! Deterministic terrain for an infinite, reproducible tile world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: the same seed pair always produces the same world
//! 2. **Chunked**: the world is generated in 32x32-tile chunks
//! 3. **Seamless**: all sampling uses global tile coordinates
//! 4. **Pure**: no I/O; persistence lives in `tileworld_world`
//!
//! ## Core Components
//!
//! - `SimplexNoise`: seeded 2D noise and weighted octave sums
//! - `BiomeClassifier`: elevation/moisture to ground tile
//! - `FeatureClassifier`: cave mouths, trees, tall grass, stone ore
//! - `WorldGenerator`: produces a chunk's tiles and feature placement
//!
//! ## Example
//!
//! ```rust
//! use tileworld_procedural::{ChunkCoord, Dimension, SeedPair, TileKind, WorldGenerator};
//!
//! let generator = WorldGenerator::new(SeedPair::new(1, 1));
//! let chunk = generator.generate(ChunkCoord::new(0, 0), Dimension::Overworld);
//!
//! // Overworld generation never emits the out-of-window void tile
//! assert_ne!(chunk.tiles.get(0, 0).kind, TileKind::Air);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod chunk;
pub mod feature;
pub mod generator;
pub mod noise;
pub mod tile;

pub use biome::{classify_from_climate, BiomeClassifier, Climate};
pub use chunk::{BlockPos, ChunkCoord, Dimension, TileGrid, CHUNK_SIZE, TILES_PER_CHUNK, TILE_SIZE};
pub use feature::{Feature, FeatureClassifier};
pub use generator::{FeaturePlacement, GeneratedChunk, SeedPair, WorldGenerator};
pub use noise::{Octave, SimplexNoise};
pub use tile::{Tile, TileKind, DEFAULT_BRIGHTNESS, LOWEST_BRIGHTNESS};
