//! # World Generator
//!
//! Produces the tile grid and feature placement of a chunk from the seed
//! pair alone. Generation is a pure function of
//! `(seed pair, chunk coordinate, dimension)`; every noise call uses global
//! tile coordinates, so neighbouring chunks line up without seams.

use crate::biome::{classify_cave, BiomeClassifier};
use crate::chunk::{BlockPos, ChunkCoord, Dimension, TileGrid, CHUNK_SIZE};
use crate::feature::{Feature, FeatureClassifier};
use crate::noise::SimplexNoise;
use crate::tile::{Tile, TileKind};

/// The two seeds that fully determine a world's terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SeedPair {
    /// Seed of the elevation channel.
    pub elevation: i32,
    /// Seed of the moisture channel.
    pub moisture: i32,
}

impl SeedPair {
    /// Creates a seed pair.
    #[inline]
    #[must_use]
    pub const fn new(elevation: i32, moisture: i32) -> Self {
        Self { elevation, moisture }
    }
}

/// Per-tile feature decisions for one chunk, indexed `[y][x]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeaturePlacement {
    cells: Box<[[Option<Feature>; CHUNK_SIZE]; CHUNK_SIZE]>,
}

impl FeaturePlacement {
    fn empty() -> Self {
        Self {
            cells: Box::new([[None; CHUNK_SIZE]; CHUNK_SIZE]),
        }
    }

    /// Feature at local coordinates, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Feature> {
        self.cells.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    /// Iterates over placed features as `(local_x, local_y, feature)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Feature)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.map(|feature| (x, y, feature)))
        })
    }

    /// Number of placed features.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

/// Output of [`WorldGenerator::generate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedChunk {
    /// Chunk that was generated.
    pub coord: ChunkCoord,
    /// Dimension that was generated.
    pub dimension: Dimension,
    /// Ground tiles.
    pub tiles: TileGrid,
    /// Features that spawn on a first visit.
    pub features: FeaturePlacement,
}

/// Deterministic chunk generator for both dimensions.
#[derive(Clone, Debug)]
pub struct WorldGenerator {
    seeds: SeedPair,
    biomes: BiomeClassifier,
    features: FeatureClassifier,
    cave_floor: SimplexNoise,
}

impl WorldGenerator {
    /// Creates a generator for a seed pair.
    #[must_use]
    pub fn new(seeds: SeedPair) -> Self {
        Self {
            seeds,
            biomes: BiomeClassifier::new(seeds.elevation, seeds.moisture),
            features: FeatureClassifier::new(seeds.elevation, seeds.moisture),
            cave_floor: SimplexNoise::new(seeds.elevation),
        }
    }

    /// Seed pair this generator was built from.
    #[inline]
    #[must_use]
    pub const fn seeds(&self) -> SeedPair {
        self.seeds
    }

    /// Generates the tiles and feature placement of a chunk.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord, dimension: Dimension) -> GeneratedChunk {
        let mut tiles = TileGrid::filled(TileKind::Air);
        let mut features = FeaturePlacement::empty();
        let origin = coord.origin();

        for local_y in 0..CHUNK_SIZE {
            for local_x in 0..CHUNK_SIZE {
                let block = BlockPos::new(origin.x + local_x as i32, origin.y + local_y as i32);
                let kind = self.tile_at(block, dimension);
                tiles.set(local_x, local_y, Tile::new(kind));
                features.cells[local_y][local_x] = self.feature_for(block, kind, dimension);
            }
        }

        GeneratedChunk {
            coord,
            dimension,
            tiles,
            features,
        }
    }

    /// Tile kind at a global block coordinate.
    #[must_use]
    pub fn tile_at(&self, block: BlockPos, dimension: Dimension) -> TileKind {
        let (x, y) = (f64::from(block.x), f64::from(block.y));
        match dimension {
            Dimension::Overworld => self.biomes.classify(x, y),
            Dimension::Cave => classify_cave(&self.cave_floor, x, y),
        }
    }

    /// Feature that generation places at a global block coordinate.
    #[must_use]
    pub fn feature_at(&self, block: BlockPos, dimension: Dimension) -> Option<Feature> {
        self.feature_for(block, self.tile_at(block, dimension), dimension)
    }

    fn feature_for(&self, block: BlockPos, kind: TileKind, dimension: Dimension) -> Option<Feature> {
        let (x, y) = (f64::from(block.x), f64::from(block.y));
        match dimension {
            Dimension::Overworld => self.features.overworld(kind, x, y, || {
                let north = BlockPos::new(block.x, block.y - 1);
                let north_kind = self.biomes.classify(x, y - 1.0);
                self.features
                    .primary_overworld(north_kind, f64::from(north.x), f64::from(north.y))
                    == Some(Feature::Tree)
            }),
            Dimension::Cave => self.features.cave(kind, x, y),
        }
    }

    /// Renders a square of tile kinds starting at `origin`, indexed `[y][x]`.
    ///
    /// Intended for world previews; not used by streaming.
    #[must_use]
    pub fn preview(&self, origin: BlockPos, size: usize, dimension: Dimension) -> Vec<Vec<TileKind>> {
        (0..size)
            .map(|dy| {
                (0..size)
                    .map(|dx| {
                        let block = BlockPos::new(origin.x + dx as i32, origin.y + dy as i32);
                        self.tile_at(block, dimension)
                    })
                    .collect()
            })
            .collect()
    }
}
