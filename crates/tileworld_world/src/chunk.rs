//! # Chunk Record
//!
//! The in-memory unit of the window: a generated tile grid plus the
//! entities and items currently located in it.
//!
//! A record is created in one of two ways:
//!
//! - **generate**: first visit; feature placement spawns trees, grass,
//!   cave mouths and ore as entities
//! - **restore**: the chunk file exists; tiles are regenerated and the
//!   persisted contents replace feature placement

use tileworld_procedural::{BlockPos, ChunkCoord, Dimension, GeneratedChunk, Tile, TileGrid};

use crate::codec::PersistedContents;
use crate::entity::{Entity, EntityKind};
use crate::item::Item;

/// A resident chunk.
#[derive(Clone, Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    dimension: Dimension,
    /// Ground tiles. Brightness is mutable; kinds never change.
    pub tiles: TileGrid,
    /// Entities owned by this chunk.
    pub entities: Vec<Entity>,
    /// Ground items owned by this chunk.
    pub items: Vec<Item>,
}

impl Chunk {
    /// Builds a first-visit chunk, spawning one entity per placed feature.
    #[must_use]
    pub fn generate(generated: GeneratedChunk) -> Self {
        let origin = generated.coord.origin();
        let entities = generated
            .features
            .iter()
            .map(|(x, y, feature)| {
                let (px, py) = BlockPos::new(origin.x + x as i32, origin.y + y as i32).to_pixel();
                Entity::new(EntityKind::from_feature(feature), px, py)
            })
            .collect();

        Self {
            coord: generated.coord,
            dimension: generated.dimension,
            tiles: generated.tiles,
            entities,
            items: Vec::new(),
        }
    }

    /// Builds a previously visited chunk from regenerated tiles and its
    /// persisted contents. Feature placement is ignored.
    #[must_use]
    pub fn restore(generated: GeneratedChunk, contents: PersistedContents) -> Self {
        Self {
            coord: generated.coord,
            dimension: generated.dimension,
            tiles: generated.tiles,
            entities: contents.entities,
            items: contents.items,
        }
    }

    /// Chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Dimension this chunk belongs to.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Whether `block` is outside this chunk in any direction.
    #[inline]
    #[must_use]
    pub const fn is_out_of_chunk(&self, block: BlockPos) -> bool {
        !self.coord.contains(block)
    }

    /// Tile at a global block coordinate, if it lies in this chunk.
    #[must_use]
    pub fn tile_at(&self, block: BlockPos) -> Option<Tile> {
        if self.is_out_of_chunk(block) {
            return None;
        }
        let (x, y) = block.local();
        Some(self.tiles.get(x, y))
    }

    /// Number of entities that would be written to the chunk file.
    #[must_use]
    pub fn persistent_entity_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_persistent()).count()
    }

    /// Whether an entity of `kind` sits exactly at pixel `(x, y)`.
    #[must_use]
    pub fn has_entity_at(&self, kind: EntityKind, x: i32, y: i32) -> bool {
        self.entities
            .iter()
            .any(|e| e.kind == kind && e.x == x && e.y == y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_procedural::{SeedPair, TileKind, WorldGenerator, TILE_SIZE};

    use crate::item::ItemKind;

    fn generated(coord: ChunkCoord) -> GeneratedChunk {
        WorldGenerator::new(SeedPair::new(1, 1)).generate(coord, Dimension::Overworld)
    }

    #[test]
    fn test_generate_spawns_one_entity_per_feature() {
        let source = generated(ChunkCoord::new(2, -1));
        let feature_count = source.features.count();
        let chunk = Chunk::generate(source);

        assert_eq!(chunk.entities.len(), feature_count);
        for entity in &chunk.entities {
            assert_eq!(entity.x.rem_euclid(TILE_SIZE), 0);
            assert_eq!(entity.y.rem_euclid(TILE_SIZE), 0);
            let origin_block = BlockPos::from_pixel(entity.x, entity.y);
            assert_eq!(origin_block.chunk(), ChunkCoord::new(2, -1));
        }
    }

    #[test]
    fn test_restore_replaces_features() {
        let contents = PersistedContents {
            entities: vec![Entity::with_health(EntityKind::Wolf, 100, 100, 9)],
            items: vec![Item::new(ItemKind::Wood, 10, 10)],
        };
        let chunk = Chunk::restore(generated(ChunkCoord::new(0, 0)), contents);

        assert_eq!(chunk.entities, vec![Entity::with_health(EntityKind::Wolf, 100, 100, 9)]);
        assert_eq!(chunk.items.len(), 1);
    }

    #[test]
    fn test_tile_lookup_and_bounds() {
        let chunk = Chunk::generate(generated(ChunkCoord::new(1, 0)));

        assert!(chunk.tile_at(BlockPos::new(31, 0)).is_none());
        let tile = chunk.tile_at(BlockPos::new(32, 0)).unwrap();
        assert_ne!(tile.kind, TileKind::Air);

        assert!(chunk.is_out_of_chunk(BlockPos::new(64, 5)));
        assert!(chunk.is_out_of_chunk(BlockPos::new(40, -1)));
        assert!(!chunk.is_out_of_chunk(BlockPos::new(40, 31)));
    }
}
