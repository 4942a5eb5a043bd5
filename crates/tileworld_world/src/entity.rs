//! # Entities
//!
//! Every entity kind is one variant of [`EntityKind`], carrying only the
//! extra state it needs. Per-kind constants and the rehydration decoder
//! live in a single table indexed by type id, so adding a kind means adding
//! one variant and one table row.

use tileworld_procedural::{BlockPos, ChunkCoord, Feature, TILE_SIZE};

/// Orientation of a fence segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FenceAlignment {
    /// Runs north to south.
    #[default]
    UpDown = 0,
    /// Runs west to east.
    LeftRight = 1,
}

impl FenceAlignment {
    /// Numeric value as written in chunk files.
    #[inline]
    #[must_use]
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Parses the numeric value, if valid.
    #[must_use]
    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::UpDown),
            1 => Some(Self::LeftRight),
            _ => None,
        }
    }
}

/// Entity kinds, with per-kind extra state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The player. Persisted in its own record, never in chunk files.
    Player,
    /// Wolf.
    Wolf,
    /// Tree.
    Tree,
    /// Burning fire; health is its remaining lifespan.
    Fire,
    /// Stone boulder or ore.
    Stone,
    /// Tall grass tuft.
    TallGrass,
    /// Wooden fence segment.
    WoodenFence {
        /// Segment orientation.
        alignment: FenceAlignment,
    },
    /// Stone fence segment.
    StoneFence {
        /// Segment orientation.
        alignment: FenceAlignment,
    },
    /// Torch.
    Torch,
    /// Crafting table.
    CraftingTable,
    /// Advanced crafting table.
    AdvancedCraftingTable,
    /// Treant.
    Treant,
    /// Cave mouth linking the overworld and the cave.
    Cave,
    /// Golem.
    Golem,
    /// Campfire.
    Campfire,
    /// Wandering person.
    Person,
}

/// Static facts about one entity type.
#[derive(Clone, Copy)]
pub struct EntityDescriptor {
    /// Stable type id used in chunk files.
    pub id: i32,
    /// Display name.
    pub name: &'static str,
    /// Footprint width in pixels.
    pub width: i32,
    /// Footprint height in pixels.
    pub height: i32,
    /// Health of a freshly created instance.
    pub default_health: i32,
    /// Whether instances start carried and must be placed.
    pub placeable: bool,
    /// Builds the kind from the fields after `id x y health`.
    decode: fn(&[&str]) -> EntityKind,
}

impl std::fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("default_health", &self.default_health)
            .field("placeable", &self.placeable)
            .finish_non_exhaustive()
    }
}

impl EntityDescriptor {
    /// Builds the kind from the fields following `id x y health`.
    #[must_use]
    pub fn decode(&self, extra: &[&str]) -> EntityKind {
        (self.decode)(extra)
    }
}

const fn row(
    id: i32,
    name: &'static str,
    size: (i32, i32),
    default_health: i32,
    placeable: bool,
    decode: fn(&[&str]) -> EntityKind,
) -> EntityDescriptor {
    EntityDescriptor {
        id,
        name,
        width: size.0,
        height: size.1,
        default_health,
        placeable,
        decode,
    }
}

const TILE: (i32, i32) = (TILE_SIZE, TILE_SIZE);
const FENCE: (i32, i32) = (TILE_SIZE, TILE_SIZE * 3);

/// Parses the optional alignment field; anything unreadable is the default.
fn alignment(extra: &[&str]) -> FenceAlignment {
    extra
        .first()
        .and_then(|token| token.parse().ok())
        .and_then(FenceAlignment::from_id)
        .unwrap_or_default()
}

/// Type id to descriptor, in id order starting at 1.
static ENTITY_TABLE: [EntityDescriptor; 16] = [
    row(1, "Player", TILE, 20, false, |_| EntityKind::Player),
    row(2, "Wolf", TILE, 12, false, |_| EntityKind::Wolf),
    row(3, "Tree", (TILE_SIZE, TILE_SIZE * 2), 4, false, |_| EntityKind::Tree),
    row(4, "Fire", TILE, 60, false, |_| EntityKind::Fire),
    row(5, "Stone", TILE, 12, false, |_| EntityKind::Stone),
    row(6, "Tall Grass", TILE, 1, false, |_| EntityKind::TallGrass),
    row(7, "Wooden Fence", FENCE, 50, true, |extra| EntityKind::WoodenFence {
        alignment: alignment(extra),
    }),
    row(8, "Stone Fence", FENCE, 100, true, |extra| EntityKind::StoneFence {
        alignment: alignment(extra),
    }),
    row(9, "Torch", (16, TILE_SIZE), 1, true, |_| EntityKind::Torch),
    row(10, "Crafting Table", TILE, 8, true, |_| EntityKind::CraftingTable),
    row(11, "Advanced Crafting Table", TILE, 8, true, |_| EntityKind::AdvancedCraftingTable),
    row(12, "Treant", (120, 192), 16, false, |_| EntityKind::Treant),
    row(13, "Cave", TILE, 400, false, |_| EntityKind::Cave),
    row(14, "Golem", (128, 128), 24, false, |_| EntityKind::Golem),
    row(15, "Campfire", TILE, 8, true, |_| EntityKind::Campfire),
    row(16, "Person", TILE, 8, false, |_| EntityKind::Person),
];

/// Looks a descriptor up by type id.
#[must_use]
pub fn descriptor_for_id(id: i32) -> Option<&'static EntityDescriptor> {
    let index = usize::try_from(id).ok()?.checked_sub(1)?;
    ENTITY_TABLE.get(index)
}

impl EntityKind {
    /// Stable type id.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Player => 1,
            Self::Wolf => 2,
            Self::Tree => 3,
            Self::Fire => 4,
            Self::Stone => 5,
            Self::TallGrass => 6,
            Self::WoodenFence { .. } => 7,
            Self::StoneFence { .. } => 8,
            Self::Torch => 9,
            Self::CraftingTable => 10,
            Self::AdvancedCraftingTable => 11,
            Self::Treant => 12,
            Self::Cave => 13,
            Self::Golem => 14,
            Self::Campfire => 15,
            Self::Person => 16,
        }
    }

    /// Static facts for this kind.
    #[must_use]
    pub fn descriptor(self) -> &'static EntityDescriptor {
        // Ids are 1..=16 and the table is in id order.
        &ENTITY_TABLE[(self.id() - 1) as usize]
    }

    /// Fields written after `id x y health`.
    #[must_use]
    pub fn extra_fields(self) -> Vec<i32> {
        match self {
            Self::WoodenFence { alignment } | Self::StoneFence { alignment } => {
                vec![alignment.id()]
            }
            _ => Vec::new(),
        }
    }

    /// Entity spawned by a generation feature.
    #[must_use]
    pub const fn from_feature(feature: Feature) -> Self {
        match feature {
            Feature::CaveMouth => Self::Cave,
            Feature::Tree => Self::Tree,
            Feature::TallGrass => Self::TallGrass,
            Feature::StoneOre => Self::Stone,
        }
    }
}

/// Whether a placeable entity has been committed to the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Still held by the player; never saved.
    Carried,
    /// Part of the world.
    Placed,
}

/// A live entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    /// Kind and kind-specific state.
    pub kind: EntityKind,
    /// Pixel X of the north-west corner.
    pub x: i32,
    /// Pixel Y of the north-west corner.
    pub y: i32,
    /// Current health. At zero or below the entity is removed.
    pub health: i32,
    placement: Placement,
}

impl Entity {
    /// Creates an entity with its kind's default health.
    ///
    /// Placeable kinds start [`Placement::Carried`].
    #[must_use]
    pub fn new(kind: EntityKind, x: i32, y: i32) -> Self {
        let descriptor = kind.descriptor();
        Self {
            kind,
            x,
            y,
            health: descriptor.default_health,
            placement: if descriptor.placeable {
                Placement::Carried
            } else {
                Placement::Placed
            },
        }
    }

    /// Creates an entity with explicit health.
    #[must_use]
    pub fn with_health(kind: EntityKind, x: i32, y: i32, health: i32) -> Self {
        Self {
            health,
            ..Self::new(kind, x, y)
        }
    }

    /// Commits a carried entity to the world.
    pub fn place(&mut self) {
        self.placement = Placement::Placed;
    }

    /// Current placement state.
    #[inline]
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Whether the entity is still carried.
    #[inline]
    #[must_use]
    pub fn is_carried(&self) -> bool {
        self.placement == Placement::Carried
    }

    /// Whether this is the player.
    #[inline]
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    /// Whether the entity belongs in a chunk file.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        !self.is_player() && !self.is_carried()
    }

    /// Whether the entity should be removed.
    #[inline]
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Block under the centre of the footprint. Chunk membership uses this.
    #[must_use]
    pub fn center_block(&self) -> BlockPos {
        let descriptor = self.kind.descriptor();
        BlockPos::from_pixel(self.x + descriptor.width / 2, self.y + descriptor.height / 2)
    }

    /// Chunk the entity belongs to.
    #[must_use]
    pub fn chunk(&self) -> ChunkCoord {
        self.center_block().chunk()
    }

    /// Moves the entity so its centre lies on `block`'s row, keeping X.
    pub fn set_center_row(&mut self, block_y: i32) {
        let height = self.kind.descriptor().height;
        self.y = block_y * TILE_SIZE + TILE_SIZE / 2 - height / 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_in_id_order() {
        for (index, descriptor) in ENTITY_TABLE.iter().enumerate() {
            assert_eq!(descriptor.id, index as i32 + 1, "{} out of order", descriptor.name);
            let kind = descriptor.decode(&[]);
            assert_eq!(kind.id(), descriptor.id);
            assert_eq!(kind.descriptor().name, descriptor.name);
        }
    }

    #[test]
    fn test_unknown_ids() {
        assert!(descriptor_for_id(0).is_none());
        assert!(descriptor_for_id(-1).is_none());
        assert!(descriptor_for_id(17).is_none());
        assert_eq!(descriptor_for_id(2).map(|d| d.name), Some("Wolf"));
    }

    #[test]
    fn test_placeables_start_carried() {
        for id in [7, 8, 9, 10, 11, 15] {
            let kind = descriptor_for_id(id).unwrap().decode(&[]);
            let mut entity = Entity::new(kind, 0, 0);
            assert!(entity.is_carried(), "{kind:?} should start carried");
            assert!(!entity.is_persistent());
            entity.place();
            assert!(entity.is_persistent());
        }
        assert!(!Entity::new(EntityKind::Wolf, 0, 0).is_carried());
    }

    #[test]
    fn test_fence_alignment_decoding() {
        let fence = descriptor_for_id(7).unwrap();
        assert_eq!(
            fence.decode(&["1"]),
            EntityKind::WoodenFence { alignment: FenceAlignment::LeftRight }
        );
        assert_eq!(
            fence.decode(&["garbage"]),
            EntityKind::WoodenFence { alignment: FenceAlignment::UpDown }
        );
        assert_eq!(
            fence.decode(&[]),
            EntityKind::WoodenFence { alignment: FenceAlignment::UpDown }
        );
    }

    #[test]
    fn test_center_block_uses_footprint() {
        // 64x128 tree at (0, 0) is centred on block (0, 1)
        let tree = Entity::new(EntityKind::Tree, 0, 0);
        assert_eq!(tree.center_block(), BlockPos::new(0, 1));

        let wolf = Entity::with_health(EntityKind::Wolf, 100, 100, 9);
        assert_eq!(wolf.center_block(), BlockPos::new(2, 2));
        assert_eq!(wolf.chunk(), ChunkCoord::new(0, 0));

        let west = Entity::new(EntityKind::Wolf, -40, 0);
        assert_eq!(west.chunk(), ChunkCoord::new(-1, 0));
    }

    #[test]
    fn test_player_is_never_persistent() {
        let player = Entity::new(EntityKind::Player, 100, 100);
        assert_eq!(player.health, 20);
        assert!(!player.is_persistent());
    }

    #[test]
    fn test_set_center_row() {
        let mut player = Entity::new(EntityKind::Player, 100, 100);
        player.set_center_row(5);
        assert_eq!(player.center_block().y, 5);
    }

    #[test]
    fn test_dead_at_zero_health() {
        let mut grass = Entity::new(EntityKind::TallGrass, 0, 0);
        assert!(!grass.is_dead());
        grass.health -= 1;
        assert!(grass.is_dead());
    }
}
