//! # Ground Items
//!
//! Items lying in the world. Stacking happens only inside inventories, so a
//! ground item is always a single unit and carries no state beyond its type
//! and position.

use tileworld_procedural::{BlockPos, ChunkCoord};

/// Item types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Wood log.
    Wood = 1,
    /// Stone chunk.
    Stone = 2,
    /// Apple.
    Apple = 3,
    /// Wooden fence kit.
    WoodenFence = 4,
    /// Stone fence kit.
    StoneFence = 5,
    /// Torch.
    Torch = 6,
    /// Crafting table kit.
    CraftingTable = 7,
    /// Advanced crafting table kit.
    AdvancedCraftingTable = 8,
    /// Campfire kit.
    Campfire = 9,
}

impl ItemKind {
    /// Stable type id used in chunk files.
    #[inline]
    #[must_use]
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Looks an item kind up by id.
    #[must_use]
    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Wood),
            2 => Some(Self::Stone),
            3 => Some(Self::Apple),
            4 => Some(Self::WoodenFence),
            5 => Some(Self::StoneFence),
            6 => Some(Self::Torch),
            7 => Some(Self::CraftingTable),
            8 => Some(Self::AdvancedCraftingTable),
            9 => Some(Self::Campfire),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wood => "Wood",
            Self::Stone => "Stone",
            Self::Apple => "Apple",
            Self::WoodenFence => "Wooden Fence",
            Self::StoneFence => "Stone Fence",
            Self::Torch => "Torch",
            Self::CraftingTable => "Crafting Table",
            Self::AdvancedCraftingTable => "Advanced Crafting Table",
            Self::Campfire => "Campfire",
        }
    }
}

/// An item lying on the ground.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    /// Item type.
    pub kind: ItemKind,
    /// Pixel X.
    pub x: i32,
    /// Pixel Y.
    pub y: i32,
    /// Set by the simulation when the player collects the item.
    pub picked_up: bool,
}

impl Item {
    /// Creates a ground item.
    #[must_use]
    pub const fn new(kind: ItemKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            picked_up: false,
        }
    }

    /// Block the item rests on.
    #[inline]
    #[must_use]
    pub const fn block(&self) -> BlockPos {
        BlockPos::from_pixel(self.x, self.y)
    }

    /// Chunk the item belongs to.
    #[inline]
    #[must_use]
    pub const fn chunk(&self) -> ChunkCoord {
        self.block().chunk()
    }
}
