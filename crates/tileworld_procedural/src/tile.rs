//! # Tile Catalogue
//!
//! Ground tile kinds with their stable numeric ids, display names and
//! solidity. Brightness lives on the [`Tile`] cell because lighting mutates
//! it every tick; it never takes part in generation or persistence.

/// Brightness assigned to freshly generated tiles.
pub const DEFAULT_BRIGHTNESS: u8 = 254;

/// Darkest ambient brightness the lighting collaborator may apply.
pub const LOWEST_BRIGHTNESS: u8 = 32;

/// Ground tile types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileKind {
    /// Void outside the loaded window. Impassable.
    Air = 0,
    /// Cave rock. Impassable.
    Stone = 1,
    /// Short grass.
    Grass = 2,
    /// Bare dirt.
    Dirt = 3,
    /// Dirt with patches of grass.
    GrassyDirt = 4,
    /// Dark topsoil.
    Topsoil = 5,
    /// Loose gravel.
    Gravel = 6,
    /// Gravel with patches of grass.
    GrassyGravel = 7,
    /// Water. Impassable.
    Water = 8,
    /// Sand.
    Sand = 9,
    /// Dry ochre clay.
    Ocher = 10,
    /// Mud.
    Mud = 11,
    /// Mud with patches of grass.
    GrassyMud = 12,
    /// Snow.
    Snow = 13,
}

impl TileKind {
    /// Every tile kind, in id order.
    pub const ALL: [Self; 14] = [
        Self::Air,
        Self::Stone,
        Self::Grass,
        Self::Dirt,
        Self::GrassyDirt,
        Self::Topsoil,
        Self::Gravel,
        Self::GrassyGravel,
        Self::Water,
        Self::Sand,
        Self::Ocher,
        Self::Mud,
        Self::GrassyMud,
        Self::Snow,
    ];

    /// Returns the stable numeric id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks a tile kind up by numeric id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Air),
            1 => Some(Self::Stone),
            2 => Some(Self::Grass),
            3 => Some(Self::Dirt),
            4 => Some(Self::GrassyDirt),
            5 => Some(Self::Topsoil),
            6 => Some(Self::Gravel),
            7 => Some(Self::GrassyGravel),
            8 => Some(Self::Water),
            9 => Some(Self::Sand),
            10 => Some(Self::Ocher),
            11 => Some(Self::Mud),
            12 => Some(Self::GrassyMud),
            13 => Some(Self::Snow),
            _ => None,
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Air => "Air",
            Self::Stone => "Stone",
            Self::Grass => "Grass",
            Self::Dirt => "Dirt",
            Self::GrassyDirt => "Grassy Dirt",
            Self::Topsoil => "Topsoil",
            Self::Gravel => "Gravel",
            Self::GrassyGravel => "Grassy Gravel",
            Self::Water => "Water",
            Self::Sand => "Sand",
            Self::Ocher => "Ocher",
            Self::Mud => "Mud",
            Self::GrassyMud => "Grassy Mud",
            Self::Snow => "Snow",
        }
    }

    /// Whether the tile blocks movement and line of sight.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Air | Self::Stone | Self::Water)
    }
}

impl std::fmt::Display for TileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A tile cell: its kind plus the current ambient brightness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Tile type.
    pub kind: TileKind,
    /// Ambient brightness, recomputed by lighting.
    pub brightness: u8,
}

impl Tile {
    /// The synthetic tile returned for coordinates outside the live window.
    pub const VOID: Self = Self::new(TileKind::Air);

    /// Creates a tile with default brightness.
    #[inline]
    #[must_use]
    pub const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }

    /// Whether the tile blocks movement.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        self.kind.is_solid()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::VOID
    }
}
