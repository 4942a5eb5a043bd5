//! # Chunk Geometry
//!
//! The world is cut into 32x32-tile chunks. Three coordinate spaces are in
//! use:
//!
//! - **pixel**: entity and item positions, 64 pixels per tile
//! - **block**: global tile coordinates
//! - **chunk**: `block.div_euclid(32)`
//!
//! All conversions floor toward negative infinity so negative coordinates
//! land in the right chunk.

use crate::tile::{Tile, TileKind};

/// Chunk width and height in tiles.
pub const CHUNK_SIZE: usize = 32;

/// Tile edge length in pixels.
pub const TILE_SIZE: i32 = 64;

/// Total tiles per chunk.
pub const TILES_PER_CHUNK: usize = CHUNK_SIZE * CHUNK_SIZE;

const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Y coordinate (in chunks, grows southward).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing a block.
    #[inline]
    #[must_use]
    pub const fn from_block(block: BlockPos) -> Self {
        Self {
            x: block.x.div_euclid(CHUNK_SIZE_I32),
            y: block.y.div_euclid(CHUNK_SIZE_I32),
        }
    }

    /// Block coordinate of the chunk's north-west corner.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> BlockPos {
        BlockPos::new(self.x * CHUNK_SIZE_I32, self.y * CHUNK_SIZE_I32)
    }

    /// Returns the coordinate offset by `(dx, dy)` chunks.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whether `block` lies inside this chunk.
    #[inline]
    #[must_use]
    pub const fn contains(self, block: BlockPos) -> bool {
        let origin = self.origin();
        block.x >= origin.x
            && block.x < origin.x + CHUNK_SIZE_I32
            && block.y >= origin.y
            && block.y < origin.y + CHUNK_SIZE_I32
    }

    /// Whether content centred on `block` stays owned by this chunk.
    ///
    /// Like [`Self::contains`], but the row just south and the column just
    /// east of the chunk still count as inside. A footprint anchored on the
    /// last row or column has its centre there.
    #[inline]
    #[must_use]
    pub const fn keeps(self, block: BlockPos) -> bool {
        let origin = self.origin();
        block.x >= origin.x
            && block.x <= origin.x + CHUNK_SIZE_I32
            && block.y >= origin.y
            && block.y <= origin.y + CHUNK_SIZE_I32
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Global tile coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockPos {
    /// Tile column.
    pub x: i32,
    /// Tile row (grows southward).
    pub y: i32,
}

impl BlockPos {
    /// Creates a block position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Block containing a pixel position.
    #[inline]
    #[must_use]
    pub const fn from_pixel(x: i32, y: i32) -> Self {
        Self::new(x.div_euclid(TILE_SIZE), y.div_euclid(TILE_SIZE))
    }

    /// Pixel coordinate of the block's north-west corner.
    #[inline]
    #[must_use]
    pub const fn to_pixel(self) -> (i32, i32) {
        (self.x * TILE_SIZE, self.y * TILE_SIZE)
    }

    /// Chunk containing this block.
    #[inline]
    #[must_use]
    pub const fn chunk(self) -> ChunkCoord {
        ChunkCoord::from_block(self)
    }

    /// Offset of this block inside its chunk.
    #[inline]
    #[must_use]
    pub const fn local(self) -> (usize, usize) {
        (
            self.x.rem_euclid(CHUNK_SIZE_I32) as usize,
            self.y.rem_euclid(CHUNK_SIZE_I32) as usize,
        )
    }
}

/// Generation namespace. Each dimension keeps separate chunk files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Dimension {
    /// Surface world.
    #[default]
    Overworld = 0,
    /// Underground cave world.
    Cave = 1,
}

impl Dimension {
    /// Numeric id as stored in the player record.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks a dimension up by numeric id.
    #[must_use]
    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::Overworld),
            1 => Some(Self::Cave),
            _ => None,
        }
    }

    /// Directory name used for this dimension's chunk files.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Overworld => "World",
            Self::Cave => "Cave",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A chunk's 32x32 tile grid, indexed `[y][x]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Box<[[Tile; CHUNK_SIZE]; CHUNK_SIZE]>,
}

impl TileGrid {
    /// Creates a grid filled with `kind`.
    #[must_use]
    pub fn filled(kind: TileKind) -> Self {
        Self {
            tiles: Box::new([[Tile::new(kind); CHUNK_SIZE]; CHUNK_SIZE]),
        }
    }

    /// Gets a tile at local coordinates. Out-of-range reads return [`Tile::VOID`].
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Tile {
        if x < CHUNK_SIZE && y < CHUNK_SIZE {
            self.tiles[y][x]
        } else {
            Tile::VOID
        }
    }

    /// Mutable access for lighting.
    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(y).and_then(|row| row.get_mut(x))
    }

    /// Sets a tile at local coordinates. Out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, tile: Tile) {
        if x < CHUNK_SIZE && y < CHUNK_SIZE {
            self.tiles[y][x] = tile;
        }
    }

    /// Iterates over rows, north to south.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile; CHUNK_SIZE]> {
        self.tiles.iter()
    }

    /// Whether two grids have the same tile kinds, ignoring brightness.
    #[must_use]
    pub fn same_kinds(&self, other: &Self) -> bool {
        self.rows()
            .zip(other.rows())
            .all(|(a, b)| a.iter().zip(b).all(|(ta, tb)| ta.kind == tb.kind))
    }

    /// Sets every tile's brightness.
    pub fn set_brightness(&mut self, brightness: u8) {
        for row in self.tiles.iter_mut() {
            for tile in row.iter_mut() {
                tile.brightness = brightness;
            }
        }
    }
}
