//! # Window Cache
//!
//! The 3x3 grid of resident chunks centred on the player's chunk.
//!
//! ## Slot Layout
//!
//! ```text
//!            col 0        col 1        col 2
//! row 0   (cx-1,cy-1)  (cx,  cy-1)  (cx+1,cy-1)
//! row 1   (cx-1,cy  )  (cx,  cy  )  (cx+1,cy  )     <- centre at [1][1]
//! row 2   (cx-1,cy+1)  (cx,  cy+1)  (cx+1,cy+1)
//! ```
//!
//! ## Tick
//!
//! 1. Retry saves of parked chunks
//! 2. Shift one step per displaced axis until the centre is the player's
//!    chunk; each step saves the trailing row/column and empties the leading
//!    one. A jump of three or more chunks evicts everything instead.
//! 3. Fill: every empty slot is loaded from its chunk file or generated
//!
//! After a tick all nine slots are populated.
//!
//! A chunk whose eviction save fails is parked in memory and retried each
//! tick. If it comes back into range first, the parked copy is reused.

use tileworld_procedural::{BlockPos, ChunkCoord, Dimension, Tile, WorldGenerator};

use crate::chunk::Chunk;
use crate::entity::Entity;
use crate::error::WorldResult;
use crate::item::Item;
use crate::store::ChunkBacking;

/// Window edge length in chunks.
pub const WINDOW_SIZE: usize = 3;

/// Slot offset from the centre, indexed by row or column.
const OFFSETS: [i32; WINDOW_SIZE] = [-1, 0, 1];

/// Displacement at or beyond which the window is rebuilt rather than shifted.
const RECENTRE_DISTANCE: i32 = WINDOW_SIZE as i32;

type Slots = [[Option<Chunk>; WINDOW_SIZE]; WINDOW_SIZE];

/// Shift direction, named after where the player went.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Centre moves to `y - 1`; the south row is evicted.
    North,
    /// Centre moves to `y + 1`; the north row is evicted.
    South,
    /// Centre moves to `x + 1`; the west column is evicted.
    East,
    /// Centre moves to `x - 1`; the east column is evicted.
    West,
}

impl Direction {
    /// Chunk offset of one step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }
}

/// What a window tick did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShiftReport {
    /// Single-step shifts, in order.
    pub shifts: Vec<Direction>,
    /// Whether the whole window was evicted and rebuilt.
    pub recentred: bool,
    /// Chunks saved and dropped.
    pub evicted: Vec<ChunkCoord>,
    /// Chunks whose save failed; kept in memory for retry.
    pub parked: Vec<ChunkCoord>,
    /// Parked chunks whose retried save succeeded.
    pub retried: Vec<ChunkCoord>,
    /// Parked chunks that came back into range unsaved.
    pub reclaimed: Vec<ChunkCoord>,
    /// Chunks restored from their file.
    pub loaded: Vec<ChunkCoord>,
    /// Chunks generated on a first visit.
    pub generated: Vec<ChunkCoord>,
}

impl ShiftReport {
    /// Whether the window did not change.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.shifts.is_empty()
            && !self.recentred
            && self.loaded.is_empty()
            && self.generated.is_empty()
            && self.reclaimed.is_empty()
    }
}

/// Result of saving every resident chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Resident chunks written.
    pub saved: usize,
    /// Resident chunks whose save failed.
    pub failed: Vec<ChunkCoord>,
    /// Parked chunks written.
    pub retried: Vec<ChunkCoord>,
}

/// Owned 3x3 chunk cache.
#[derive(Debug)]
pub struct WindowCache {
    generator: WorldGenerator,
    dimension: Dimension,
    center: ChunkCoord,
    slots: Slots,
    parked: Vec<Chunk>,
}

impl WindowCache {
    /// Creates an empty window. Call [`WindowCache::fill`] before use.
    #[must_use]
    pub fn new(generator: WorldGenerator, dimension: Dimension, center: ChunkCoord) -> Self {
        Self {
            generator,
            dimension,
            center,
            slots: Slots::default(),
            parked: Vec::new(),
        }
    }

    /// Centre chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> ChunkCoord {
        self.center
    }

    /// Dimension of every resident chunk.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Generator used for tiles and first visits.
    #[inline]
    #[must_use]
    pub const fn generator(&self) -> &WorldGenerator {
        &self.generator
    }

    /// Number of chunks waiting for a successful save.
    #[must_use]
    pub fn parked_count(&self) -> usize {
        self.parked.len()
    }

    /// Window slot of a chunk coordinate, as `(row, col)`.
    fn slot_of(&self, coord: ChunkCoord) -> Option<(usize, usize)> {
        let col = OFFSETS.iter().position(|&dx| self.center.x + dx == coord.x)?;
        let row = OFFSETS.iter().position(|&dy| self.center.y + dy == coord.y)?;
        Some((row, col))
    }

    /// Chunk held in slot `[row][col]`.
    #[must_use]
    pub fn slot(&self, row: usize, col: usize) -> Option<&Chunk> {
        self.slots.get(row)?.get(col)?.as_ref()
    }

    /// Resident chunk at `coord`.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        let (row, col) = self.slot_of(coord)?;
        self.slots[row][col].as_ref()
    }

    /// Mutable resident chunk at `coord`.
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        let (row, col) = self.slot_of(coord)?;
        self.slots[row][col].as_mut()
    }

    /// Centre chunk.
    #[must_use]
    pub fn center_chunk(&self) -> Option<&Chunk> {
        self.chunk(self.center)
    }

    /// Mutable centre chunk.
    pub fn center_chunk_mut(&mut self) -> Option<&mut Chunk> {
        self.chunk_mut(self.center)
    }

    /// Whether `coord` is resident.
    #[must_use]
    pub fn is_resident(&self, coord: ChunkCoord) -> bool {
        self.chunk(coord).is_some()
    }

    /// Resident chunks in row-major order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.slots.iter().flatten().filter_map(Option::as_ref)
    }

    /// Mutable resident chunks in row-major order.
    pub fn chunks_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.slots.iter_mut().flatten().filter_map(Option::as_mut)
    }

    /// Tile at a global block. Outside the window this is the solid
    /// [`Tile::VOID`].
    #[must_use]
    pub fn tile_at(&self, block: BlockPos) -> Tile {
        self.chunk(block.chunk())
            .and_then(|chunk| chunk.tile_at(block))
            .unwrap_or(Tile::VOID)
    }

    /// Sets the brightness of every resident tile.
    pub fn apply_brightness(&mut self, brightness: u8) {
        for chunk in self.chunks_mut() {
            chunk.tiles.set_brightness(brightness);
        }
    }

    /// The player entity, wherever it is resident.
    #[must_use]
    pub fn player(&self) -> Option<&Entity> {
        self.chunks().flat_map(|chunk| &chunk.entities).find(|e| e.is_player())
    }

    /// Mutable player entity.
    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.chunks_mut()
            .flat_map(|chunk| chunk.entities.iter_mut())
            .find(|e| e.is_player())
    }

    /// Detaches the player from its chunk.
    pub fn take_player(&mut self) -> Option<Entity> {
        self.chunks_mut().find_map(|chunk| {
            let index = chunk.entities.iter().position(Entity::is_player)?;
            Some(chunk.entities.remove(index))
        })
    }

    /// Appends an entity to the resident chunk owning its centre block.
    ///
    /// # Errors
    ///
    /// Hands the entity back if that chunk is not resident.
    pub fn insert_entity(&mut self, entity: Entity) -> Result<(), Entity> {
        match self.chunk_mut(entity.chunk()) {
            Some(chunk) => {
                chunk.entities.push(entity);
                Ok(())
            }
            None => Err(entity),
        }
    }

    /// Appends an item to the resident chunk it lies in.
    ///
    /// # Errors
    ///
    /// Hands the item back if that chunk is not resident.
    pub fn insert_item(&mut self, item: Item) -> Result<(), Item> {
        match self.chunk_mut(item.chunk()) {
            Some(chunk) => {
                chunk.items.push(item);
                Ok(())
            }
            None => Err(item),
        }
    }

    /// Populates every empty slot.
    ///
    /// # Errors
    ///
    /// Returns an error if a chunk file exists but cannot be read or names
    /// an unknown type.
    pub fn fill<B: ChunkBacking>(&mut self, backing: &mut B) -> WorldResult<ShiftReport> {
        let mut report = ShiftReport::default();
        self.fill_slots(backing, &mut report)?;
        Ok(report)
    }

    /// Follows the player to `player_block`.
    ///
    /// # Errors
    ///
    /// Returns an error if a chunk entering the window cannot be loaded.
    /// Failed saves are not errors; see [`ShiftReport::parked`].
    pub fn tick<B: ChunkBacking>(
        &mut self,
        player_block: BlockPos,
        backing: &mut B,
    ) -> WorldResult<ShiftReport> {
        let mut report = ShiftReport {
            retried: self.retry_parked(backing),
            ..ShiftReport::default()
        };

        let target = player_block.chunk();
        let dx = (target.x - self.center.x).abs();
        let dy = (target.y - self.center.y).abs();

        if dx >= RECENTRE_DISTANCE || dy >= RECENTRE_DISTANCE {
            tracing::debug!(from = %self.center, to = %target, "Recentring window");
            self.evict_all(backing, &mut report);
            self.center = target;
            report.recentred = true;
        } else {
            while self.center != target {
                if target.y < self.center.y {
                    self.shift(Direction::North, backing, &mut report);
                }
                if target.y > self.center.y {
                    self.shift(Direction::South, backing, &mut report);
                }
                if target.x < self.center.x {
                    self.shift(Direction::West, backing, &mut report);
                }
                if target.x > self.center.x {
                    self.shift(Direction::East, backing, &mut report);
                }
            }
        }

        self.fill_slots(backing, &mut report)?;
        Ok(report)
    }

    /// Saves every resident chunk without evicting, then retries parked
    /// chunks. Failures are logged, never returned.
    pub fn flush_all<B: ChunkBacking>(&mut self, backing: &mut B) -> FlushReport {
        let mut report = FlushReport::default();
        for chunk in self.chunks() {
            match backing.save(chunk) {
                Ok(()) => report.saved += 1,
                Err(e) => {
                    tracing::error!(chunk = %chunk.coord(), error = %e, "Failed to flush chunk");
                    report.failed.push(chunk.coord());
                }
            }
        }
        report.retried = self.retry_parked(backing);
        report
    }

    /// Evicts the whole window and refills it around `center` in another
    /// dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if a chunk of the new window cannot be loaded.
    pub fn switch_dimension<B: ChunkBacking>(
        &mut self,
        dimension: Dimension,
        center: ChunkCoord,
        backing: &mut B,
    ) -> WorldResult<ShiftReport> {
        let mut report = ShiftReport::default();
        self.evict_all(backing, &mut report);
        self.dimension = dimension;
        self.center = center;
        report.recentred = true;
        self.fill_slots(backing, &mut report)?;
        tracing::info!(%dimension, center = %center, "Switched dimension");
        Ok(report)
    }

    fn shift<B: ChunkBacking>(
        &mut self,
        direction: Direction,
        backing: &mut B,
        report: &mut ShiftReport,
    ) {
        let last = WINDOW_SIZE - 1;
        let trailing: Vec<Chunk> = match direction {
            Direction::North => {
                let row = std::mem::take(&mut self.slots[last]);
                self.slots.rotate_right(1);
                row.into_iter().flatten().collect()
            }
            Direction::South => {
                let row = std::mem::take(&mut self.slots[0]);
                self.slots.rotate_left(1);
                row.into_iter().flatten().collect()
            }
            Direction::West => self
                .slots
                .iter_mut()
                .filter_map(|row| {
                    let chunk = row[last].take();
                    row.rotate_right(1);
                    chunk
                })
                .collect(),
            Direction::East => self
                .slots
                .iter_mut()
                .filter_map(|row| {
                    let chunk = row[0].take();
                    row.rotate_left(1);
                    chunk
                })
                .collect(),
        };

        let (dx, dy) = direction.delta();
        self.center = self.center.offset(dx, dy);
        report.shifts.push(direction);

        for chunk in trailing {
            self.evict(chunk, backing, report);
        }
    }

    fn evict_all<B: ChunkBacking>(&mut self, backing: &mut B, report: &mut ShiftReport) {
        let slots = std::mem::take(&mut self.slots);
        for chunk in slots.into_iter().flatten().flatten() {
            self.evict(chunk, backing, report);
        }
    }

    fn evict<B: ChunkBacking>(&mut self, chunk: Chunk, backing: &mut B, report: &mut ShiftReport) {
        let coord = chunk.coord();
        match backing.save(&chunk) {
            Ok(()) => {
                tracing::debug!(chunk = %coord, dimension = %chunk.dimension(), "Evicted chunk");
                report.evicted.push(coord);
            }
            Err(e) => {
                tracing::error!(chunk = %coord, error = %e, "Failed to save evicted chunk, keeping it in memory");
                report.parked.push(coord);
                self.parked.push(chunk);
            }
        }
    }

    fn retry_parked<B: ChunkBacking>(&mut self, backing: &mut B) -> Vec<ChunkCoord> {
        let mut saved = Vec::new();
        let parked = std::mem::take(&mut self.parked);
        for chunk in parked {
            match backing.save(&chunk) {
                Ok(()) => {
                    tracing::debug!(chunk = %chunk.coord(), "Saved parked chunk");
                    saved.push(chunk.coord());
                }
                Err(e) => {
                    tracing::debug!(chunk = %chunk.coord(), error = %e, "Parked chunk still unsaved");
                    self.parked.push(chunk);
                }
            }
        }
        saved
    }

    fn fill_slots<B: ChunkBacking>(
        &mut self,
        backing: &mut B,
        report: &mut ShiftReport,
    ) -> WorldResult<()> {
        for (row, dy) in OFFSETS.into_iter().enumerate() {
            for (col, dx) in OFFSETS.into_iter().enumerate() {
                if self.slots[row][col].is_some() {
                    continue;
                }
                let coord = self.center.offset(dx, dy);
                let chunk = self.resolve(coord, backing, report)?;
                self.slots[row][col] = Some(chunk);
            }
        }
        Ok(())
    }

    /// Parked copy, else chunk file, else first-visit generation.
    fn resolve<B: ChunkBacking>(
        &mut self,
        coord: ChunkCoord,
        backing: &mut B,
        report: &mut ShiftReport,
    ) -> WorldResult<Chunk> {
        let dimension = self.dimension;
        if let Some(index) = self
            .parked
            .iter()
            .position(|c| c.coord() == coord && c.dimension() == dimension)
        {
            tracing::debug!(chunk = %coord, %dimension, "Reclaimed parked chunk");
            report.reclaimed.push(coord);
            return Ok(self.parked.swap_remove(index));
        }

        let contents = backing.load(coord, dimension)?;
        let generated = self.generator.generate(coord, dimension);
        Ok(match contents {
            Some(contents) => {
                tracing::debug!(chunk = %coord, %dimension, "Loaded chunk");
                report.loaded.push(coord);
                Chunk::restore(generated, contents)
            }
            None => {
                tracing::debug!(chunk = %coord, %dimension, "Generated chunk");
                report.generated.push(coord);
                Chunk::generate(generated)
            }
        })
    }
}
