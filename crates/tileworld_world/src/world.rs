//! # World
//!
//! Owns one world's store, window, reconciler and clock, and runs them in
//! a fixed order each tick:
//!
//! ```text
//! window shift + fill -> clock -> lighting -> reconcile -> periodic flush
//! ```
//!
//! The player lives in the centre chunk like any other entity. Its own
//! record (position, health, dimension, clock) is written on every flush.

use rand::Rng;
use tileworld_procedural::{BlockPos, Dimension, SeedPair, Tile, WorldGenerator};

use crate::chunk::Chunk;
use crate::clock::{WorldClock, CAVE_BRIGHTNESS};
use crate::config::WorldConfig;
use crate::entity::{Entity, EntityKind};
use crate::error::WorldResult;
use crate::item::Item;
use crate::reconcile::{ContentTicker, MembershipReconciler, ReconcileReport};
use crate::store::{PlayerRecord, WorldStore};
use crate::window::{FlushReport, ShiftReport, WindowCache};

/// What one [`World::tick`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Window movement.
    pub shift: ShiftReport,
    /// Membership changes.
    pub reconcile: ReconcileReport,
    /// Present when this tick ran the periodic flush.
    pub flush: Option<FlushReport>,
}

/// An open world.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    name: String,
    seeds: SeedPair,
    store: WorldStore,
    window: WindowCache,
    reconciler: MembershipReconciler,
    clock: WorldClock,
    ticks_since_flush: u32,
}

impl World {
    /// Opens world `name`, creating it if it does not exist.
    ///
    /// A new world takes `seeds` if given, otherwise random ones, and
    /// writes them immediately. An existing world always keeps its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, or if the seed
    /// file, player record or a chunk file around the player cannot be read.
    pub fn open(config: WorldConfig, name: &str, seeds: Option<SeedPair>) -> WorldResult<Self> {
        config.validate()?;
        let mut store = WorldStore::new(&config, name);

        let seeds = match store.load_seeds()? {
            Some(existing) => existing,
            None => {
                let created = seeds.unwrap_or_else(random_seeds);
                store.save_seeds(created)?;
                tracing::info!(
                    world = name,
                    elevation = created.elevation,
                    moisture = created.moisture,
                    "Created world"
                );
                created
            }
        };

        let record = match store.load_player()? {
            Some(record) => record,
            None => PlayerRecord {
                x: config.spawn_x,
                y: config.spawn_y,
                health: EntityKind::Player.descriptor().default_health,
                dimension: Dimension::Overworld,
                world_time: WorldClock::default().time(),
            },
        };
        let player = Entity::with_health(EntityKind::Player, record.x, record.y, record.health);

        let mut window = WindowCache::new(WorldGenerator::new(seeds), record.dimension, player.chunk());
        window.fill(&mut store)?;

        let mut world = Self {
            config,
            name: name.to_owned(),
            seeds,
            store,
            window,
            reconciler: MembershipReconciler::new(),
            clock: WorldClock::new(record.world_time),
            ticks_since_flush: 0,
        };
        world.attach_player(player);
        world.refresh_brightness();

        tracing::info!(
            world = name,
            dimension = %record.dimension,
            center = %world.window.center(),
            "Opened world"
        );
        Ok(world)
    }

    /// World name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seed pair.
    #[must_use]
    pub const fn seeds(&self) -> SeedPair {
        self.seeds
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Current dimension.
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        self.window.dimension()
    }

    /// Overworld clock.
    #[must_use]
    pub const fn clock(&self) -> &WorldClock {
        &self.clock
    }

    /// Resident window.
    #[must_use]
    pub const fn window(&self) -> &WindowCache {
        &self.window
    }

    /// Mutable resident window, for content edits between ticks.
    pub fn window_mut(&mut self) -> &mut WindowCache {
        &mut self.window
    }

    /// Resident chunks.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.window.chunks()
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> Option<&Entity> {
        self.window.player()
    }

    /// Mutable player, for movement between ticks.
    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.window.player_mut()
    }

    /// Tile at a global block; solid void outside the window.
    #[must_use]
    pub fn tile_at(&self, block: BlockPos) -> Tile {
        self.window.tile_at(block)
    }

    /// Ambient brightness for the current dimension.
    #[must_use]
    pub fn ambient_brightness(&self) -> u8 {
        match self.dimension() {
            Dimension::Overworld => self.clock.brightness(),
            Dimension::Cave => CAVE_BRIGHTNESS,
        }
    }

    /// Adds an entity at the next tick. Dropped if its chunk is not
    /// resident by then.
    pub fn spawn_entity(&mut self, entity: Entity) {
        self.reconciler.queue_entity(entity);
    }

    /// Adds a ground item at the next tick. Dropped if its chunk is not
    /// resident by then.
    pub fn drop_item(&mut self, item: Item) {
        self.reconciler.queue_item(item);
    }

    /// Advances the world by one tick.
    ///
    /// # Errors
    ///
    /// Returns an error if a chunk entering the window cannot be loaded.
    /// Save failures are logged and never returned from here.
    pub fn tick<T: ContentTicker + ?Sized>(&mut self, ticker: &mut T) -> WorldResult<TickReport> {
        let player = self.detach_player();
        let shift = self.window.tick(player.center_block(), &mut self.store);
        self.attach_player(player);
        let shift = shift?;

        if self.dimension() == Dimension::Overworld {
            self.clock.advance();
        }
        self.refresh_brightness();

        let reconcile = self.reconciler.reconcile(&mut self.window, ticker);

        self.ticks_since_flush += 1;
        let flush = if self.ticks_since_flush >= self.config.save_interval {
            self.ticks_since_flush = 0;
            match self.flush() {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::error!(world = %self.name, error = %e, "Periodic flush failed");
                    None
                }
            }
        } else {
            None
        };

        Ok(TickReport {
            shift,
            reconcile,
            flush,
        })
    }

    /// Saves every resident chunk and the player record.
    ///
    /// # Errors
    ///
    /// Returns an error if the player record cannot be written. Chunk save
    /// failures are reported in the [`FlushReport`].
    pub fn flush(&mut self) -> WorldResult<FlushReport> {
        let report = self.window.flush_all(&mut self.store);
        if let Some(record) = self.player_record() {
            self.store.save_player(&record)?;
        }
        tracing::info!(
            world = %self.name,
            saved = report.saved,
            failed = report.failed.len(),
            "Flushed world"
        );
        Ok(report)
    }

    /// Flushes and closes the world.
    ///
    /// # Errors
    ///
    /// As [`World::flush`].
    pub fn close(mut self) -> WorldResult<FlushReport> {
        self.flush()
    }

    /// Saves everything, then rebuilds the window around the player in
    /// `dimension`.
    ///
    /// Entering the cave moves the player south onto the first open tile
    /// and leaves a cave mouth under it, unless one is already there.
    ///
    /// # Errors
    ///
    /// Returns an error if a chunk of the new window cannot be loaded or
    /// the player record cannot be written.
    pub fn enter_dimension(&mut self, dimension: Dimension) -> WorldResult<ShiftReport> {
        if dimension == self.dimension() {
            return Ok(ShiftReport::default());
        }

        let mut player = self.detach_player();
        let switched = self
            .window
            .switch_dimension(dimension, player.chunk(), &mut self.store);
        if switched.is_ok() && dimension == Dimension::Cave {
            self.nudge_to_open_ground(&mut player);
            self.ensure_cave_mouth(player.center_block());
        }
        self.attach_player(player);
        let report = switched?;

        self.refresh_brightness();
        self.ticks_since_flush = 0;
        if let Some(record) = self.player_record() {
            self.store.save_player(&record)?;
        }
        Ok(report)
    }

    fn player_record(&self) -> Option<PlayerRecord> {
        self.window.player().map(|player| PlayerRecord {
            x: player.x,
            y: player.y,
            health: player.health,
            dimension: self.dimension(),
            world_time: self.clock.time(),
        })
    }

    fn detach_player(&mut self) -> Entity {
        self.window.take_player().unwrap_or_else(|| {
            tracing::warn!(world = %self.name, "Player missing from window, respawning");
            Entity::new(EntityKind::Player, self.config.spawn_x, self.config.spawn_y)
        })
    }

    fn attach_player(&mut self, player: Entity) {
        match self.window.center_chunk_mut() {
            Some(center) => center.entities.push(player),
            None => self.reconciler.queue_entity(player),
        }
    }

    fn refresh_brightness(&mut self) {
        let brightness = self.ambient_brightness();
        self.window.apply_brightness(brightness);
    }

    /// Moves the player south until it stands on a passable tile or
    /// reaches the window edge.
    fn nudge_to_open_ground(&self, player: &mut Entity) {
        let start = player.center_block();
        let mut block = start;
        while self.window.tile_at(block).is_solid() {
            let next = BlockPos::new(block.x, block.y + 1);
            if !self.window.is_resident(next.chunk()) {
                break;
            }
            block = next;
        }
        if block != start {
            tracing::debug!(from = start.y, to = block.y, "Moved player off solid cave tile");
            player.set_center_row(block.y);
        }
    }

    fn ensure_cave_mouth(&mut self, block: BlockPos) {
        let (x, y) = block.to_pixel();
        let Some(chunk) = self.window.chunk_mut(block.chunk()) else {
            return;
        };
        if !chunk.has_entity_at(EntityKind::Cave, x, y) {
            chunk.entities.push(Entity::new(EntityKind::Cave, x, y));
        }
    }
}

fn random_seeds() -> SeedPair {
    let mut rng = rand::thread_rng();
    SeedPair::new(rng.gen_range(0..i32::MAX), rng.gen_range(0..i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DAY;

    fn open(dir: &tempfile::TempDir) -> World {
        World::open(WorldConfig::with_save_root(dir.path()), "Alpha", Some(SeedPair::new(1, 1)))
            .unwrap()
    }

    #[test]
    fn test_new_world_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let world = open(&dir);

        assert_eq!(world.seeds(), SeedPair::new(1, 1));
        assert_eq!(world.dimension(), Dimension::Overworld);
        assert_eq!(world.clock().time(), DAY);
        let player = world.player().unwrap();
        assert_eq!((player.x, player.y, player.health), (100, 100, 20));
        assert!(world.window().center_chunk().unwrap().entities.iter().any(Entity::is_player));
        assert!(dir.path().join("Alpha/Seeds.pgsf").is_file());
    }

    #[test]
    fn test_existing_seeds_win_over_requested() {
        let dir = tempfile::tempdir().unwrap();
        drop(open(&dir));

        let world = World::open(
            WorldConfig::with_save_root(dir.path()),
            "Alpha",
            Some(SeedPair::new(7, 7)),
        )
        .unwrap();
        assert_eq!(world.seeds(), SeedPair::new(1, 1));
    }

    #[test]
    fn test_random_seeds_are_non_negative() {
        let dir = tempfile::tempdir().unwrap();
        let world = World::open(WorldConfig::with_save_root(dir.path()), "Random", None).unwrap();
        assert!(world.seeds().elevation >= 0);
        assert!(world.seeds().moisture >= 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorldConfig {
            save_interval: 0,
            ..WorldConfig::with_save_root(dir.path())
        };
        assert!(World::open(config, "Alpha", None).is_err());
    }

    #[test]
    fn test_periodic_flush_writes_player() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorldConfig {
            save_interval: 2,
            ..WorldConfig::with_save_root(dir.path())
        };
        let mut world = World::open(config, "Alpha", Some(SeedPair::new(1, 1))).unwrap();

        assert!(world.tick(&mut crate::NoopTicker).unwrap().flush.is_none());
        let report = world.tick(&mut crate::NoopTicker).unwrap();
        assert_eq!(report.flush.unwrap().saved, 9);
        assert!(dir.path().join("Alpha/Player.pgsf").is_file());
    }

    #[test]
    fn test_clock_only_runs_in_overworld() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = open(&dir);

        world.tick(&mut crate::NoopTicker).unwrap();
        assert_eq!(world.clock().time(), DAY + 1);

        world.enter_dimension(Dimension::Cave).unwrap();
        world.tick(&mut crate::NoopTicker).unwrap();
        assert_eq!(world.clock().time(), DAY + 1);
        assert_eq!(world.ambient_brightness(), CAVE_BRIGHTNESS);
        assert!(world.chunks().all(|c| c.tiles.get(0, 0).brightness == CAVE_BRIGHTNESS));
    }
}
