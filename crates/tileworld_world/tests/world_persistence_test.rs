//! # World Persistence Integration Test
//!
//! Scenario "Alpha": seeds (1, 1), one wolf, the player walking away and
//! back, closing and reopening the world, and a trip into the cave.

use tileworld_world::{
    BlockPos, ChunkCoord, Dimension, Entity, EntityKind, FenceAlignment, Item, ItemKind,
    NoopTicker, SeedPair, TileKind, World, WorldConfig, CAVE_BRIGHTNESS,
};

const CHUNK_PIXELS: i32 = 32 * 64;

fn open(dir: &tempfile::TempDir) -> World {
    World::open(
        WorldConfig::with_save_root(dir.path()),
        "Alpha",
        Some(SeedPair::new(1, 1)),
    )
    .unwrap()
}

fn teleport(world: &mut World, x: i32, y: i32) {
    let player = world.player_mut().unwrap();
    player.x = x;
    player.y = y;
    world.tick(&mut NoopTicker).unwrap();
}

fn chunk_file(dir: &tempfile::TempDir, dimension: &str, coord: &str) -> std::path::PathBuf {
    dir.path().join("Alpha/Chunks").join(dimension).join(format!("{coord}.pgsf"))
}

/// Test: a wolf with 9 health survives its chunk being evicted and reloaded.
#[test]
fn test_wolf_survives_eviction() {
    let dir = tempfile::tempdir().unwrap();
    let mut world = open(&dir);
    assert_ne!(world.tile_at(BlockPos::new(0, 0)).kind, TileKind::Air);
    world.spawn_entity(Entity::with_health(EntityKind::Wolf, 100, 100, 9));
    world.tick(&mut NoopTicker).unwrap();

    let origin = world.window().chunk(ChunkCoord::new(0, 0)).unwrap();
    assert!(origin.has_entity_at(EntityKind::Wolf, 100, 100));

    teleport(&mut world, 20 * CHUNK_PIXELS, 100);
    assert!(!world.window().is_resident(ChunkCoord::new(0, 0)));
    let text = std::fs::read_to_string(chunk_file(&dir, "World", "0,0")).unwrap();
    assert!(text.lines().any(|line| line == "2 100 100 9"), "wolf not saved: {text}");

    teleport(&mut world, 100, 100);
    let origin = world.window().chunk(ChunkCoord::new(0, 0)).unwrap();
    let wolf = origin
        .entities
        .iter()
        .find(|e| e.kind == EntityKind::Wolf)
        .expect("wolf reloaded");
    assert_eq!((wolf.x, wolf.y, wolf.health), (100, 100, 9));
}

/// Test: closing and reopening keeps placed content and the player record,
/// while carried placeables and the player never reach a chunk file.
#[test]
fn test_reopen_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut world = open(&dir);

    let mut fence = Entity::new(
        EntityKind::StoneFence {
            alignment: FenceAlignment::LeftRight,
        },
        320,
        320,
    );
    fence.place();
    world.spawn_entity(fence.clone());
    world.spawn_entity(Entity::new(EntityKind::Torch, 384, 320));
    world.drop_item(Item::new(ItemKind::Apple, 640, 640));
    world.tick(&mut NoopTicker).unwrap();
    world.player_mut().unwrap().health = 13;
    world.close().unwrap();

    let text = std::fs::read_to_string(chunk_file(&dir, "World", "0,0")).unwrap();
    let (entities, items) = text.split_once("!\n").unwrap();
    assert!(entities.lines().any(|line| line == "8 320 320 100 1"));
    assert!(!entities.lines().any(|line| line.starts_with("9 ")), "carried torch saved");
    assert!(!entities.lines().any(|line| line.starts_with("1 ")), "player saved");
    assert_eq!(items, "3 640 640\n");

    let world = open(&dir);
    let origin = world.window().chunk(ChunkCoord::new(0, 0)).unwrap();
    let restored = origin
        .entities
        .iter()
        .find(|e| e.kind.id() == 8)
        .expect("fence restored");
    assert_eq!(restored, &fence);
    assert!(!restored.is_carried());
    assert!(!origin.entities.iter().any(|e| e.kind == EntityKind::Torch));
    assert_eq!(origin.items.len(), 1);

    assert_eq!(world.player().unwrap().health, 13);
    let players = world
        .chunks()
        .flat_map(|c| &c.entities)
        .filter(|e| e.is_player())
        .count();
    assert_eq!(players, 1, "exactly one player after reopen");
}

/// Test: the tile grid is the same before and after a reload.
#[test]
fn test_tiles_are_regenerated_identically() {
    let dir = tempfile::tempdir().unwrap();
    let mut world = open(&dir);
    let before = world.window().chunk(ChunkCoord::new(1, 1)).unwrap().tiles.clone();

    teleport(&mut world, -20 * CHUNK_PIXELS, 0);
    teleport(&mut world, 100, 100);

    let after = &world.window().chunk(ChunkCoord::new(1, 1)).unwrap().tiles;
    assert!(before.same_kinds(after));
}

/// Test: entering the cave leaves one cave mouth under the player, and
/// the trip is remembered across a reopen.
#[test]
fn test_cave_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut world = open(&dir);

    world.enter_dimension(Dimension::Cave).unwrap();
    assert_eq!(world.dimension(), Dimension::Cave);
    assert_eq!(world.ambient_brightness(), CAVE_BRIGHTNESS);
    assert!(world.chunks().all(|c| c.dimension() == Dimension::Cave));
    assert!(chunk_file(&dir, "World", "0,0").is_file());

    let block = world.player().unwrap().center_block();
    let (x, y) = block.to_pixel();
    let count_mouths = |world: &World| {
        world
            .chunks()
            .flat_map(|c| &c.entities)
            .filter(|e| e.kind == EntityKind::Cave && e.x == x && e.y == y)
            .count()
    };
    assert_eq!(count_mouths(&world), 1);

    world.enter_dimension(Dimension::Overworld).unwrap();
    assert_eq!(world.dimension(), Dimension::Overworld);
    assert!(chunk_file(&dir, "Cave", &block.chunk().to_string()).is_file());

    world.enter_dimension(Dimension::Cave).unwrap();
    assert_eq!(count_mouths(&world), 1, "cave mouth duplicated");

    world.close().unwrap();
    let world = open(&dir);
    assert_eq!(world.dimension(), Dimension::Cave);
}

/// Test: the player is moved off solid rock when entering the cave.
#[test]
fn test_cave_entry_avoids_solid_tile() {
    let dir = tempfile::tempdir().unwrap();
    let mut world = open(&dir);

    world.enter_dimension(Dimension::Cave).unwrap();

    let block = world.player().unwrap().center_block();
    let below_window = BlockPos::new(block.x, block.y + 1);
    let tile = world.tile_at(block);
    assert!(
        !tile.is_solid() || !world.window().is_resident(below_window.chunk()),
        "player left on {:?}",
        tile.kind
    );
    assert_ne!(tile.kind, TileKind::Air);
}

/// Test: content spawned outside the window is dropped after one tick.
#[test]
fn test_spawn_outside_window_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let mut world = open(&dir);

    world.spawn_entity(Entity::new(EntityKind::Golem, 50 * CHUNK_PIXELS, 0));
    let report = world.tick(&mut NoopTicker).unwrap();

    assert_eq!(report.reconcile.dropped, 1);
    assert!(!world.chunks().flat_map(|c| &c.entities).any(|e| e.kind == EntityKind::Golem));
}

/// Test: a chunk file holding an absurd coordinate loads and ticks without
/// the record.
#[test]
fn test_extreme_coordinate_in_chunk_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = chunk_file(&dir, "World", "0,0");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "2 2147483647 0 9\n2 100 100 9\n!\n").unwrap();

    let mut world = open(&dir);
    world.tick(&mut NoopTicker).unwrap();

    let origin = world.window().chunk(ChunkCoord::new(0, 0)).unwrap();
    let wolves: Vec<_> = origin.entities.iter().filter(|e| e.kind == EntityKind::Wolf).collect();
    assert_eq!(wolves.len(), 1);
    assert_eq!((wolves[0].x, wolves[0].y), (100, 100));
}
