//! # TILEWORLD World Engine
//!
//! Streams a procedurally generated tile world around the player, keeping
//! only a 3x3 window of chunks in memory and everything else on disk.
//!
//! ## Design Principles
//!
//! 1. **Tiles are derived** - Chunk files hold only entities and items; tiles
//!    are regenerated from the seed pair on every load
//! 2. **Save before drop** - A chunk leaving the window is written first; if
//!    that fails it stays in memory until a retry succeeds
//! 3. **Two-phase membership** - Chunk crossings are recorded during the
//!    scan and applied afterwards, never while a list is being walked
//! 4. **One owner** - A [`World`] owns its window; there is no global state
//!
//! ## Core Components
//!
//! - [`WorldStore`] - Seed, player and chunk files
//! - [`WindowCache`] - The resident 3x3 window: shift, evict, fill
//! - [`MembershipReconciler`] - Moves content between chunks
//! - [`World`] - Tick loop, dimensions, clock, periodic flush
//!
//! ## Example
//!
//! ```rust,no_run
//! use tileworld_world::{NoopTicker, World, WorldConfig};
//!
//! let mut world = World::open(WorldConfig::default(), "Alpha", None)?;
//! for _ in 0..60 {
//!     world.tick(&mut NoopTicker)?;
//! }
//! world.close()?;
//! # Ok::<(), tileworld_world::WorldError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod clock;
pub mod codec;
pub mod config;
pub mod entity;
pub mod error;
pub mod item;
pub mod reconcile;
pub mod store;
pub mod window;
pub mod world;

pub use chunk::Chunk;
pub use clock::{DayPhase, WorldClock, CAVE_BRIGHTNESS};
pub use codec::PersistedContents;
pub use config::WorldConfig;
pub use entity::{descriptor_for_id, Entity, EntityDescriptor, EntityKind, FenceAlignment, Placement};
pub use error::{WorldError, WorldResult};
pub use item::{Item, ItemKind};
pub use reconcile::{ContentTicker, MembershipReconciler, NoopTicker, ReconcileReport};
pub use store::{ChunkBacking, PlayerRecord, WorldPaths, WorldStore};
pub use window::{Direction, FlushReport, ShiftReport, WindowCache, WINDOW_SIZE};
pub use world::{TickReport, World};

pub use tileworld_procedural::{BlockPos, ChunkCoord, Dimension, SeedPair, Tile, TileKind};
