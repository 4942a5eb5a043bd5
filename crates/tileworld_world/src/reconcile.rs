//! # Membership Reconciler
//!
//! Keeps every entity and item in the chunk that owns its position.
//!
//! Runs once per tick after the window is stable, in three phases:
//!
//! 1. **Drain**: content queued last tick is delivered to its chunk if that
//!    chunk is resident, otherwise dropped
//! 2. **Scan**: every resident entity and item is ticked; deaths, pickups
//!    and chunk crossings are recorded without touching any list
//! 3. **Apply**: recorded entries are removed from their source chunk and
//!    moved ones are placed in their destination, or queued when that
//!    chunk is not resident
//!
//! The player never dies here and always lands in the centre chunk; the
//! next window tick follows it.

use tileworld_procedural::ChunkCoord;

use crate::entity::Entity;
use crate::item::Item;
use crate::window::WindowCache;

/// Per-tick behaviour of world contents, supplied by the simulation.
///
/// Both hooks default to doing nothing.
pub trait ContentTicker {
    /// Advances one entity. May move it, damage it or kill it.
    fn tick_entity(&mut self, entity: &mut Entity) {
        let _ = entity;
    }

    /// Advances one ground item. Setting `picked_up` removes it.
    fn tick_item(&mut self, item: &mut Item) {
        let _ = item;
    }
}

/// A ticker that leaves everything untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTicker;

impl ContentTicker for NoopTicker {}

/// What one reconcile pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Queued content delivered to a resident chunk.
    pub delivered: usize,
    /// Queued content discarded because its chunk is not resident.
    pub dropped: usize,
    /// Entities and items that crossed a chunk edge.
    pub moved: usize,
    /// Crossings whose destination was not resident; queued for next tick.
    pub queued: usize,
    /// Entities removed at zero health.
    pub removed_dead: usize,
    /// Items the player collected, handed back to the caller.
    pub picked_up: Vec<Item>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Remove,
    Move,
}

/// Recorded changes for one chunk, in ascending index order.
#[derive(Debug)]
struct ChunkScan {
    coord: ChunkCoord,
    entities: Vec<(usize, Outcome)>,
    items: Vec<(usize, Outcome)>,
}

impl ChunkScan {
    fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.items.is_empty()
    }
}

/// Two-phase membership bookkeeping with a pending queue.
#[derive(Debug, Default)]
pub struct MembershipReconciler {
    pending_entities: Vec<Entity>,
    pending_items: Vec<Item>,
}

impl MembershipReconciler {
    /// Creates a reconciler with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an entity for delivery at the next reconcile.
    pub fn queue_entity(&mut self, entity: Entity) {
        self.pending_entities.push(entity);
    }

    /// Queues an item for delivery at the next reconcile.
    pub fn queue_item(&mut self, item: Item) {
        self.pending_items.push(item);
    }

    /// Entities waiting for delivery.
    #[must_use]
    pub fn pending_entities(&self) -> &[Entity] {
        &self.pending_entities
    }

    /// Items waiting for delivery.
    #[must_use]
    pub fn pending_items(&self) -> &[Item] {
        &self.pending_items
    }

    /// Runs drain, scan and apply over the window.
    pub fn reconcile<T: ContentTicker + ?Sized>(
        &mut self,
        window: &mut WindowCache,
        ticker: &mut T,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        self.drain(window, &mut report);
        let scans = Self::scan(window, ticker);
        self.apply(window, scans, &mut report);
        report
    }

    fn drain(&mut self, window: &mut WindowCache, report: &mut ReconcileReport) {
        for entity in std::mem::take(&mut self.pending_entities) {
            match window.insert_entity(entity) {
                Ok(()) => report.delivered += 1,
                Err(entity) => {
                    tracing::debug!(
                        entity = entity.kind.descriptor().name,
                        chunk = %entity.chunk(),
                        "Dropped queued entity outside window"
                    );
                    report.dropped += 1;
                }
            }
        }
        for item in std::mem::take(&mut self.pending_items) {
            match window.insert_item(item) {
                Ok(()) => report.delivered += 1,
                Err(item) => {
                    tracing::debug!(item = item.kind.name(), chunk = %item.chunk(), "Dropped queued item outside window");
                    report.dropped += 1;
                }
            }
        }
    }

    fn scan<T: ContentTicker + ?Sized>(window: &mut WindowCache, ticker: &mut T) -> Vec<ChunkScan> {
        let mut scans = Vec::new();
        for chunk in window.chunks_mut() {
            let coord = chunk.coord();
            let mut scan = ChunkScan {
                coord,
                entities: Vec::new(),
                items: Vec::new(),
            };

            for (index, entity) in chunk.entities.iter_mut().enumerate() {
                ticker.tick_entity(entity);
                if entity.is_dead() && !entity.is_player() {
                    scan.entities.push((index, Outcome::Remove));
                } else if !coord.keeps(entity.center_block()) {
                    scan.entities.push((index, Outcome::Move));
                }
            }

            for (index, item) in chunk.items.iter_mut().enumerate() {
                ticker.tick_item(item);
                if item.picked_up {
                    scan.items.push((index, Outcome::Remove));
                } else if !coord.keeps(item.block()) {
                    scan.items.push((index, Outcome::Move));
                }
            }

            if !scan.is_empty() {
                scans.push(scan);
            }
        }
        scans
    }

    fn apply(&mut self, window: &mut WindowCache, scans: Vec<ChunkScan>, report: &mut ReconcileReport) {
        let mut moving_entities = Vec::new();
        let mut moving_items = Vec::new();

        for scan in scans {
            let Some(chunk) = window.chunk_mut(scan.coord) else {
                continue;
            };
            for &(index, outcome) in scan.entities.iter().rev() {
                let entity = chunk.entities.remove(index);
                match outcome {
                    Outcome::Remove => report.removed_dead += 1,
                    Outcome::Move => moving_entities.push(entity),
                }
            }
            for &(index, outcome) in scan.items.iter().rev() {
                let item = chunk.items.remove(index);
                match outcome {
                    Outcome::Remove => report.picked_up.push(item),
                    Outcome::Move => moving_items.push(item),
                }
            }
        }

        for entity in moving_entities {
            report.moved += 1;
            let entity = if entity.is_player() {
                match window.center_chunk_mut() {
                    Some(center) => {
                        center.entities.push(entity);
                        continue;
                    }
                    None => entity,
                }
            } else {
                entity
            };
            if let Err(entity) = window.insert_entity(entity) {
                self.pending_entities.push(entity);
                report.queued += 1;
            }
        }

        for item in moving_items {
            report.moved += 1;
            if let Err(item) = window.insert_item(item) {
                self.pending_items.push(item);
                report.queued += 1;
            }
        }
    }
}
