//! # Chunk Record Format
//!
//! Text, line oriented, space separated. Only mutable contents are stored;
//! tiles are regenerated from the seed pair.
//!
//! ## Format
//!
//! ```text
//! <entity id> <x> <y> <health> [extra...]     one line per entity
//! !                                           sentinel
//! <item id> <x> <y>                           one line per item
//! ```
//!
//! The player and carried placeables are never written.
//!
//! ## Recovery Policy
//!
//! - Unknown or unreadable entity type id: fatal ([`WorldError::UnknownEntityType`])
//! - Unknown item type id: fatal ([`WorldError::UnknownItemType`])
//! - Item id `0` or unreadable: the line is skipped
//! - Unreadable position or health: the line is skipped with a warning
//! - Position outside [`PIXEL_LIMIT`]: the line is skipped with a warning
//! - Player record (id 1): the line is skipped with a warning
//! - Unreadable extra fields: the kind's default is used
//!
//! A skipped line never aborts the rest of the file.

use std::fmt::Write as _;
use std::path::Path;

use crate::entity::{descriptor_for_id, Entity, EntityKind};
use crate::error::{WorldError, WorldResult};
use crate::item::{Item, ItemKind};

/// Separates the entity section from the item section.
pub const SENTINEL: &str = "!";

/// Largest pixel coordinate magnitude accepted from a chunk file.
pub const PIXEL_LIMIT: i32 = 1 << 30;

/// Whether a pixel coordinate is small enough for footprint, block and
/// chunk arithmetic to stay in range.
#[inline]
#[must_use]
pub const fn in_pixel_range(value: i32) -> bool {
    value > -PIXEL_LIMIT && value < PIXEL_LIMIT
}

/// Entities and items read back from a chunk file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistedContents {
    /// Rehydrated entities; placeables are already placed.
    pub entities: Vec<Entity>,
    /// Ground items.
    pub items: Vec<Item>,
}

impl PersistedContents {
    /// Whether nothing was stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.items.is_empty()
    }
}

/// Serializes the persistent subset of a chunk's contents.
#[must_use]
pub fn encode<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
    items: impl IntoIterator<Item = &'a Item>,
) -> String {
    let mut out = String::new();

    for entity in entities.into_iter().filter(|e| e.is_persistent()) {
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "{} {} {} {}",
            entity.kind.id(),
            entity.x,
            entity.y,
            entity.health
        );
        for extra in entity.kind.extra_fields() {
            let _ = write!(out, " {extra}");
        }
        out.push('\n');
    }

    out.push_str(SENTINEL);
    out.push('\n');

    for item in items {
        let _ = writeln!(out, "{} {} {}", item.kind.id(), item.x, item.y);
    }

    out
}

/// Parses a chunk file.
///
/// # Arguments
///
/// * `text` - File contents
/// * `path` - Used only for error context and log messages
///
/// # Errors
///
/// Returns [`WorldError::UnknownEntityType`] or
/// [`WorldError::UnknownItemType`] when a record names a type that does not
/// exist.
pub fn decode(text: &str, path: &Path) -> WorldResult<PersistedContents> {
    let mut contents = PersistedContents::default();
    let mut section = 0u8;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();

        if line == SENTINEL {
            section += 1;
            if section > 1 {
                tracing::warn!(path = %path.display(), line_no, "extra sentinel, ignoring rest of file");
                break;
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if section == 0 {
            if let Some(entity) = decode_entity(&fields, path, line_no)? {
                contents.entities.push(entity);
            }
        } else if let Some(item) = decode_item(&fields, path, line_no)? {
            contents.items.push(item);
        }
    }

    Ok(contents)
}

fn field(fields: &[&str], index: usize) -> Option<i32> {
    fields.get(index).and_then(|token| token.parse().ok())
}

fn decode_entity(fields: &[&str], path: &Path, line_no: usize) -> WorldResult<Option<Entity>> {
    let token = fields.first().copied().unwrap_or_default();
    let descriptor = token
        .parse()
        .ok()
        .and_then(descriptor_for_id)
        .ok_or_else(|| WorldError::UnknownEntityType {
            id: token.to_owned(),
            path: path.to_path_buf(),
        })?;
    if descriptor.id == EntityKind::Player.id() {
        tracing::warn!(path = %path.display(), line_no, "player record in chunk file skipped");
        return Ok(None);
    }

    let (Some(x), Some(y), Some(health)) = (field(fields, 1), field(fields, 2), field(fields, 3))
    else {
        tracing::warn!(
            path = %path.display(),
            line_no,
            entity = descriptor.name,
            "malformed entity record skipped"
        );
        return Ok(None);
    };
    if !(in_pixel_range(x) && in_pixel_range(y)) {
        tracing::warn!(
            path = %path.display(),
            line_no,
            entity = descriptor.name,
            x,
            y,
            "entity position out of range, record skipped"
        );
        return Ok(None);
    }

    let kind = descriptor.decode(fields.get(4..).unwrap_or_default());
    let mut entity = Entity::with_health(kind, x, y, health);
    if descriptor.placeable {
        entity.place();
    }
    Ok(Some(entity))
}

fn decode_item(fields: &[&str], path: &Path, line_no: usize) -> WorldResult<Option<Item>> {
    let Some(id) = field(fields, 0) else {
        tracing::warn!(path = %path.display(), line_no, "malformed item id skipped");
        return Ok(None);
    };
    if id == 0 {
        return Ok(None);
    }
    let kind = ItemKind::from_id(id).ok_or_else(|| WorldError::UnknownItemType {
        id,
        path: path.to_path_buf(),
    })?;

    let (Some(x), Some(y)) = (field(fields, 1), field(fields, 2)) else {
        tracing::warn!(path = %path.display(), line_no, item = kind.name(), "malformed item record skipped");
        return Ok(None);
    };
    if !(in_pixel_range(x) && in_pixel_range(y)) {
        tracing::warn!(
            path = %path.display(),
            line_no,
            item = kind.name(),
            x,
            y,
            "item position out of range, record skipped"
        );
        return Ok(None);
    }
    Ok(Some(Item::new(kind, x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FenceAlignment;

    fn path() -> &'static Path {
        Path::new("0,0.pgsf")
    }

    #[test]
    fn test_encode_layout() {
        let entities = vec![
            Entity::with_health(EntityKind::Wolf, 100, 100, 9),
            Entity::new(EntityKind::Player, 5, 5),
        ];
        let items = vec![Item::new(ItemKind::Apple, 64, -3)];

        assert_eq!(encode(&entities, &items), "2 100 100 9\n!\n3 64 -3\n");
    }

    #[test]
    fn test_empty_chunk_is_just_the_sentinel() {
        assert_eq!(encode(&Vec::<Entity>::new(), &Vec::<Item>::new()), "!\n");
        assert!(decode("!\n", path()).unwrap().is_empty());
        assert!(decode("", path()).unwrap().is_empty());
    }

    #[test]
    fn test_carried_placeables_are_not_written() {
        let carried = Entity::new(EntityKind::Torch, 0, 0);
        let mut placed = Entity::new(EntityKind::Torch, 64, 0);
        placed.place();

        let text = encode(&[carried, placed], &Vec::<Item>::new());
        assert_eq!(text, "9 64 0 1\n!\n");
    }

    #[test]
    fn test_fence_round_trip_keeps_alignment_and_places() {
        let mut fence = Entity::with_health(
            EntityKind::StoneFence { alignment: FenceAlignment::LeftRight },
            128,
            256,
            77,
        );
        fence.place();

        let text = encode(std::slice::from_ref(&fence), &Vec::<Item>::new());
        assert_eq!(text, "8 128 256 77 1\n!\n");

        let decoded = decode(&text, path()).unwrap();
        assert_eq!(decoded.entities, vec![fence]);
        assert!(!decoded.entities[0].is_carried());
    }

    #[test]
    fn test_every_placeable_is_placed_on_load() {
        let text = "7 0 0 50 0\n8 0 0 100\n9 0 0 1\n10 0 0 8\n11 0 0 8\n15 0 0 8\n!\n";
        let decoded = decode(text, path()).unwrap();
        assert_eq!(decoded.entities.len(), 6);
        assert!(decoded.entities.iter().all(|e| !e.is_carried()));
    }

    #[test]
    fn test_unknown_entity_is_fatal() {
        let err = decode("99 0 0 1\n!\n", path()).unwrap_err();
        assert!(matches!(err, WorldError::UnknownEntityType { ref id, .. } if id == "99"));

        let err = decode("wolf 0 0 1\n!\n", path()).unwrap_err();
        assert!(matches!(err, WorldError::UnknownEntityType { .. }));
    }

    #[test]
    fn test_unknown_item_is_fatal() {
        let err = decode("!\n42 0 0\n", path()).unwrap_err();
        assert!(matches!(err, WorldError::UnknownItemType { id: 42, .. }));
    }

    #[test]
    fn test_malformed_fields_skip_only_that_line() {
        let text = "2 100 x 9\n2 1 2 3\n!\n0 5 5\nq 1 1\n1 zz 0\n6 7 8\n";
        let decoded = decode(text, path()).unwrap();

        assert_eq!(decoded.entities, vec![Entity::with_health(EntityKind::Wolf, 1, 2, 3)]);
        assert_eq!(decoded.items, vec![Item::new(ItemKind::Torch, 7, 8)]);
    }

    #[test]
    fn test_extreme_positions_are_skipped() {
        let text = "2 2147483647 0 9\n2 0 -2147483648 9\n2 64 64 9\n!\n3 2147483647 5\n3 5 5\n";
        let decoded = decode(text, path()).unwrap();

        assert_eq!(decoded.entities, vec![Entity::with_health(EntityKind::Wolf, 64, 64, 9)]);
        assert_eq!(decoded.items, vec![Item::new(ItemKind::Apple, 5, 5)]);
    }

    #[test]
    fn test_pixel_range_bounds() {
        assert!(in_pixel_range(0));
        assert!(in_pixel_range(PIXEL_LIMIT - 1));
        assert!(in_pixel_range(-PIXEL_LIMIT + 1));
        assert!(!in_pixel_range(PIXEL_LIMIT));
        assert!(!in_pixel_range(i32::MIN));
    }

    #[test]
    fn test_player_line_is_skipped() {
        let decoded = decode("1 64 64 20\n2 0 0 9\n!\n", path()).unwrap();

        assert_eq!(decoded.entities.len(), 1);
        assert!(!decoded.entities.iter().any(Entity::is_player));
    }

    #[test]
    fn test_trailing_spaces_and_blank_lines_tolerated() {
        let decoded = decode("\n2 1 2 3  \n\n!\n\n1 0 0\n", path()).unwrap();
        assert_eq!(decoded.entities.len(), 1);
        assert_eq!(decoded.items.len(), 1);
    }
}
