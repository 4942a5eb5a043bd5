//! # World Store
//!
//! File-backed persistence for one world.
//!
//! ## Layout
//!
//! ```text
//! <save_root>/<world>/Seeds<ext>                    "elevation moisture"
//! <save_root>/<world>/Player<ext>                   "x y health dimension worldTime"
//! <save_root>/<world>/Chunks/<World|Cave>/<cx>,<cy><ext>
//! ```
//!
//! A missing file is never an error; it means "never written".

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tileworld_procedural::{ChunkCoord, Dimension, SeedPair};

use crate::chunk::Chunk;
use crate::codec::{self, in_pixel_range, PersistedContents};
use crate::config::WorldConfig;
use crate::error::{WorldError, WorldResult};

/// Where a world's chunk contents are read from and written to.
///
/// The window cache only talks to this trait, so tests can observe or fail
/// saves without touching the file system.
pub trait ChunkBacking {
    /// Writes a chunk's persistent contents, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&mut self, chunk: &Chunk) -> WorldResult<()>;

    /// Reads a chunk's persisted contents. `Ok(None)` means never visited.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or names an
    /// unknown entity or item type.
    fn load(&mut self, coord: ChunkCoord, dimension: Dimension)
        -> WorldResult<Option<PersistedContents>>;
}

/// Path builder for one world directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldPaths {
    root: PathBuf,
    extension: String,
}

impl WorldPaths {
    /// Name of the seed file, without extension.
    pub const SEEDS_FILE: &'static str = "Seeds";
    /// Name of the player file, without extension.
    pub const PLAYER_FILE: &'static str = "Player";
    /// Directory holding chunk files.
    pub const CHUNKS_DIR: &'static str = "Chunks";

    /// Paths for world `name` under the configured save root.
    #[must_use]
    pub fn new(config: &WorldConfig, name: &str) -> Self {
        Self {
            root: config.save_root.join(name),
            extension: config.extension.clone(),
        }
    }

    /// The world directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file(&self, dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{stem}{}", self.extension))
    }

    /// Seed pair file.
    #[must_use]
    pub fn seeds(&self) -> PathBuf {
        self.file(&self.root, Self::SEEDS_FILE)
    }

    /// Player record file.
    #[must_use]
    pub fn player(&self) -> PathBuf {
        self.file(&self.root, Self::PLAYER_FILE)
    }

    /// Directory of one dimension's chunk files.
    #[must_use]
    pub fn chunk_dir(&self, dimension: Dimension) -> PathBuf {
        self.root.join(Self::CHUNKS_DIR).join(dimension.dir_name())
    }

    /// Chunk file, named `<cx>,<cy><ext>`.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord, dimension: Dimension) -> PathBuf {
        self.file(&self.chunk_dir(dimension), &coord.to_string())
    }
}

/// The player's own record, kept outside chunk files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerRecord {
    /// Pixel X.
    pub x: i32,
    /// Pixel Y.
    pub y: i32,
    /// Health.
    pub health: i32,
    /// Dimension the player is in.
    pub dimension: Dimension,
    /// Clock value, see [`crate::clock::WorldClock`].
    pub world_time: u32,
}

/// Reads a file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> WorldResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(WorldError::io(path, e)),
    }
}

/// Writes a file, creating parent directories as needed.
fn write_file(path: &Path, contents: &str) -> WorldResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| WorldError::io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| WorldError::io(path, e))
}

fn malformed(path: &Path, reason: impl Into<String>) -> WorldError {
    WorldError::MalformedRecord {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Parses exactly `N` space separated integers.
fn parse_fields<const N: usize>(path: &Path, text: &str) -> WorldResult<[i64; N]> {
    let mut out = [0i64; N];
    let mut tokens = text.split_whitespace();
    for (index, slot) in out.iter_mut().enumerate() {
        let token = tokens
            .next()
            .ok_or_else(|| malformed(path, format!("expected {} fields, found {}", N, index)))?;
        *slot = token
            .parse()
            .map_err(|_| malformed(path, format!("field {} is not an integer: {token:?}", index + 1)))?;
    }
    Ok(out)
}

fn to_i32(path: &Path, value: i64, what: &str) -> WorldResult<i32> {
    i32::try_from(value).map_err(|_| malformed(path, format!("{what} {value} out of range")))
}

/// File store for one world.
#[derive(Clone, Debug)]
pub struct WorldStore {
    paths: WorldPaths,
}

impl WorldStore {
    /// Creates the store for world `name`. No I/O happens until first use.
    #[must_use]
    pub fn new(config: &WorldConfig, name: &str) -> Self {
        Self {
            paths: WorldPaths::new(config, name),
        }
    }

    /// Path builder.
    #[must_use]
    pub const fn paths(&self) -> &WorldPaths {
        &self.paths
    }

    /// Whether a chunk file exists.
    #[must_use]
    pub fn chunk_exists(&self, coord: ChunkCoord, dimension: Dimension) -> bool {
        self.paths.chunk(coord, dimension).is_file()
    }

    /// Reads the seed pair, if the world has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or malformed.
    pub fn load_seeds(&self) -> WorldResult<Option<SeedPair>> {
        let path = self.paths.seeds();
        let Some(text) = read_optional(&path)? else {
            return Ok(None);
        };
        let [elevation, moisture] = parse_fields::<2>(&path, &text)?;
        Ok(Some(SeedPair::new(
            to_i32(&path, elevation, "elevation seed")?,
            to_i32(&path, moisture, "moisture seed")?,
        )))
    }

    /// Writes the seed pair.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] if the file cannot be written.
    pub fn save_seeds(&self, seeds: SeedPair) -> WorldResult<()> {
        write_file(&self.paths.seeds(), &format!("{} {}", seeds.elevation, seeds.moisture))
    }

    /// Reads the player record, if one was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable, malformed, or
    /// names an unknown dimension.
    pub fn load_player(&self) -> WorldResult<Option<PlayerRecord>> {
        let path = self.paths.player();
        let Some(text) = read_optional(&path)? else {
            return Ok(None);
        };
        let [x, y, health, dimension, world_time] = parse_fields::<5>(&path, &text)?;
        let dimension_id = to_i32(&path, dimension, "dimension")?;
        let (x, y) = (to_i32(&path, x, "x")?, to_i32(&path, y, "y")?);
        if !(in_pixel_range(x) && in_pixel_range(y)) {
            return Err(malformed(&path, format!("player position {x} {y} out of range")));
        }
        Ok(Some(PlayerRecord {
            x,
            y,
            health: to_i32(&path, health, "health")?,
            dimension: Dimension::from_id(dimension_id)
                .ok_or(WorldError::UnknownDimension(dimension_id))?,
            world_time: u32::try_from(world_time)
                .map_err(|_| malformed(&path, format!("world time {world_time} out of range")))?,
        }))
    }

    /// Writes the player record.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] if the file cannot be written.
    pub fn save_player(&self, record: &PlayerRecord) -> WorldResult<()> {
        write_file(
            &self.paths.player(),
            &format!(
                "{} {} {} {} {}",
                record.x,
                record.y,
                record.health,
                record.dimension.id(),
                record.world_time
            ),
        )
    }
}

impl ChunkBacking for WorldStore {
    fn save(&mut self, chunk: &Chunk) -> WorldResult<()> {
        let path = self.paths.chunk(chunk.coord(), chunk.dimension());
        write_file(&path, &codec::encode(&chunk.entities, &chunk.items))?;
        tracing::debug!(chunk = %chunk.coord(), dimension = %chunk.dimension(), "Saved chunk");
        Ok(())
    }

    fn load(
        &mut self,
        coord: ChunkCoord,
        dimension: Dimension,
    ) -> WorldResult<Option<PersistedContents>> {
        let path = self.paths.chunk(coord, dimension);
        match read_optional(&path)? {
            Some(text) => codec::decode(&text, &path).map(Some),
            None => Ok(None),
        }
    }
}
