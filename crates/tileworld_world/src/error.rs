//! # World Error Types
//!
//! All errors that can occur while streaming and persisting a world.
//!
//! A missing file is never an error: it means "never visited" and callers
//! fall back to generation or defaults.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the world engine.
#[derive(Error, Debug)]
pub enum WorldError {
    /// Reading or writing a world file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A chunk file names an entity type that does not exist.
    ///
    /// Never recovered locally.
    #[error("unknown entity type {id:?} in {}", path.display())]
    UnknownEntityType {
        /// The type id token as written in the file.
        id: String,
        /// Chunk file being loaded.
        path: PathBuf,
    },

    /// A chunk file names an item type that does not exist.
    #[error("unknown item type {id} in {}", path.display())]
    UnknownItemType {
        /// The item id.
        id: i32,
        /// Chunk file being loaded.
        path: PathBuf,
    },

    /// Dimension id outside `0` (overworld) and `1` (cave).
    #[error("dimension id {0} does not exist")]
    UnknownDimension(i32),

    /// A seed or player file is structurally broken.
    #[error("malformed record in {}: {reason}", path.display())]
    MalformedRecord {
        /// File being parsed.
        path: PathBuf,
        /// What was wrong.
        reason: String,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WorldError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
