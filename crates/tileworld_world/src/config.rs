//! # World Configuration
//!
//! Loaded once at startup from TOML. Every key is optional; missing keys
//! take the defaults below.
//!
//! ```toml
//! save_root = "SaveFile"
//! extension = ".pgsf"
//! save_interval = 30
//! spawn_x = 100
//! spawn_y = 100
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Directory holding every world.
    pub save_root: PathBuf,
    /// Extension appended to every world file, including the dot.
    pub extension: String,
    /// Ticks between periodic flushes of the window and player record.
    pub save_interval: u32,
    /// Pixel X where a brand new world spawns the player.
    pub spawn_x: i32,
    /// Pixel Y where a brand new world spawns the player.
    pub spawn_y: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            save_root: PathBuf::from("SaveFile"),
            extension: ".pgsf".to_owned(),
            save_interval: 30,
            spawn_x: 100,
            spawn_y: 100,
        }
    }
}

impl WorldConfig {
    /// Default configuration rooted at `save_root`.
    #[must_use]
    pub fn with_save_root(save_root: impl Into<PathBuf>) -> Self {
        Self {
            save_root: save_root.into(),
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] if the document does not parse
    /// or fails validation.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| WorldError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] if the file cannot be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn load(path: &Path) -> WorldResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| WorldError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Serializes the configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> WorldResult<String> {
        toml::to_string(self).map_err(|e| WorldError::InvalidConfig(e.to_string()))
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the first bad key.
    pub fn validate(&self) -> WorldResult<()> {
        if self.extension.is_empty() {
            return Err(WorldError::InvalidConfig("extension must not be empty".into()));
        }
        if self.extension.contains(&['/', '\\'][..]) {
            return Err(WorldError::InvalidConfig(format!(
                "extension {:?} must not contain a path separator",
                self.extension
            )));
        }
        if self.save_interval == 0 {
            return Err(WorldError::InvalidConfig("save_interval must be at least 1".into()));
        }
        Ok(())
    }
}
