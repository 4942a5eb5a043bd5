//! # Biome Classification
//!
//! Maps the two climate channels (elevation, moisture) to a ground tile.
//!
//! Both channels are 7-octave weighted sums sampled at global tile
//! coordinates, then divided by a fixed constant so the decision table's
//! thresholds see values roughly in [-1, 1].

use crate::noise::{Octave, SimplexNoise};
use crate::tile::TileKind;

/// Elevation layers, coarsest last.
const ELEVATION_OCTAVES: [Octave; 7] = [
    Octave::new(0.05, 1.0),
    Octave::new(0.05, 0.5),
    Octave::new(0.2, 0.1),
    Octave::new(2.0, 0.05),
    Octave::new(7.0, 0.01),
    Octave::new(14.0, 0.005),
    Octave::new(18.0, 0.001),
];

/// Moisture layers, sampled at the same frequencies as elevation.
const MOISTURE_OCTAVES: [Octave; 7] = [
    Octave::new(0.1, 1.0),
    Octave::new(0.2, 0.5),
    Octave::new(1.0, 0.1),
    Octave::new(2.0, 0.05),
    Octave::new(7.0, 0.01),
    Octave::new(12.0, 0.005),
    Octave::new(16.0, 0.001),
];

/// Climate sample at one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    /// Normalized elevation.
    pub elevation: f64,
    /// Normalized moisture.
    pub moisture: f64,
}

/// Classifies overworld tiles from elevation and moisture noise.
#[derive(Clone, Debug)]
pub struct BiomeClassifier {
    elevation_noise: SimplexNoise,
    moisture_noise: SimplexNoise,
}

impl BiomeClassifier {
    /// Divisor applied to the raw elevation sum.
    pub const ELEVATION_DIVISOR: f64 = 32.0;
    /// Divisor applied to the raw moisture sum.
    pub const MOISTURE_DIVISOR: f64 = 27.5;

    /// Creates a classifier from the elevation and moisture seeds.
    #[must_use]
    pub fn new(elevation_seed: i32, moisture_seed: i32) -> Self {
        Self {
            elevation_noise: SimplexNoise::new(elevation_seed),
            moisture_noise: SimplexNoise::new(moisture_seed),
        }
    }

    /// Elevation at a global tile coordinate.
    #[must_use]
    pub fn elevation(&self, x: f64, y: f64) -> f64 {
        self.elevation_noise.weighted_sum(x, y, &ELEVATION_OCTAVES) / Self::ELEVATION_DIVISOR
    }

    /// Moisture at a global tile coordinate.
    #[must_use]
    pub fn moisture(&self, x: f64, y: f64) -> f64 {
        self.moisture_noise.weighted_sum(x, y, &MOISTURE_OCTAVES) / Self::MOISTURE_DIVISOR
    }

    /// Samples both climate channels.
    #[must_use]
    pub fn climate(&self, x: f64, y: f64) -> Climate {
        Climate {
            elevation: self.elevation(x, y),
            moisture: self.moisture(x, y),
        }
    }

    /// Classifies the tile at a global tile coordinate.
    ///
    /// # Arguments
    ///
    /// * `x` - Global tile X
    /// * `y` - Global tile Y
    #[must_use]
    pub fn classify(&self, x: f64, y: f64) -> TileKind {
        let Climate { elevation, moisture } = self.climate(x, y);
        classify_from_climate(elevation, moisture)
    }
}

/// Ordered decision table from climate to tile.
///
/// Order matters: once a branch matches, later branches are unreachable.
/// The `e > 0.45` tier has no final arm, so very wet highland falls through
/// to the `e > 0.1` tier.
#[must_use]
pub fn classify_from_climate(e: f64, m: f64) -> TileKind {
    if e < -0.6 {
        return TileKind::Water;
    }
    if e < -0.45 {
        return TileKind::Sand;
    }
    if e > 0.96 {
        return TileKind::Snow;
    }
    if e > 0.85 && m > 0.0 {
        return TileKind::Snow;
    }
    if e > 0.75 {
        return if m > 0.5 {
            TileKind::GrassyGravel
        } else {
            TileKind::Gravel
        };
    }
    if e > 0.45 {
        if m < -0.5 {
            return TileKind::Ocher;
        }
        if m < -0.2 {
            return TileKind::Dirt;
        }
        if m < 0.3 {
            return TileKind::Gravel;
        }
        if m < 0.65 {
            return TileKind::GrassyGravel;
        }
    }
    if e > 0.1 {
        return if m < -0.5 {
            TileKind::Sand
        } else if m < 0.2 {
            TileKind::Dirt
        } else if m < 0.6 {
            TileKind::GrassyDirt
        } else {
            TileKind::Topsoil
        };
    }
    if e > -0.3 {
        return if m < -0.5 {
            TileKind::Sand
        } else if m < 0.0 {
            TileKind::Grass
        } else if m < 0.3 {
            TileKind::Topsoil
        } else if m < 0.6 {
            TileKind::GrassyMud
        } else {
            TileKind::Mud
        };
    }
    if m < -0.5 {
        TileKind::Sand
    } else if m < 0.2 {
        TileKind::Grass
    } else if m < 0.5 {
        TileKind::Topsoil
    } else {
        TileKind::GrassyMud
    }
}

/// Cave floor: two-octave noise thresholded into gravel and stone.
#[must_use]
pub fn classify_cave(noise: &SimplexNoise, x: f64, y: f64) -> TileKind {
    let value = noise.weighted_sum(x, y, &[Octave::new(2.0, 0.1), Octave::new(0.8, 0.05)]);
    if value < 0.3 {
        TileKind::Gravel
    } else {
        TileKind::Stone
    }
}
