//! # Feature Placement
//!
//! Decides which static objects (cave mouths, trees, tall grass, stone ore)
//! spawn on top of generated tiles.
//!
//! Each feature has its own low-frequency noise channel. A feature spawns on
//! a tile when the tile's receptivity for that feature exceeds the channel's
//! value there. Overworld priority is cave > tree > grass, and grass never
//! grows directly south of a tree.

use crate::noise::{Octave, SimplexNoise};
use crate::tile::TileKind;

/// Two-layer channel shared by caves, trees and stone ore.
const BASE_OCTAVES: [Octave; 2] = [Octave::new(0.1, 1.0), Octave::new(0.1, 0.5)];

/// Grass adds a very coarse third layer so meadows clump.
const GRASS_OCTAVES: [Octave; 3] = [
    Octave::new(0.1, 1.0),
    Octave::new(0.1, 0.5),
    Octave::new(0.05, 0.01),
];

/// Divisor applied to every feature channel.
const CHANNEL_DIVISOR: f64 = 0.2;

/// Receptivity that no channel value can fall below.
const NEVER: f64 = -10.0;

/// Static objects placed by generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Entrance to the cave dimension.
    CaveMouth,
    /// Tree.
    Tree,
    /// Tall grass tuft.
    TallGrass,
    /// Stone ore in the cave dimension.
    StoneOre,
}

impl Feature {
    /// How readily this feature grows on `tile`.
    ///
    /// The feature spawns when the returned value is greater than the
    /// feature channel's noise value. Tiles with no entry default to `0.0`.
    #[must_use]
    pub fn receptivity(self, tile: TileKind) -> f64 {
        use TileKind as T;

        match self {
            Self::CaveMouth => -0.85,
            Self::Tree => match tile {
                T::Grass | T::Topsoil => -0.6,
                T::Dirt | T::GrassyDirt | T::Mud => -0.65,
                T::Gravel | T::GrassyGravel | T::Ocher => -0.8,
                T::GrassyMud => -0.5,
                T::Water | T::Sand | T::Snow => NEVER,
                T::Air | T::Stone => 0.0,
            },
            Self::TallGrass => match tile {
                T::Grass | T::Topsoil => -0.5,
                T::Dirt | T::GrassyDirt | T::Mud => -0.55,
                T::Gravel | T::GrassyGravel | T::Ocher => -0.7,
                T::GrassyMud => -0.4,
                T::Water | T::Sand | T::Snow => NEVER,
                T::Air | T::Stone => 0.0,
            },
            Self::StoneOre => match tile {
                T::Stone => NEVER,
                T::Gravel => -0.5,
                _ => 0.0,
            },
        }
    }
}

/// Noise channels for every feature, derived from the seed pair.
#[derive(Clone, Debug)]
pub struct FeatureClassifier {
    cave_noise: SimplexNoise,
    tree_noise: SimplexNoise,
    grass_noise: SimplexNoise,
    stone_noise: SimplexNoise,
}

impl FeatureClassifier {
    /// Derives the four feature channels from the seed pair.
    ///
    /// Channel seeds use 32-bit wrapping arithmetic so every seed pair,
    /// including extreme ones, yields a valid world.
    #[must_use]
    pub fn new(elevation_seed: i32, moisture_seed: i32) -> Self {
        let sum = elevation_seed.wrapping_add(moisture_seed);
        Self {
            cave_noise: SimplexNoise::new(sum / 3),
            tree_noise: SimplexNoise::new(sum / 2),
            grass_noise: SimplexNoise::new((sum / 3).wrapping_mul(2)),
            stone_noise: SimplexNoise::new(sum.wrapping_mul(2) / 3),
        }
    }

    /// Channel value for `feature` at a global tile coordinate.
    #[must_use]
    pub fn channel(&self, feature: Feature, x: f64, y: f64) -> f64 {
        let (noise, octaves): (&SimplexNoise, &[Octave]) = match feature {
            Feature::CaveMouth => (&self.cave_noise, &BASE_OCTAVES),
            Feature::Tree => (&self.tree_noise, &BASE_OCTAVES),
            Feature::TallGrass => (&self.grass_noise, &GRASS_OCTAVES),
            Feature::StoneOre => (&self.stone_noise, &BASE_OCTAVES),
        };
        noise.weighted_sum(x, y, octaves) / CHANNEL_DIVISOR
    }

    /// Whether `feature` spawns on `tile` at the given coordinate.
    #[inline]
    #[must_use]
    pub fn spawns(&self, feature: Feature, tile: TileKind, x: f64, y: f64) -> bool {
        feature.receptivity(tile) > self.channel(feature, x, y)
    }

    /// Cave mouth or tree decision, ignoring grass.
    ///
    /// Used both for the tile itself and for the north-neighbour check.
    #[must_use]
    pub fn primary_overworld(&self, tile: TileKind, x: f64, y: f64) -> Option<Feature> {
        if self.spawns(Feature::CaveMouth, tile, x, y) {
            Some(Feature::CaveMouth)
        } else if self.spawns(Feature::Tree, tile, x, y) {
            Some(Feature::Tree)
        } else {
            None
        }
    }

    /// Full overworld decision for one tile.
    ///
    /// Grass is refused under a tree using the global tile to the north, so
    /// the first two rows of a chunk follow the same rule as every other row
    /// and no grass gap opens along chunk borders.
    ///
    /// # Arguments
    ///
    /// * `tile` - Tile generated at `(x, y)`
    /// * `north_is_tree` - Lazily evaluated: whether the tile at `(x, y - 1)`
    ///   received a tree
    pub fn overworld(
        &self,
        tile: TileKind,
        x: f64,
        y: f64,
        north_is_tree: impl FnOnce() -> bool,
    ) -> Option<Feature> {
        if let Some(feature) = self.primary_overworld(tile, x, y) {
            return Some(feature);
        }
        if self.spawns(Feature::TallGrass, tile, x, y) && !north_is_tree() {
            return Some(Feature::TallGrass);
        }
        None
    }

    /// Cave decision for one tile.
    #[must_use]
    pub fn cave(&self, tile: TileKind, x: f64, y: f64) -> Option<Feature> {
        self.spawns(Feature::StoneOre, tile, x, y).then_some(Feature::StoneOre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostile_tiles_never_grow_plants() {
        let classifier = FeatureClassifier::new(1, 1);
        for tile in [TileKind::Water, TileKind::Sand, TileKind::Snow] {
            for i in 0..500 {
                let x = f64::from(i) * 3.7;
                let y = f64::from(i) * -1.3;
                assert!(!classifier.spawns(Feature::Tree, tile, x, y));
                assert!(!classifier.spawns(Feature::TallGrass, tile, x, y));
            }
        }
    }

    #[test]
    fn test_ore_never_spawns_inside_rock() {
        let classifier = FeatureClassifier::new(3, 9);
        for i in 0..500 {
            let x = f64::from(i) * 1.1;
            assert_eq!(classifier.cave(TileKind::Stone, x, x * 0.5), None);
        }
    }

    #[test]
    fn test_cave_mouth_outranks_tree() {
        let classifier = FeatureClassifier::new(5, 11);
        for x in 0..200 {
            for y in 0..200 {
                let (fx, fy) = (f64::from(x), f64::from(y));
                if classifier.spawns(Feature::CaveMouth, TileKind::GrassyMud, fx, fy) {
                    assert_eq!(
                        classifier.overworld(TileKind::GrassyMud, fx, fy, || false),
                        Some(Feature::CaveMouth)
                    );
                }
            }
        }
    }

    #[test]
    fn test_grass_blocked_south_of_tree() {
        let classifier = FeatureClassifier::new(8, 8);
        let mut checked = 0;
        for x in 0..300 {
            for y in 0..300 {
                let (fx, fy) = (f64::from(x), f64::from(y));
                if classifier.primary_overworld(TileKind::GrassyMud, fx, fy).is_none()
                    && classifier.spawns(Feature::TallGrass, TileKind::GrassyMud, fx, fy)
                {
                    checked += 1;
                    assert_eq!(classifier.overworld(TileKind::GrassyMud, fx, fy, || true), None);
                    assert_eq!(
                        classifier.overworld(TileKind::GrassyMud, fx, fy, || false),
                        Some(Feature::TallGrass)
                    );
                }
            }
        }
        assert!(checked > 0, "Expected some grass candidates");
    }

    #[test]
    fn test_extreme_seed_pairs_do_not_overflow() {
        let classifier = FeatureClassifier::new(i32::MAX, i32::MAX);
        assert!(classifier.channel(Feature::StoneOre, 1.0, 2.0).is_finite());
        let classifier = FeatureClassifier::new(i32::MIN, -1);
        assert!(classifier.channel(Feature::TallGrass, 1.0, 2.0).is_finite());
    }
}
