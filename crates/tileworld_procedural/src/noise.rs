//! # Simplex Noise
//!
//! Seeded 2D simplex noise and weighted octave sums.
//!
//! ## Determinism Guarantee
//!
//! A [`SimplexNoise`] built from the same 32-bit seed produces exactly the
//! same values on every platform. Generation never stores per-chunk
//! randomness; everything is recomputed from the seed pair.

/// One term of a weighted octave sum: `weight * noise(x * frequency, y * frequency)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Octave {
    /// Amplitude of this layer.
    pub weight: f64,
    /// Sampling frequency relative to tile coordinates.
    pub frequency: f64,
}

impl Octave {
    /// Creates a new octave term.
    #[inline]
    #[must_use]
    pub const fn new(weight: f64, frequency: f64) -> Self {
        Self { weight, frequency }
    }
}

/// Pre-computed permutation table for noise.
#[derive(Clone)]
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
}

impl PermutationTable {
    /// 12 gradient vectors for 2D simplex.
    const GRADIENTS: [[i8; 2]; 12] = [
        [1, 0], [1, 1], [0, 1], [-1, 1],
        [-1, 0], [-1, -1], [0, -1], [1, -1],
        [1, 0], [0, 1], [-1, 0], [0, -1],
    ];

    fn new(seed: i32) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Mix the seed first: xorshift has a fixed point at zero.
        let mut rng_state = mix_seed(seed);
        for i in (1..256).rev() {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;

            let j = (rng_state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(hash: u8) -> [i8; 2] {
        Self::GRADIENTS[(hash % 12) as usize]
    }
}

/// Spreads a 32-bit seed over 64 bits and guarantees a non-zero state.
#[inline]
const fn mix_seed(seed: i32) -> u64 {
    let mut hash = seed as u32 as u64;
    hash ^= 0x9E37_79B9_7F4A_7C15;
    hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
    hash ^= hash >> 32;
    if hash == 0 {
        0xDEAD_BEEF_CAFE_BABE
    } else {
        hash
    }
}

/// 2D simplex noise generator.
///
/// Produces smooth, continuous values roughly in the range [-1, 1].
///
/// # Example
///
/// ```rust
/// use tileworld_procedural::noise::{Octave, SimplexNoise};
///
/// let noise = SimplexNoise::new(42);
/// let value = noise.sample(100.5, 200.3);
/// assert!(value.abs() <= 1.0);
///
/// let layered = noise.weighted_sum(10.0, 20.0, &[Octave::new(0.5, 1.0), Octave::new(2.0, 0.05)]);
/// assert!(layered.abs() <= 2.5);
/// ```
#[derive(Clone)]
pub struct SimplexNoise {
    seed: i32,
    perm_table: PermutationTable,
}

impl std::fmt::Debug for SimplexNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimplexNoise").field("seed", &self.seed).finish_non_exhaustive()
    }
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_439; // (sqrt(3) - 1) / 2
    /// Unskewing factor for 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6

    /// Creates a new simplex noise generator from a seed.
    #[must_use]
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Returns the seed this generator was built from.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> i32 {
        self.seed
    }

    /// Samples 2D simplex noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = f64::from(i.wrapping_add(j)) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        // Upper or lower triangle of the skewed cell
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1 as u8) + Self::G2;
        let y1 = y0 - f64::from(j1 as u8) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let gi0 = self.perm_table.get(ii + self.perm_table.get(jj) as usize);
        let gi1 = self.perm_table.get(ii + i1 + self.perm_table.get(jj + j1) as usize);
        let gi2 = self.perm_table.get(ii + 1 + self.perm_table.get(jj + 1) as usize);

        let n0 = Self::contribution(x0, y0, gi0);
        let n1 = Self::contribution(x1, y1, gi1);
        let n2 = Self::contribution(x2, y2, gi2);

        // 70.0 normalizes the output to [-1, 1]
        70.0 * (n0 + n1 + n2)
    }

    #[inline]
    fn contribution(x: f64, y: f64, gradient_index: u8) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let grad = PermutationTable::gradient(gradient_index);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
        }
    }

    /// Sums weighted samples taken at each octave's frequency.
    ///
    /// No normalization is applied; callers divide by whatever constant
    /// their thresholds were tuned against.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Global tile coordinates
    /// * `octaves` - Weight/frequency pairs to accumulate
    #[must_use]
    pub fn weighted_sum(&self, x: f64, y: f64, octaves: &[Octave]) -> f64 {
        octaves
            .iter()
            .map(|o| o.weight * self.sample(x * o.frequency, y * o.frequency))
            .sum()
    }
}

/// Fast floor function.
#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) { xi - 1 } else { xi }
}
