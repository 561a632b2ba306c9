//! Seeded integer noise used by every randomised stage.
//!
//! The hash is a pure function of `(seed, x, z)` built from wrapping 32-bit
//! arithmetic, so results are identical on every platform and thread.
//! Adjacent lattice points share low-order bits, so all consumers go through
//! [`IntNoise::roll`], which divides by 7 before any modulus is taken.

/// Divisor applied to the raw hash to discard the correlated low bits.
pub const DECORRELATION_DIVISOR: i32 = 7;

/// Deterministic 2D integer lattice noise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntNoise {
    seed: i32,
}

impl IntNoise {
    /// Creates a noise source for the given stage seed.
    #[inline]
    pub const fn new(seed: i32) -> Self {
        Self { seed }
    }

    /// Returns the seed this source was created with.
    #[inline]
    pub const fn seed(self) -> i32 {
        self.seed
    }

    /// Raw hash of a lattice point, always in `[0, i32::MAX]`.
    #[inline]
    pub fn int_noise_2d(self, x: i32, z: i32) -> i32 {
        let n = x
            .wrapping_add(z.wrapping_mul(57))
            .wrapping_add(self.seed.wrapping_mul(57 * 57));
        let n = (n << 13) ^ n;
        let cubic = n
            .wrapping_mul(n)
            .wrapping_mul(15731)
            .wrapping_add(789_221);
        n.wrapping_mul(cubic).wrapping_add(1_376_312_589) & 0x7fff_ffff
    }

    /// Decorrelated noise value; non-negative.
    #[inline]
    pub fn roll(self, x: i32, z: i32) -> i32 {
        self.int_noise_2d(x, z) / DECORRELATION_DIVISOR
    }

    /// Returns `true` with a probability of `chance` per mille.
    #[inline]
    pub fn roll_permille(self, x: i32, z: i32, chance: i32) -> bool {
        self.roll(x, z) % 1000 < chance
    }

    /// Picks one of two values.
    #[inline]
    pub fn choose_one_of_two(self, x: i32, z: i32, a: i32, b: i32) -> i32 {
        if self.roll(x, z) & 1 == 0 { a } else { b }
    }

    /// Picks one of four values.
    #[inline]
    pub fn choose_one_of_four(self, x: i32, z: i32, a: i32, b: i32, c: i32, d: i32) -> i32 {
        match self.roll(x, z) % 4 {
            0 => a,
            1 => b,
            2 => c,
            _ => d,
        }
    }
}

/// Folds a 64-bit world seed into the 32-bit seed space used by [`IntNoise`].
#[inline]
pub const fn fold_seed(world_seed: i64) -> i32 {
    (world_seed ^ (world_seed >> 32)) as i32
}

/// Derives the seed of an individual stage from the folded world seed.
#[inline]
pub const fn stage_seed(world_seed: i32, offset: i32) -> i32 {
    world_seed.wrapping_add(offset)
}
