//! Per-cell random rewrites. Each stage reads its upstream at the same anchor
//! and size and rolls noise independently for every cell.

use crate::biome::{MAX_LAND_GROUP, OCEAN, RARE_FLAG};
use crate::error::{BuildError, check_permille};
use crate::grid::Grid;
use crate::noise::IntNoise;
use crate::stage::{Alphabet, BoxedGenerator, GridGenerator, check_upstream, check_value};

/// Applies `f(value, world_x, world_z)` to every cell of `grid` in place.
fn rewrite_cells(mut grid: Grid, mut f: impl FnMut(i32, i32, i32) -> i32) -> Grid {
    let (min_x, min_z, width) = (grid.min_x(), grid.min_z(), grid.width());
    for (i, value) in grid.values_mut().iter_mut().enumerate() {
        let wx = min_x.wrapping_add((i % width) as i32);
        let wz = min_z.wrapping_add((i / width) as i32);
        *value = f(*value, wx, wz);
    }
    grid
}

/// Raises random land out of the ocean.
///
/// An ocean cell converts with `chance` per mille into a random land group,
/// never back into ocean.
pub struct AddIslands {
    noise: IntNoise,
    chance: i32,
    upstream: BoxedGenerator,
}

impl AddIslands {
    /// Wires an island stage over a group upstream.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range chance or a non-group upstream.
    pub fn new(seed: i32, chance: i32, upstream: BoxedGenerator) -> Result<Self, BuildError> {
        let dims = (upstream.width(), upstream.height());
        check_upstream("add_islands", upstream.as_ref(), dims, Alphabet::Group)?;
        Ok(Self {
            noise: IntNoise::new(seed),
            chance: check_permille("island_chance_permille", chance)?,
            upstream,
        })
    }
}

impl GridGenerator for AddIslands {
    fn name(&self) -> &'static str {
        "add_islands"
    }

    fn width(&self) -> usize {
        self.upstream.width()
    }

    fn height(&self) -> usize {
        self.upstream.height()
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::Group
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        rewrite_cells(self.upstream.generate(min_x, min_z), |value, wx, wz| {
            if value != OCEAN {
                return value;
            }
            let rnd = self.noise.roll(wx, wz);
            if rnd % 1000 < self.chance {
                (rnd / 1003) % MAX_LAND_GROUP + 1
            } else {
                value
            }
        })
    }
}

/// Replaces cells holding `from` with `to`, each with `chance` per mille.
pub struct ReplaceRandomly {
    noise: IntNoise,
    from: i32,
    to: i32,
    chance: i32,
    upstream: BoxedGenerator,
}

impl ReplaceRandomly {
    /// Wires a replacement stage. `to` must belong to the upstream alphabet.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range chance or a `to` value outside the upstream
    /// alphabet.
    pub fn new(
        seed: i32,
        from: i32,
        to: i32,
        chance: i32,
        upstream: BoxedGenerator,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            noise: IntNoise::new(seed),
            from,
            to: check_value("replace_randomly", upstream.alphabet(), to)?,
            chance: check_permille("replace_chance_permille", chance)?,
            upstream,
        })
    }
}

impl GridGenerator for ReplaceRandomly {
    fn name(&self) -> &'static str {
        "replace_randomly"
    }

    fn width(&self) -> usize {
        self.upstream.width()
    }

    fn height(&self) -> usize {
        self.upstream.height()
    }

    fn alphabet(&self) -> Alphabet {
        self.upstream.alphabet()
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        rewrite_cells(self.upstream.generate(min_x, min_z), |value, wx, wz| {
            if value == self.from && self.noise.roll_permille(wx, wz, self.chance) {
                self.to
            } else {
                value
            }
        })
    }
}

/// Overwrites any cell with `to` at `chance` per mille. Used to thin out
/// alteration masks.
pub struct SetRandomly {
    noise: IntNoise,
    to: i32,
    chance: i32,
    upstream: BoxedGenerator,
}

impl SetRandomly {
    /// Wires an overwrite stage.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range chance or a `to` value outside the upstream
    /// alphabet.
    pub fn new(
        seed: i32,
        chance: i32,
        to: i32,
        upstream: BoxedGenerator,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            noise: IntNoise::new(seed),
            to: check_value("set_randomly", upstream.alphabet(), to)?,
            chance: check_permille("set_chance_permille", chance)?,
            upstream,
        })
    }
}

impl GridGenerator for SetRandomly {
    fn name(&self) -> &'static str {
        "set_randomly"
    }

    fn width(&self) -> usize {
        self.upstream.width()
    }

    fn height(&self) -> usize {
        self.upstream.height()
    }

    fn alphabet(&self) -> Alphabet {
        self.upstream.alphabet()
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        rewrite_cells(self.upstream.generate(min_x, min_z), |value, wx, wz| {
            if self.noise.roll_permille(wx, wz, self.chance) {
                self.to
            } else {
                value
            }
        })
    }
}

/// Tags random cells with [`RARE_FLAG`] so materialisation draws from the
/// rare candidate lists.
pub struct RareGroups {
    noise: IntNoise,
    chance: i32,
    upstream: BoxedGenerator,
}

impl RareGroups {
    /// Wires a rare-tagging stage over a group upstream.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range chance or a non-group upstream.
    pub fn new(seed: i32, chance: i32, upstream: BoxedGenerator) -> Result<Self, BuildError> {
        let dims = (upstream.width(), upstream.height());
        check_upstream("rare_groups", upstream.as_ref(), dims, Alphabet::Group)?;
        Ok(Self {
            noise: IntNoise::new(seed),
            chance: check_permille("rare_chance_permille", chance)?,
            upstream,
        })
    }
}

impl GridGenerator for RareGroups {
    fn name(&self) -> &'static str {
        "rare_groups"
    }

    fn width(&self) -> usize {
        self.upstream.width()
    }

    fn height(&self) -> usize {
        self.upstream.height()
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::RareGroup
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        rewrite_cells(self.upstream.generate(min_x, min_z), |value, wx, wz| {
            if self.noise.roll_permille(wx, wz, self.chance) {
                value | RARE_FLAG
            } else {
                value
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{Biome, DESERT, is_group};
    use crate::stages::LandOcean;
    use crate::testing::{FnSource, constant};

    #[test]
    fn test_islands_are_land_groups() {
        let stage = AddIslands::new(4, 1000, constant((16, 16), Alphabet::Group, OCEAN)).unwrap();
        let grid = stage.generate(-100, 40);
        assert!(grid.values().iter().all(|&v| v != OCEAN && is_group(v)));
    }

    #[test]
    fn test_islands_leave_land_alone() {
        let stage = AddIslands::new(4, 1000, constant((8, 8), Alphabet::Group, DESERT)).unwrap();
        assert!(stage.generate(0, 0).values().iter().all(|&v| v == DESERT));

        let never = AddIslands::new(4, 0, constant((8, 8), Alphabet::Group, OCEAN)).unwrap();
        assert!(never.generate(0, 0).values().iter().all(|&v| v == OCEAN));
    }

    #[test]
    fn test_islands_reject_biome_upstream() {
        let result = AddIslands::new(0, 10, constant((4, 4), Alphabet::Biome, 0));
        assert!(matches!(result.err(), Some(BuildError::AlphabetMismatch { .. })));
    }

    #[test]
    fn test_replace_only_touches_from() {
        let upstream = FnSource::boxed((8, 8), Alphabet::Biome, |x, _| {
            if x < 4 { Biome::Plains.id() } else { Biome::Forest.id() }
        });
        let stage = ReplaceRandomly::new(
            1,
            Biome::Plains.id(),
            Biome::SunflowerPlains.id(),
            1000,
            upstream,
        )
        .unwrap();
        let grid = stage.generate(0, 0);
        for z in 0..8 {
            assert_eq!(grid.get(0, z), Biome::SunflowerPlains.id());
            assert_eq!(grid.get(7, z), Biome::Forest.id());
        }
    }

    #[test]
    fn test_replace_validates_target() {
        let result = ReplaceRandomly::new(1, 1, 77, 10, constant((4, 4), Alphabet::Biome, 1));
        assert!(matches!(
            result.err(),
            Some(BuildError::ValueOutsideAlphabet { value: 77, .. })
        ));
        let result = ReplaceRandomly::new(1, 1, 2, 1200, constant((4, 4), Alphabet::Group, 1));
        assert!(matches!(result.err(), Some(BuildError::OutOfRange { value: 1200, .. })));
    }

    #[test]
    fn test_set_randomly_thins_mask() {
        let stage = SetRandomly::new(9, 800, 0, constant((32, 32), Alphabet::Region, 1)).unwrap();
        let grid = stage.generate(0, 0);
        let kept = grid.values().iter().filter(|&&v| v == 1).count();
        assert!(kept > 0 && kept < 32 * 32 / 2, "kept {kept}");
    }

    #[test]
    fn test_rare_flag_preserves_group() {
        let land = Box::new(LandOcean::new(3, 60, 16, 16).unwrap());
        let plain = LandOcean::new(3, 60, 16, 16).unwrap().generate(8, 8);
        let stage = RareGroups::new(5, 500, land).unwrap();
        let grid = stage.generate(8, 8);
        assert_eq!(stage.alphabet(), Alphabet::RareGroup);
        let mut flagged = 0;
        for (tagged, original) in grid.values().iter().zip(plain.values()) {
            assert_eq!(tagged & !RARE_FLAG, *original);
            flagged += usize::from(tagged & RARE_FLAG != 0);
        }
        assert!(flagged > 0);
    }
}
