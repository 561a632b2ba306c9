//! Source stages: they own no upstream and derive every cell from noise.

use crate::biome::{MAX_LAND_GROUP, OCEAN, TEMPERATE};
use crate::error::{BuildError, check_percent};
use crate::grid::Grid;
use crate::noise::IntNoise;
use crate::stage::{Alphabet, GridGenerator, check_tile_size};

/// Uniform random region ids in `[0, range)`.
#[derive(Clone, Debug)]
pub struct Choice {
    noise: IntNoise,
    range: i32,
    width: usize,
    height: usize,
}

impl Choice {
    /// Creates a uniform choice source.
    ///
    /// # Errors
    ///
    /// Fails on a non-positive `range` or an empty tile.
    pub fn new(seed: i32, range: i32, width: usize, height: usize) -> Result<Self, BuildError> {
        check_tile_size(width, height)?;
        if range <= 0 {
            return Err(BuildError::InvalidRange(range));
        }
        Ok(Self {
            noise: IntNoise::new(seed),
            range,
            width,
            height,
        })
    }
}

impl GridGenerator for Choice {
    fn name(&self) -> &'static str {
        "choice"
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::Region
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        Grid::from_fn(min_x, min_z, self.width, self.height, |x, z| {
            let wx = min_x.wrapping_add(x as i32);
            let wz = min_z.wrapping_add(z as i32);
            self.noise.roll(wx, wz) % self.range
        })
    }
}

/// Splits the world into ocean (`0`) and random land groups.
///
/// `threshold_percent` is the share of land cells. The world origin is always
/// temperate land so that spawn is habitable.
#[derive(Clone, Debug)]
pub struct LandOcean {
    noise: IntNoise,
    threshold_percent: i32,
    width: usize,
    height: usize,
}

impl LandOcean {
    /// Creates a land/ocean classifier.
    ///
    /// # Errors
    ///
    /// Fails if the threshold is outside `0..=100` or the tile is empty.
    pub fn new(
        seed: i32,
        threshold_percent: i32,
        width: usize,
        height: usize,
    ) -> Result<Self, BuildError> {
        check_tile_size(width, height)?;
        Ok(Self {
            noise: IntNoise::new(seed),
            threshold_percent: check_percent("land_threshold_percent", threshold_percent)?,
            width,
            height,
        })
    }
}

impl GridGenerator for LandOcean {
    fn name(&self) -> &'static str {
        "land_ocean"
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::Group
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        let mut grid = Grid::from_fn(min_x, min_z, self.width, self.height, |x, z| {
            let rnd = self
                .noise
                .roll(min_x.wrapping_add(x as i32), min_z.wrapping_add(z as i32));
            if rnd % 100 < self.threshold_percent {
                (rnd / 101) % MAX_LAND_GROUP + 1
            } else {
                OCEAN
            }
        });

        if grid.contains_world(0, 0) {
            let (x, z) = (min_x.unsigned_abs() as usize, min_z.unsigned_abs() as usize);
            grid.set(x, z, TEMPERATE);
        }
        grid
    }
}
