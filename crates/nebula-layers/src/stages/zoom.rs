//! Resolution doubling with random-neighbour interpolation.
//!
//! Each upstream 2×2 block `(tl, tr, bl, br)` expands into an output quad:
//!
//! ```text
//! tl              choose(tl, tr)
//! choose(tl, bl)  choose(tl, tr, bl, br)
//! ```
//!
//! Noise is keyed on the output-resolution coordinate of the quad, so a cell
//! comes out the same no matter which tile requested it. Repeated zooms give
//! the pipeline most of its organic distortion.

use crate::error::BuildError;
use crate::grid::Grid;
use crate::noise::IntNoise;
use crate::stage::{
    Alphabet, BoxedGenerator, GridGenerator, check_tile_size, check_upstream, zoom_dims,
};

/// Doubles the linear resolution of its upstream.
pub struct Zoom {
    noise: IntNoise,
    upstream: BoxedGenerator,
    width: usize,
    height: usize,
}

impl Zoom {
    /// Wires a zoom stage producing `width × height` tiles.
    ///
    /// The upstream must produce `(width / 2 + 2) × (height / 2 + 2)` tiles.
    ///
    /// # Errors
    ///
    /// Fails if the upstream tile size does not match or the tile is empty.
    pub fn new(
        seed: i32,
        upstream: BoxedGenerator,
        width: usize,
        height: usize,
    ) -> Result<Self, BuildError> {
        check_tile_size(width, height)?;
        check_upstream(
            "zoom",
            upstream.as_ref(),
            zoom_dims(width, height),
            Alphabet::Region,
        )?;
        Ok(Self {
            noise: IntNoise::new(seed),
            upstream,
            width,
            height,
        })
    }
}

impl GridGenerator for Zoom {
    fn name(&self) -> &'static str {
        "zoom"
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn alphabet(&self) -> Alphabet {
        self.upstream.alphabet()
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        let lower_min_x = min_x >> 1;
        let lower_min_z = min_z >> 1;
        let lower = self.upstream.generate(lower_min_x, lower_min_z);
        let (lower_w, lower_h) = lower.dimensions();

        // Even-aligned doubled tile covering the request plus one phase cell.
        let step_x = (lower_w - 1) * 2;
        let step_z = (lower_h - 1) * 2;
        let mut cache = vec![0i32; step_x * step_z];

        for z in 0..lower_h - 1 {
            let mut idx = z * 2 * step_x;
            let mut prev_z0 = lower.get(0, z);
            let mut prev_z1 = lower.get(0, z + 1);
            let rnd_z = lower_min_z.wrapping_add(z as i32).wrapping_mul(2);

            for x in 0..lower_w - 1 {
                let next_z0 = lower.get(x + 1, z);
                let next_z1 = lower.get(x + 1, z + 1);
                let rnd_x = lower_min_x.wrapping_add(x as i32).wrapping_mul(2);

                cache[idx] = prev_z0;
                cache[idx + step_x] =
                    self.noise
                        .choose_one_of_two(rnd_x, rnd_z.wrapping_add(1), prev_z0, prev_z1);
                cache[idx + 1] =
                    self.noise
                        .choose_one_of_two(rnd_x, rnd_z.wrapping_sub(1), prev_z0, next_z0);
                cache[idx + 1 + step_x] = self
                    .noise
                    .choose_one_of_four(rnd_x, rnd_z, prev_z0, next_z0, prev_z1, next_z1);

                idx += 2;
                prev_z0 = next_z0;
                prev_z1 = next_z1;
            }
        }

        // Odd anchors start one cell into the even-aligned cache.
        let phase_x = (min_x & 1) as usize;
        let phase_z = (min_z & 1) as usize;
        let mut values = Vec::with_capacity(self.width * self.height);
        for z in 0..self.height {
            let start = (z + phase_z) * step_x + phase_x;
            values.extend_from_slice(&cache[start..start + self.width]);
        }
        Grid::from_values(min_x, min_z, self.width, self.height, values)
    }
}
