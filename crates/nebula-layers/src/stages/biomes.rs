//! Stages that produce or rewrite final biome ids.

use crate::biome::{Biome, GroupBiomes, hills_variant, is_ocean, is_very_cold, m_variant};
use crate::error::BuildError;
use crate::grid::Grid;
use crate::noise::IntNoise;
use crate::stage::{Alphabet, BoxedGenerator, GridGenerator, check_upstream};

/// Combines two same-sized tiles cell by cell into `base`.
fn merge_tiles(mut base: Grid, other: &Grid, f: impl Fn(i32, i32) -> i32) -> Grid {
    for (value, &second) in base.values_mut().iter_mut().zip(other.values()) {
        *value = f(*value, second);
    }
    base
}

/// Replaces each (optionally rare-flagged) group with a biome drawn from that
/// group's candidate list.
pub struct Materialize {
    noise: IntNoise,
    table: GroupBiomes,
    upstream: BoxedGenerator,
}

impl Materialize {
    /// Wires a materialisation stage over a group upstream.
    ///
    /// # Errors
    ///
    /// Fails if any candidate list is empty or the upstream does not produce
    /// groups.
    pub fn new(
        seed: i32,
        table: GroupBiomes,
        upstream: BoxedGenerator,
    ) -> Result<Self, BuildError> {
        table.validate()?;
        let dims = (upstream.width(), upstream.height());
        check_upstream("materialize", upstream.as_ref(), dims, Alphabet::RareGroup)?;
        Ok(Self {
            noise: IntNoise::new(seed),
            table,
            upstream,
        })
    }

    /// The candidate table in use.
    pub fn table(&self) -> &GroupBiomes {
        &self.table
    }
}

impl GridGenerator for Materialize {
    fn name(&self) -> &'static str {
        "materialize"
    }

    fn width(&self) -> usize {
        self.upstream.width()
    }

    fn height(&self) -> usize {
        self.upstream.height()
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::Biome
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        let mut grid = self.upstream.generate(min_x, min_z);
        let width = grid.width();
        for (i, value) in grid.values_mut().iter_mut().enumerate() {
            let wx = min_x.wrapping_add((i % width) as i32);
            let wz = min_z.wrapping_add((i / width) as i32);
            let candidates = self.table.candidates(*value);
            let pick = self.noise.roll(wx, wz) as usize % candidates.len();
            *value = candidates[pick].id();
        }
        grid
    }
}

/// Shared wiring for stages that rewrite a biome tile under a region mask.
struct Masked {
    biomes: BoxedGenerator,
    mask: BoxedGenerator,
}

impl Masked {
    fn new(
        stage: &'static str,
        biomes: BoxedGenerator,
        mask: BoxedGenerator,
    ) -> Result<Self, BuildError> {
        let dims = (biomes.width(), biomes.height());
        check_upstream(stage, biomes.as_ref(), dims, Alphabet::Biome)?;
        check_upstream(stage, mask.as_ref(), dims, Alphabet::Region)?;
        Ok(Self { biomes, mask })
    }

    fn generate(&self, min_x: i32, min_z: i32, variant: fn(Biome) -> Option<Biome>) -> Grid {
        let mask = self.mask.generate(min_x, min_z);
        merge_tiles(self.biomes.generate(min_x, min_z), &mask, |value, flag| {
            if flag == 0 {
                return value;
            }
            Biome::from_id(value)
                .and_then(variant)
                .map_or(value, Biome::id)
        })
    }
}

/// Swaps biomes for their hills counterpart wherever the mask is non-zero.
pub struct AlternateBiomes {
    inner: Masked,
}

impl AlternateBiomes {
    /// Wires a hills substitution over `biomes`, driven by `mask`.
    ///
    /// # Errors
    ///
    /// Fails if the inputs differ in size or carry the wrong alphabets.
    pub fn new(biomes: BoxedGenerator, mask: BoxedGenerator) -> Result<Self, BuildError> {
        Ok(Self {
            inner: Masked::new("alternate_biomes", biomes, mask)?,
        })
    }
}

impl GridGenerator for AlternateBiomes {
    fn name(&self) -> &'static str {
        "alternate_biomes"
    }

    fn width(&self) -> usize {
        self.inner.biomes.width()
    }

    fn height(&self) -> usize {
        self.inner.biomes.height()
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::Biome
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        self.inner.generate(min_x, min_z, hills_variant)
    }
}

/// Swaps biomes for their "M" counterpart wherever the mask is non-zero.
pub struct MVariants {
    inner: Masked,
}

impl MVariants {
    /// Wires an M-variant substitution over `biomes`, driven by `mask`.
    ///
    /// # Errors
    ///
    /// Fails if the inputs differ in size or carry the wrong alphabets.
    pub fn new(biomes: BoxedGenerator, mask: BoxedGenerator) -> Result<Self, BuildError> {
        Ok(Self {
            inner: Masked::new("m_variants", biomes, mask)?,
        })
    }
}

impl GridGenerator for MVariants {
    fn name(&self) -> &'static str {
        "m_variants"
    }

    fn width(&self) -> usize {
        self.inner.biomes.width()
    }

    fn height(&self) -> usize {
        self.inner.biomes.height()
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::Biome
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        self.inner.generate(min_x, min_z, m_variant)
    }
}

/// Overlays a river map onto the biome map.
///
/// Oceans are never touched. Elsewhere a river marker becomes a frozen river
/// over very cold biomes and a plain river otherwise.
pub struct MixRivers {
    biomes: BoxedGenerator,
    rivers: BoxedGenerator,
}

impl MixRivers {
    /// Wires the final river overlay.
    ///
    /// # Errors
    ///
    /// Fails if the inputs differ in size or carry the wrong alphabets.
    pub fn new(biomes: BoxedGenerator, rivers: BoxedGenerator) -> Result<Self, BuildError> {
        let dims = (biomes.width(), biomes.height());
        check_upstream("mix_rivers", biomes.as_ref(), dims, Alphabet::Biome)?;
        check_upstream("mix_rivers", rivers.as_ref(), dims, Alphabet::River)?;
        Ok(Self { biomes, rivers })
    }
}

impl GridGenerator for MixRivers {
    fn name(&self) -> &'static str {
        "mix_rivers"
    }

    fn width(&self) -> usize {
        self.biomes.width()
    }

    fn height(&self) -> usize {
        self.biomes.height()
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::Biome
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        let rivers = self.rivers.generate(min_x, min_z);
        let river = Biome::River.id();
        merge_tiles(self.biomes.generate(min_x, min_z), &rivers, |value, marker| {
            if is_ocean(value) || marker != river {
                value
            } else if is_very_cold(value) {
                Biome::FrozenRiver.id()
            } else {
                river
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{DESERT, GROUP_COUNT, RARE_FLAG, TEMPERATE};
    use crate::testing::{FnSource, constant};

    fn single_biome_table() -> GroupBiomes {
        let mut table = GroupBiomes::default();
        for group in 0..GROUP_COUNT {
            table.normal[group] = vec![Biome::Plains];
            table.rare[group] = vec![Biome::Jungle];
        }
        table
    }

    #[test]
    fn test_materialize_uses_rare_list_for_flagged_cells() {
        let upstream = FnSource::boxed((8, 8), Alphabet::RareGroup, |x, _| {
            if x < 0 { TEMPERATE | RARE_FLAG } else { TEMPERATE }
        });
        let stage = Materialize::new(1, single_biome_table(), upstream).unwrap();
        let grid = stage.generate(-4, 0);
        for z in 0..8 {
            assert_eq!(grid.get(0, z), Biome::Jungle.id());
            assert_eq!(grid.get(7, z), Biome::Plains.id());
        }
    }

    #[test]
    fn test_materialize_draws_from_group_list() {
        let stage = Materialize::new(
            2,
            GroupBiomes::default(),
            constant((16, 16), Alphabet::Group, DESERT),
        )
        .unwrap();
        let allowed = &stage.table().normal[DESERT as usize];
        let grid = stage.generate(300, -300);
        assert!(grid.values().iter().all(|v| allowed.iter().any(|b| b.id() == *v)));
        assert_eq!(stage.alphabet(), Alphabet::Biome);
    }

    #[test]
    fn test_materialize_wraps_unknown_groups() {
        // 7 wraps to group 2 under the modulo policy.
        let stage = Materialize::new(0, single_biome_table(), constant((4, 4), Alphabet::RareGroup, 7))
            .unwrap();
        assert!(stage.generate(0, 0).values().iter().all(|&v| v == Biome::Plains.id()));
    }

    #[test]
    fn test_materialize_rejects_empty_lists() {
        let mut table = GroupBiomes::default();
        table.normal[0].clear();
        let result = Materialize::new(0, table, constant((4, 4), Alphabet::Group, 0));
        assert!(matches!(result.err(), Some(BuildError::EmptyCandidateList { .. })));
    }

    #[test]
    fn test_alternate_biomes_follow_mask() {
        let biomes = constant((8, 8), Alphabet::Biome, Biome::Desert.id());
        let mask = FnSource::boxed((8, 8), Alphabet::Region, |x, _| x & 1);
        let stage = AlternateBiomes::new(biomes, mask).unwrap();
        let grid = stage.generate(0, 0);
        for x in 0..8 {
            let expected = if x & 1 == 1 { Biome::DesertHills } else { Biome::Desert };
            assert_eq!(grid.get(x, 3), expected.id());
        }
    }

    #[test]
    fn test_m_variants_keep_biomes_without_variant() {
        let biomes = FnSource::boxed((4, 4), Alphabet::Biome, |x, _| {
            if x < 2 { Biome::Ocean.id() } else { Biome::Plains.id() }
        });
        let stage = MVariants::new(biomes, constant((4, 4), Alphabet::Region, 1)).unwrap();
        let grid = stage.generate(0, 0);
        assert_eq!(grid.get(0, 0), Biome::Ocean.id());
        assert_eq!(grid.get(3, 0), Biome::SunflowerPlains.id());
    }

    #[test]
    fn test_masked_stages_check_sizes() {
        let result = MVariants::new(
            constant((4, 4), Alphabet::Biome, 1),
            constant((4, 5), Alphabet::Region, 1),
        );
        assert!(matches!(result.err(), Some(BuildError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_mix_rivers() {
        let biomes = FnSource::boxed((4, 1), Alphabet::Biome, |x, _| {
            [Biome::Ocean, Biome::IcePlains, Biome::Forest, Biome::Forest][x as usize].id()
        });
        let rivers = FnSource::boxed((4, 1), Alphabet::River, |x, _| {
            if x < 3 { Biome::River.id() } else { 0 }
        });
        let stage = MixRivers::new(biomes, rivers).unwrap();
        let grid = stage.generate(0, 0);
        assert_eq!(
            grid.values(),
            &[
                Biome::Ocean.id(),
                Biome::FrozenRiver.id(),
                Biome::River.id(),
                Biome::Forest.id()
            ]
        );
    }

    #[test]
    fn test_mix_rivers_requires_river_alphabet() {
        let result = MixRivers::new(
            constant((4, 4), Alphabet::Biome, 1),
            constant((4, 4), Alphabet::Region, 7),
        );
        assert!(matches!(result.err(), Some(BuildError::AlphabetMismatch { .. })));
    }
}
