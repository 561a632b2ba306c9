//! Cross-pattern filters.
//!
//! Every stage here requests its upstream padded by one cell on each side and
//! decides each output cell from the cell itself plus its four axis-aligned
//! neighbours.

use crate::biome::{
    Biome, beach_variant, is_biome_id, is_jungle_compatible, is_mesa_compatible, is_no_downfall,
    is_ocean, is_very_cold, DESERT, ICE, OCEAN, TEMPERATE,
};
use crate::error::{BuildError, check_permille};
use crate::grid::Grid;
use crate::noise::IntNoise;
use crate::stage::{
    Alphabet, BoxedGenerator, GridGenerator, check_tile_size, check_upstream, neighborhood_dims,
};

/// A cell and its four direct neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cross {
    center: i32,
    above: i32,
    below: i32,
    left: i32,
    right: i32,
}

impl Cross {
    /// Reads the cross centred on output cell `(x, z)` of a padded tile.
    #[inline]
    fn at(padded: &Grid, x: usize, z: usize) -> Self {
        Self {
            center: padded.get(x + 1, z + 1),
            above: padded.get(x + 1, z),
            below: padded.get(x + 1, z + 2),
            left: padded.get(x, z + 1),
            right: padded.get(x + 2, z + 1),
        }
    }

    #[inline]
    fn any_neighbor(&self, pred: impl Fn(i32) -> bool) -> bool {
        pred(self.above) || pred(self.below) || pred(self.left) || pred(self.right)
    }

    #[inline]
    fn count_neighbors(&self, pred: impl Fn(i32) -> bool) -> usize {
        [self.above, self.below, self.left, self.right]
            .into_iter()
            .filter(|&v| pred(v))
            .count()
    }
}

/// Upstream tile shared by all cross filters.
struct Padded {
    upstream: BoxedGenerator,
    width: usize,
    height: usize,
}

impl Padded {
    fn new(
        stage: &'static str,
        upstream: BoxedGenerator,
        width: usize,
        height: usize,
        reads: Alphabet,
    ) -> Result<Self, BuildError> {
        check_tile_size(width, height)?;
        check_upstream(stage, upstream.as_ref(), neighborhood_dims(width, height), reads)?;
        Ok(Self {
            upstream,
            width,
            height,
        })
    }

    /// Runs `rule(cross, world_x, world_z)` over every output cell.
    fn map(&self, min_x: i32, min_z: i32, mut rule: impl FnMut(Cross, i32, i32) -> i32) -> Grid {
        let padded = self
            .upstream
            .generate(min_x.wrapping_sub(1), min_z.wrapping_sub(1));
        Grid::from_fn(min_x, min_z, self.width, self.height, |x, z| {
            rule(
                Cross::at(&padded, x, z),
                min_x.wrapping_add(x as i32),
                min_z.wrapping_add(z as i32),
            )
        })
    }
}

/// Removes single-cell artefacts left by zooming.
///
/// When both opposite pairs agree, noise picks the horizontal or vertical
/// value; otherwise a single agreeing pair wins, vertical over horizontal.
pub struct Smooth {
    noise: IntNoise,
    input: Padded,
}

impl Smooth {
    /// Wires a smoothing stage.
    ///
    /// # Errors
    ///
    /// Fails if the upstream is not `(width + 2) × (height + 2)`.
    pub fn new(
        seed: i32,
        upstream: BoxedGenerator,
        width: usize,
        height: usize,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            noise: IntNoise::new(seed),
            input: Padded::new("smooth", upstream, width, height, Alphabet::Region)?,
        })
    }
}

impl GridGenerator for Smooth {
    fn name(&self) -> &'static str {
        "smooth"
    }

    fn width(&self) -> usize {
        self.input.width
    }

    fn height(&self) -> usize {
        self.input.height
    }

    fn alphabet(&self) -> Alphabet {
        self.input.upstream.alphabet()
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        self.input.map(min_x, min_z, |c, wx, wz| {
            let horizontal = c.left == c.right;
            let vertical = c.above == c.below;
            if horizontal && vertical {
                if self.noise.roll(wx, wz) % 2 == 0 {
                    c.left
                } else {
                    c.above
                }
            } else if vertical {
                c.above
            } else if horizontal {
                c.left
            } else {
                c.center
            }
        })
    }
}

/// Turns land bordering the ocean into the matching beach biome.
pub struct Beaches {
    input: Padded,
}

impl Beaches {
    /// Wires a beach stage over a biome upstream.
    ///
    /// # Errors
    ///
    /// Fails on a wrongly sized or non-biome upstream.
    pub fn new(upstream: BoxedGenerator, width: usize, height: usize) -> Result<Self, BuildError> {
        Ok(Self {
            input: Padded::new("beaches", upstream, width, height, Alphabet::Biome)?,
        })
    }
}

impl GridGenerator for Beaches {
    fn name(&self) -> &'static str {
        "beaches"
    }

    fn width(&self) -> usize {
        self.input.width
    }

    fn height(&self) -> usize {
        self.input.height
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::Biome
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        self.input.map(min_x, min_z, |c, _, _| {
            if !is_ocean(c.center) && c.any_neighbor(is_ocean) {
                beach_variant(c.center)
            } else {
                c.center
            }
        })
    }
}

/// Separates biome groups that should never touch.
///
/// Desert next to anything but ocean, desert or temperate becomes temperate;
/// ice next to desert becomes temperate.
pub struct GroupEdges {
    input: Padded,
}

impl GroupEdges {
    /// Wires a group-edge stage over a group upstream.
    ///
    /// # Errors
    ///
    /// Fails on a wrongly sized or non-group upstream.
    pub fn new(upstream: BoxedGenerator, width: usize, height: usize) -> Result<Self, BuildError> {
        Ok(Self {
            input: Padded::new("group_edges", upstream, width, height, Alphabet::Group)?,
        })
    }
}

fn is_desert_compatible(group: i32) -> bool {
    matches!(group, OCEAN | DESERT | TEMPERATE)
}

impl GridGenerator for GroupEdges {
    fn name(&self) -> &'static str {
        "group_edges"
    }

    fn width(&self) -> usize {
        self.input.width
    }

    fn height(&self) -> usize {
        self.input.height
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::Group
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        self.input.map(min_x, min_z, |c, _, _| match c.center {
            DESERT if c.any_neighbor(|v| !is_desert_compatible(v)) => TEMPERATE,
            ICE if c.any_neighbor(|v| v == DESERT) => TEMPERATE,
            other => other,
        })
    }
}

/// Softens incompatible borders between final biomes.
pub struct BiomeEdges {
    input: Padded,
}

impl BiomeEdges {
    /// Wires a biome-edge stage over a biome upstream.
    ///
    /// # Errors
    ///
    /// Fails on a wrongly sized or non-biome upstream.
    pub fn new(upstream: BoxedGenerator, width: usize, height: usize) -> Result<Self, BuildError> {
        Ok(Self {
            input: Padded::new("biome_edges", upstream, width, height, Alphabet::Biome)?,
        })
    }
}

fn biome_edge(c: Cross) -> i32 {
    let Some(biome) = Biome::from_id(c.center) else {
        return c.center;
    };
    let replacement = match biome {
        Biome::Desert | Biome::DesertM | Biome::DesertHills if c.any_neighbor(is_very_cold) => {
            Biome::Plains
        }
        Biome::MesaPlateau | Biome::MesaPlateauF | Biome::MesaPlateauFM | Biome::MesaPlateauM
            if c.any_neighbor(|v| !is_mesa_compatible(v)) =>
        {
            Biome::Desert
        }
        Biome::Jungle if c.any_neighbor(|v| !is_jungle_compatible(v)) => Biome::JungleEdge,
        Biome::JungleM if c.any_neighbor(|v| !is_jungle_compatible(v)) => Biome::JungleEdgeM,
        Biome::Swampland | Biome::SwamplandM if c.any_neighbor(is_no_downfall) => Biome::Plains,
        other => other,
    };
    replacement.id()
}

impl GridGenerator for BiomeEdges {
    fn name(&self) -> &'static str {
        "biome_edges"
    }

    fn width(&self) -> usize {
        self.input.width
    }

    fn height(&self) -> usize {
        self.input.height
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::Biome
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        self.input.map(min_x, min_z, |c, _, _| biome_edge(c))
    }
}

/// Marks the borders between upstream regions as river.
///
/// A cell becomes [`Biome::River`] when any direct neighbour differs from it,
/// and `0` otherwise.
pub struct River {
    input: Padded,
}

impl River {
    /// Wires an edge detector over any upstream.
    ///
    /// # Errors
    ///
    /// Fails if the upstream is not `(width + 2) × (height + 2)`.
    pub fn new(upstream: BoxedGenerator, width: usize, height: usize) -> Result<Self, BuildError> {
        Ok(Self {
            input: Padded::new("river", upstream, width, height, Alphabet::Region)?,
        })
    }
}

impl GridGenerator for River {
    fn name(&self) -> &'static str {
        "river"
    }

    fn width(&self) -> usize {
        self.input.width
    }

    fn height(&self) -> usize {
        self.input.height
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::River
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        self.input.map(min_x, min_z, |c, _, _| {
            if c.any_neighbor(|v| v != c.center) {
                Biome::River.id()
            } else {
                0
            }
        })
    }
}

/// Seeds a special biome into open ocean (mushroom islands, deep ocean).
///
/// Only ocean cells with at least three ocean neighbours are eligible, and
/// each converts with `chance` per mille.
pub struct AddToOcean {
    noise: IntNoise,
    chance: i32,
    to: i32,
    input: Padded,
}

impl AddToOcean {
    /// Wires an ocean-seeding stage.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range chance, a target that is not a biome, or a
    /// wrongly sized or non-biome upstream.
    pub fn new(
        seed: i32,
        chance: i32,
        to: i32,
        upstream: BoxedGenerator,
        width: usize,
        height: usize,
    ) -> Result<Self, BuildError> {
        if !is_biome_id(to) {
            return Err(BuildError::ValueOutsideAlphabet {
                stage: "add_to_ocean",
                value: to,
                alphabet: Alphabet::Biome,
            });
        }
        Ok(Self {
            noise: IntNoise::new(seed),
            chance: check_permille("add_to_ocean_chance_permille", chance)?,
            to,
            input: Padded::new("add_to_ocean", upstream, width, height, Alphabet::Biome)?,
        })
    }
}

impl GridGenerator for AddToOcean {
    fn name(&self) -> &'static str {
        "add_to_ocean"
    }

    fn width(&self) -> usize {
        self.input.width
    }

    fn height(&self) -> usize {
        self.input.height
    }

    fn alphabet(&self) -> Alphabet {
        Alphabet::Biome
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        self.input.map(min_x, min_z, |c, wx, wz| {
            if is_ocean(c.center)
                && c.count_neighbors(is_ocean) >= 3
                && self.noise.roll_permille(wx, wz, self.chance)
            {
                self.to
            } else {
                c.center
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FnSource, constant};

    const SIZE: usize = 8;

    fn padded() -> (usize, usize) {
        neighborhood_dims(SIZE, SIZE)
    }

    #[test]
    fn test_river_on_uniform_field_is_empty() {
        let river = River::new(constant(padded(), Alphabet::Region, 3), SIZE, SIZE).unwrap();
        let grid = river.generate(-4, -4);
        assert!(grid.values().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_river_marks_single_differing_cell() {
        let upstream = FnSource::boxed(padded(), Alphabet::Region, |x, z| {
            if (x, z) == (2, 3) { 9 } else { 1 }
        });
        let river = River::new(upstream, SIZE, SIZE).unwrap();
        let grid = river.generate(0, 0);
        let expected = [(2, 3), (1, 3), (3, 3), (2, 2), (2, 4)];
        for z in 0..SIZE as i32 {
            for x in 0..SIZE as i32 {
                let marked = grid.get_world(x, z) == Some(Biome::River.id());
                assert_eq!(marked, expected.contains(&(x, z)), "({x}, {z})");
            }
        }
    }

    #[test]
    fn test_river_sees_halo_cells() {
        // The odd cell sits just outside the tile; its neighbour inside must still flip.
        let upstream = FnSource::boxed(padded(), Alphabet::Region, |x, z| {
            if (x, z) == (-1, 0) { 5 } else { 0 }
        });
        let river = River::new(upstream, SIZE, SIZE).unwrap();
        let grid = river.generate(0, 0);
        assert_eq!(grid.get(0, 0), Biome::River.id());
        assert_eq!(grid.get(1, 0), 0);
    }

    #[test]
    fn test_beaches_leave_pure_land_unchanged() {
        let upstream = FnSource::boxed(padded(), Alphabet::Biome, |x, z| {
            [Biome::Plains, Biome::Forest, Biome::Taiga, Biome::Desert][((x + z) & 3) as usize]
                .id()
        });
        let reference = FnSource::boxed((SIZE, SIZE), Alphabet::Biome, |x, z| {
            [Biome::Plains, Biome::Forest, Biome::Taiga, Biome::Desert][((x + z) & 3) as usize]
                .id()
        });
        let beaches = Beaches::new(upstream, SIZE, SIZE).unwrap();
        assert_eq!(beaches.generate(-3, 17), reference.generate(-3, 17));
    }

    #[test]
    fn test_beaches_at_coast() {
        // Ocean for x < 0, taiga otherwise.
        let upstream = FnSource::boxed(padded(), Alphabet::Biome, |x, _| {
            if x < 0 { Biome::Ocean.id() } else { Biome::Taiga.id() }
        });
        let beaches = Beaches::new(upstream, SIZE, SIZE).unwrap();
        let grid = beaches.generate(-2, 0);
        for z in 0..SIZE {
            assert_eq!(grid.get(0, z), Biome::Ocean.id());
            assert_eq!(grid.get(2, z), Biome::ColdBeach.id());
            assert_eq!(grid.get(3, z), Biome::Taiga.id());
        }
    }

    #[test]
    fn test_smooth_removes_isolated_cell() {
        let upstream = FnSource::boxed(padded(), Alphabet::Group, |x, z| {
            if (x, z) == (4, 4) { 3 } else { 1 }
        });
        let smooth = Smooth::new(1, upstream, SIZE, SIZE).unwrap();
        let grid = smooth.generate(0, 0);
        assert!(grid.values().iter().all(|&v| v == 1));
        assert_eq!(smooth.alphabet(), Alphabet::Group);
    }

    #[test]
    fn test_smooth_prefers_vertical_pair() {
        // Every column differs from both sides; each column agrees with itself vertically.
        let upstream = FnSource::boxed(padded(), Alphabet::Region, |x, _| x);
        let smooth = Smooth::new(1, upstream, SIZE, SIZE).unwrap();
        let grid = smooth.generate(0, 0);
        for z in 0..SIZE {
            for x in 0..SIZE {
                assert_eq!(grid.get(x, z), x as i32);
            }
        }
    }

    #[test]
    fn test_smooth_breaks_ties_between_disagreeing_pairs() {
        // Left == right and above == below everywhere, but the two pairs hold different values.
        let field = |x: i32, z: i32| (x & 1) * 2 + (z & 1);
        let upstream = FnSource::boxed(padded(), Alphabet::Region, field);
        let smooth = Smooth::new(1, upstream, SIZE, SIZE).unwrap();
        let grid = smooth.generate(0, 0);
        let noise = IntNoise::new(1);
        let (mut took_left, mut took_above) = (0, 0);
        for z in 0..SIZE as i32 {
            for x in 0..SIZE as i32 {
                let (left, above) = (field(x - 1, z), field(x, z - 1));
                assert_ne!(left, above);
                let value = grid.get_world(x, z).unwrap();
                let expected = if noise.roll(x, z) % 2 == 0 { left } else { above };
                assert_eq!(value, expected, "({x}, {z})");
                if value == left {
                    took_left += 1;
                } else {
                    took_above += 1;
                }
            }
        }
        assert!(took_left > 0 && took_above > 0, "{took_left} / {took_above}");
        assert_eq!(smooth.generate(0, 0), grid);
    }

    #[test]
    fn test_group_edges() {
        // Desert band at x == 2, mountains to the right, ice further right.
        let upstream = FnSource::boxed(padded(), Alphabet::Group, |x, _| match x {
            i32::MIN..=2 => DESERT,
            3 => 3,
            4 => DESERT,
            _ => ICE,
        });
        let edges = GroupEdges::new(upstream, SIZE, SIZE).unwrap();
        let grid = edges.generate(0, 0);
        assert_eq!(grid.get(1, 0), DESERT);
        assert_eq!(grid.get(2, 0), TEMPERATE); // touches mountains
        assert_eq!(grid.get(4, 0), TEMPERATE); // touches mountains and ice
        assert_eq!(grid.get(5, 0), TEMPERATE); // ice touching desert
        assert_eq!(grid.get(6, 0), ICE);
    }

    #[test]
    fn test_group_edges_rejects_biome_input() {
        let err = GroupEdges::new(constant(padded(), Alphabet::Biome, 1), SIZE, SIZE)
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::AlphabetMismatch { .. }));
    }

    #[test]
    fn test_biome_edges() {
        let cross = |center: Biome, neighbor: Biome| Cross {
            center: center.id(),
            above: neighbor.id(),
            below: center.id(),
            left: center.id(),
            right: center.id(),
        };
        assert_eq!(biome_edge(cross(Biome::Desert, Biome::IcePlains)), Biome::Plains.id());
        assert_eq!(biome_edge(cross(Biome::MesaPlateau, Biome::Forest)), Biome::Desert.id());
        assert_eq!(biome_edge(cross(Biome::MesaPlateau, Biome::Ocean)), Biome::MesaPlateau.id());
        assert_eq!(biome_edge(cross(Biome::Jungle, Biome::Plains)), Biome::JungleEdge.id());
        assert_eq!(biome_edge(cross(Biome::JungleM, Biome::Plains)), Biome::JungleEdgeM.id());
        assert_eq!(biome_edge(cross(Biome::Swampland, Biome::Desert)), Biome::Plains.id());
        assert_eq!(biome_edge(cross(Biome::Forest, Biome::Desert)), Biome::Forest.id());
    }

    #[test]
    fn test_add_to_ocean_needs_open_water() {
        // Lone ocean cell surrounded by land never converts, open ocean always does.
        let upstream = FnSource::boxed(padded(), Alphabet::Biome, |x, z| {
            if x < 4 || (x, z) == (6, 6) { Biome::Ocean.id() } else { Biome::Plains.id() }
        });
        let stage = AddToOcean::new(3, 1000, Biome::MushroomIsland.id(), upstream, SIZE, SIZE)
            .unwrap();
        let grid = stage.generate(0, 0);
        assert_eq!(grid.get(1, 1), Biome::MushroomIsland.id());
        assert_eq!(grid.get(6, 6), Biome::Ocean.id());
        assert_eq!(grid.get(5, 5), Biome::Plains.id());
    }

    #[test]
    fn test_add_to_ocean_validates_target() {
        let result = AddToOcean::new(0, 10, 9999, constant(padded(), Alphabet::Biome, 0), SIZE, SIZE);
        assert!(matches!(
            result.err(),
            Some(BuildError::ValueOutsideAlphabet { value: 9999, .. })
        ));
        let result = AddToOcean::new(0, 1001, 14, constant(padded(), Alphabet::Biome, 0), SIZE, SIZE);
        assert!(matches!(result.err(), Some(BuildError::OutOfRange { .. })));
    }
}
