//! Grid debug visualization: turns classification tiles into RGBA images.
//!
//! Used by the `nebula-biomemap` tool and handy in tests when a chain
//! misbehaves: render the intermediate grid and look at it.

use std::collections::HashSet;

use crate::biome::{Biome, DESERT, ICE, MOUNTAINS, OCEAN, RARE_FLAG, TEMPERATE};
use crate::grid::Grid;

/// An RGBA rendering of a grid, one pixel per cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugImage {
    /// Pixels per row.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Row-major RGBA bytes, four per cell.
    pub pixels: Vec<u8>,
}

impl DebugImage {
    /// Colour of the cell at `(x, z)`, or `None` outside the image.
    pub fn rgba(&self, x: usize, z: usize) -> Option<[u8; 4]> {
        if x >= self.width || z >= self.height {
            return None;
        }
        let at = (x + z * self.width) * 4;
        self.pixels[at..at + 4].try_into().ok()
    }

    /// Number of distinct colours, alpha ignored.
    pub fn distinct_colors(&self) -> usize {
        self.pixels
            .chunks_exact(4)
            .map(|px| (px[0], px[1], px[2]))
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Map colour of a final biome id. Unknown ids render magenta.
pub fn biome_color(value: i32) -> (u8, u8, u8) {
    use Biome::*;
    let Some(biome) = Biome::from_id(value) else {
        return (255, 0, 255);
    };
    match biome {
        Ocean => (0, 0, 112),
        DeepOcean => (0, 0, 48),
        FrozenOcean => (144, 144, 160),
        River => (0, 0, 255),
        FrozenRiver => (160, 160, 255),
        Beach => (250, 222, 85),
        StoneBeach => (162, 162, 132),
        ColdBeach => (250, 240, 192),
        Plains | SunflowerPlains => (141, 179, 96),
        Desert | DesertM => (250, 148, 24),
        DesertHills => (210, 95, 18),
        ExtremeHills | ExtremeHillsM => (96, 96, 96),
        ExtremeHillsPlus | ExtremeHillsPlusM | ExtremeHillsEdge => (80, 112, 80),
        Forest | FlowerForest => (5, 102, 33),
        ForestHills => (34, 85, 28),
        BirchForest | BirchForestM => (48, 116, 68),
        BirchForestHills | BirchForestHillsM => (31, 95, 50),
        RoofedForest | RoofedForestM => (64, 81, 26),
        Taiga | TaigaM => (11, 102, 89),
        TaigaHills => (22, 57, 51),
        ColdTaiga | ColdTaigaM => (49, 85, 74),
        ColdTaigaHills => (36, 63, 54),
        MegaTaiga | MegaSpruceTaiga => (89, 102, 81),
        MegaTaigaHills | MegaSpruceTaigaHills => (69, 79, 62),
        Swampland | SwamplandM => (7, 249, 178),
        IcePlains | IcePlainsSpikes => (255, 255, 255),
        IceMountains => (160, 160, 160),
        MushroomIsland => (230, 0, 230),
        MushroomShore => (160, 0, 255),
        Jungle | JungleM => (83, 123, 9),
        JungleHills => (44, 66, 5),
        JungleEdge | JungleEdgeM => (98, 139, 23),
        Savanna | SavannaM => (189, 178, 95),
        SavannaPlateau | SavannaPlateauM => (167, 157, 100),
        Mesa | MesaBryce => (217, 69, 21),
        MesaPlateau | MesaPlateauM => (202, 140, 101),
        MesaPlateauF | MesaPlateauFM => (176, 151, 101),
        Nether => (255, 0, 0),
        End => (128, 128, 255),
    }
}

/// Map colour of a biome group; rare-flagged groups render brighter.
pub fn group_color(value: i32) -> (u8, u8, u8) {
    let (r, g, b): (u8, u8, u8) = match value & !RARE_FLAG {
        OCEAN => (20, 50, 180),
        DESERT => (220, 190, 80),
        TEMPERATE => (60, 150, 50),
        MOUNTAINS => (130, 110, 90),
        ICE => (220, 230, 240),
        _ => (255, 0, 255),
    };
    if value & RARE_FLAG != 0 {
        (r.saturating_add(35), g.saturating_add(35), b.saturating_add(35))
    } else {
        (r, g, b)
    }
}

/// Renders a grid with one pixel per cell using `palette`.
pub fn render_grid(grid: &Grid, palette: impl Fn(i32) -> (u8, u8, u8)) -> DebugImage {
    let pixels = grid
        .values()
        .iter()
        .flat_map(|&value| {
            let (r, g, b) = palette(value);
            [r, g, b, 255]
        })
        .collect();
    DebugImage {
        width: grid.width(),
        height: grid.height(),
        pixels,
    }
}

/// Renders a final biome grid with [`biome_color`].
pub fn render_biome_map(grid: &Grid) -> DebugImage {
    render_grid(grid, biome_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_biomes_never_use_the_unknown_color() {
        for biome in Biome::ALL {
            assert_ne!(biome_color(biome.id()), (255, 0, 255), "{biome:?}");
        }
        assert_eq!(biome_color(9999), (255, 0, 255));
    }

    #[test]
    fn test_render_matches_grid_dimensions() {
        let grid = Grid::from_fn(0, 0, 5, 3, |x, _| {
            if x < 2 { Biome::Ocean.id() } else { Biome::Desert.id() }
        });
        let image = render_biome_map(&grid);
        assert_eq!((image.width, image.height), (5, 3));
        assert_eq!(image.pixels.len(), 5 * 3 * 4);
        assert_eq!(image.distinct_colors(), 2);
        let (r, g, b) = biome_color(Biome::Desert.id());
        assert_eq!(image.rgba(4, 2), Some([r, g, b, 255]));
        assert_eq!(image.rgba(5, 0), None);
    }

    #[test]
    fn test_group_palette_marks_rare_cells() {
        assert_ne!(group_color(TEMPERATE), group_color(TEMPERATE | RARE_FLAG));
        assert_eq!(group_color(ICE | RARE_FLAG), (255, 255, 255));
        let grid = Grid::from_fn(0, 0, 2, 1, |x, _| if x == 0 { ICE } else { OCEAN });
        let image = render_grid(&grid, group_color);
        assert_eq!(image.distinct_colors(), 2);
    }
}
