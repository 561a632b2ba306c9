//! Tunables of the default world chain.

use serde::{Deserialize, Serialize};

use crate::biome::{Biome, GroupBiomes};
use crate::error::{BuildError, check_percent, check_permille};

/// Upper bound for the configurable zoom counts.
pub const MAX_ZOOM_LEVELS: u32 = 8;

/// Turns some cells of one biome into another after materialisation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Biome to replace.
    pub from: Biome,
    /// Replacement biome.
    pub to: Biome,
    /// Chance per matching cell, in permille.
    pub chance_permille: i32,
}

/// Parameters of the default biome chain.
///
/// Percentages are `0..=100`, per-mille chances `0..=1000`. Call
/// [`validate`](Self::validate) before building; the builder does so as well.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerParams {
    /// Share of land cells in the initial land/ocean split.
    pub land_threshold_percent: i32,
    /// Chance for an ocean group cell to become an island.
    pub island_chance_permille: i32,
    /// Chance for a group cell to be tagged rare.
    pub rare_biome_chance_permille: i32,
    /// Random biome swaps applied right after materialisation, in order.
    pub replacements: Vec<Replacement>,
    /// Chance for open ocean to seed a mushroom island.
    pub ocean_seed_chance_permille: i32,
    /// Chance for open ocean to deepen.
    pub deep_ocean_chance_permille: i32,
    /// Extra zooms between the land/ocean split and the first island pass.
    /// Larger values give larger continents.
    pub continent_zoom_levels: u32,
    /// Zooms applied to the river region map before edge detection.
    /// Larger values space rivers further apart.
    pub river_zoom_levels: u32,
    /// Candidate biomes per group.
    pub group_biomes: GroupBiomes,
}

impl Default for LayerParams {
    fn default() -> Self {
        Self {
            land_threshold_percent: 30,
            island_chance_permille: 30,
            rare_biome_chance_permille: 50,
            replacements: vec![Replacement {
                from: Biome::Plains,
                to: Biome::SunflowerPlains,
                chance_permille: 20,
            }],
            ocean_seed_chance_permille: 8,
            deep_ocean_chance_permille: 300,
            continent_zoom_levels: 1,
            river_zoom_levels: 5,
            group_biomes: GroupBiomes::default(),
        }
    }
}

impl LayerParams {
    /// Checks every tunable against its range.
    ///
    /// # Errors
    ///
    /// Returns the first offending tunable as a [`BuildError`].
    pub fn validate(&self) -> Result<(), BuildError> {
        check_percent("land_threshold_percent", self.land_threshold_percent)?;
        check_permille("island_chance_permille", self.island_chance_permille)?;
        check_permille("rare_biome_chance_permille", self.rare_biome_chance_permille)?;
        check_permille("ocean_seed_chance_permille", self.ocean_seed_chance_permille)?;
        check_permille("deep_ocean_chance_permille", self.deep_ocean_chance_permille)?;
        for replacement in &self.replacements {
            check_permille("replacement.chance_permille", replacement.chance_permille)?;
        }
        check_zoom_levels("continent_zoom_levels", self.continent_zoom_levels)?;
        check_zoom_levels("river_zoom_levels", self.river_zoom_levels)?;
        self.group_biomes.validate()
    }
}

fn check_zoom_levels(name: &'static str, levels: u32) -> Result<(), BuildError> {
    if levels <= MAX_ZOOM_LEVELS {
        Ok(())
    } else {
        Err(BuildError::OutOfRange {
            name,
            value: i32::try_from(levels).unwrap_or(i32::MAX),
            max: MAX_ZOOM_LEVELS as i32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LayerParams::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_tunables() {
        let params = LayerParams {
            land_threshold_percent: 101,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(BuildError::OutOfRange {
                name: "land_threshold_percent",
                ..
            })
        ));

        let mut params = LayerParams::default();
        params.replacements[0].chance_permille = -5;
        assert!(params.validate().is_err());

        let params = LayerParams {
            river_zoom_levels: 40,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(BuildError::OutOfRange { value: 40, max: 8, .. })
        ));
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let params: LayerParams = ron::from_str("(land_threshold_percent: 45)").unwrap();
        assert_eq!(params.land_threshold_percent, 45);
        assert_eq!(params.river_zoom_levels, 5);
        assert_eq!(params.group_biomes, GroupBiomes::default());
    }

    #[test]
    fn test_ron_roundtrip() {
        let params = LayerParams::default();
        let text = ron::ser::to_string_pretty(&params, ron::ser::PrettyConfig::default()).unwrap();
        let back: LayerParams = ron::from_str(&text).unwrap();
        assert_eq!(params, back);
    }
}
