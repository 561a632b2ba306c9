//! The closed enumeration of final biome identifiers.

use serde::{Deserialize, Serialize};

/// Offset between a biome and its "M" variant.
pub const VARIANT_OFFSET: i32 = 128;

/// Final biome identifiers written by the late pipeline stages.
///
/// Ids `0..=39` are the base biomes; ids `>= 128` are the statistically
/// rarer "M" variants, numbered as `base + 128`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum Biome {
    Ocean = 0,
    Plains = 1,
    Desert = 2,
    ExtremeHills = 3,
    Forest = 4,
    Taiga = 5,
    Swampland = 6,
    River = 7,
    Nether = 8,
    End = 9,
    FrozenOcean = 10,
    FrozenRiver = 11,
    IcePlains = 12,
    IceMountains = 13,
    MushroomIsland = 14,
    MushroomShore = 15,
    Beach = 16,
    DesertHills = 17,
    ForestHills = 18,
    TaigaHills = 19,
    ExtremeHillsEdge = 20,
    Jungle = 21,
    JungleHills = 22,
    JungleEdge = 23,
    DeepOcean = 24,
    StoneBeach = 25,
    ColdBeach = 26,
    BirchForest = 27,
    BirchForestHills = 28,
    RoofedForest = 29,
    ColdTaiga = 30,
    ColdTaigaHills = 31,
    MegaTaiga = 32,
    MegaTaigaHills = 33,
    ExtremeHillsPlus = 34,
    Savanna = 35,
    SavannaPlateau = 36,
    Mesa = 37,
    MesaPlateauF = 38,
    MesaPlateau = 39,

    SunflowerPlains = 129,
    DesertM = 130,
    ExtremeHillsM = 131,
    FlowerForest = 132,
    TaigaM = 133,
    SwamplandM = 134,
    IcePlainsSpikes = 140,
    JungleM = 149,
    JungleEdgeM = 151,
    BirchForestM = 155,
    BirchForestHillsM = 156,
    RoofedForestM = 157,
    ColdTaigaM = 158,
    MegaSpruceTaiga = 160,
    MegaSpruceTaigaHills = 161,
    ExtremeHillsPlusM = 162,
    SavannaM = 163,
    SavannaPlateauM = 164,
    MesaBryce = 165,
    MesaPlateauFM = 166,
    MesaPlateauM = 167,
}

impl Biome {
    /// Every biome, in id order.
    pub const ALL: [Biome; 61] = [
        Self::Ocean,
        Self::Plains,
        Self::Desert,
        Self::ExtremeHills,
        Self::Forest,
        Self::Taiga,
        Self::Swampland,
        Self::River,
        Self::Nether,
        Self::End,
        Self::FrozenOcean,
        Self::FrozenRiver,
        Self::IcePlains,
        Self::IceMountains,
        Self::MushroomIsland,
        Self::MushroomShore,
        Self::Beach,
        Self::DesertHills,
        Self::ForestHills,
        Self::TaigaHills,
        Self::ExtremeHillsEdge,
        Self::Jungle,
        Self::JungleHills,
        Self::JungleEdge,
        Self::DeepOcean,
        Self::StoneBeach,
        Self::ColdBeach,
        Self::BirchForest,
        Self::BirchForestHills,
        Self::RoofedForest,
        Self::ColdTaiga,
        Self::ColdTaigaHills,
        Self::MegaTaiga,
        Self::MegaTaigaHills,
        Self::ExtremeHillsPlus,
        Self::Savanna,
        Self::SavannaPlateau,
        Self::Mesa,
        Self::MesaPlateauF,
        Self::MesaPlateau,
        Self::SunflowerPlains,
        Self::DesertM,
        Self::ExtremeHillsM,
        Self::FlowerForest,
        Self::TaigaM,
        Self::SwamplandM,
        Self::IcePlainsSpikes,
        Self::JungleM,
        Self::JungleEdgeM,
        Self::BirchForestM,
        Self::BirchForestHillsM,
        Self::RoofedForestM,
        Self::ColdTaigaM,
        Self::MegaSpruceTaiga,
        Self::MegaSpruceTaigaHills,
        Self::ExtremeHillsPlusM,
        Self::SavannaM,
        Self::SavannaPlateauM,
        Self::MesaBryce,
        Self::MesaPlateauFM,
        Self::MesaPlateauM,
    ];

    /// Cell value of this biome.
    #[inline]
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Looks up a biome by cell value.
    #[inline]
    pub fn from_id(id: i32) -> Option<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|index| BY_ID.get(index).copied().flatten())
    }

    /// Returns `true` for the `+128` variant family.
    #[inline]
    pub const fn is_variant(self) -> bool {
        self.id() >= VARIANT_OFFSET
    }

    /// Snake-case display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ocean => "ocean",
            Self::Plains => "plains",
            Self::Desert => "desert",
            Self::ExtremeHills => "extreme_hills",
            Self::Forest => "forest",
            Self::Taiga => "taiga",
            Self::Swampland => "swampland",
            Self::River => "river",
            Self::Nether => "nether",
            Self::End => "end",
            Self::FrozenOcean => "frozen_ocean",
            Self::FrozenRiver => "frozen_river",
            Self::IcePlains => "ice_plains",
            Self::IceMountains => "ice_mountains",
            Self::MushroomIsland => "mushroom_island",
            Self::MushroomShore => "mushroom_shore",
            Self::Beach => "beach",
            Self::DesertHills => "desert_hills",
            Self::ForestHills => "forest_hills",
            Self::TaigaHills => "taiga_hills",
            Self::ExtremeHillsEdge => "extreme_hills_edge",
            Self::Jungle => "jungle",
            Self::JungleHills => "jungle_hills",
            Self::JungleEdge => "jungle_edge",
            Self::DeepOcean => "deep_ocean",
            Self::StoneBeach => "stone_beach",
            Self::ColdBeach => "cold_beach",
            Self::BirchForest => "birch_forest",
            Self::BirchForestHills => "birch_forest_hills",
            Self::RoofedForest => "roofed_forest",
            Self::ColdTaiga => "cold_taiga",
            Self::ColdTaigaHills => "cold_taiga_hills",
            Self::MegaTaiga => "mega_taiga",
            Self::MegaTaigaHills => "mega_taiga_hills",
            Self::ExtremeHillsPlus => "extreme_hills_plus",
            Self::Savanna => "savanna",
            Self::SavannaPlateau => "savanna_plateau",
            Self::Mesa => "mesa",
            Self::MesaPlateauF => "mesa_plateau_f",
            Self::MesaPlateau => "mesa_plateau",
            Self::SunflowerPlains => "sunflower_plains",
            Self::DesertM => "desert_m",
            Self::ExtremeHillsM => "extreme_hills_m",
            Self::FlowerForest => "flower_forest",
            Self::TaigaM => "taiga_m",
            Self::SwamplandM => "swampland_m",
            Self::IcePlainsSpikes => "ice_plains_spikes",
            Self::JungleM => "jungle_m",
            Self::JungleEdgeM => "jungle_edge_m",
            Self::BirchForestM => "birch_forest_m",
            Self::BirchForestHillsM => "birch_forest_hills_m",
            Self::RoofedForestM => "roofed_forest_m",
            Self::ColdTaigaM => "cold_taiga_m",
            Self::MegaSpruceTaiga => "mega_spruce_taiga",
            Self::MegaSpruceTaigaHills => "mega_spruce_taiga_hills",
            Self::ExtremeHillsPlusM => "extreme_hills_plus_m",
            Self::SavannaM => "savanna_m",
            Self::SavannaPlateauM => "savanna_plateau_m",
            Self::MesaBryce => "mesa_bryce",
            Self::MesaPlateauFM => "mesa_plateau_fm",
            Self::MesaPlateauM => "mesa_plateau_m",
        }
    }
}

/// Largest biome id.
const MAX_ID: usize = Biome::MesaPlateauM as usize;

/// Biome per cell value, `None` for gaps in the id range.
const BY_ID: [Option<Biome>; MAX_ID + 1] = {
    let mut table = [None; MAX_ID + 1];
    let mut i = 0;
    while i < Biome::ALL.len() {
        let biome = Biome::ALL[i];
        table[biome.id() as usize] = Some(biome);
        i += 1;
    }
    table
};

/// Returns `true` if `id` names a biome in the closed enumeration.
#[inline]
pub fn is_biome_id(id: i32) -> bool {
    Biome::from_id(id).is_some()
}

/// Ocean biomes. Beaches and river mixing never overwrite these.
pub fn is_ocean(id: i32) -> bool {
    id == Biome::Ocean.id() || id == Biome::DeepOcean.id()
}

/// Biomes cold enough to freeze rivers and repel deserts.
pub fn is_very_cold(id: i32) -> bool {
    matches!(
        Biome::from_id(id),
        Some(
            Biome::FrozenOcean
                | Biome::FrozenRiver
                | Biome::IcePlains
                | Biome::IceMountains
                | Biome::ColdBeach
                | Biome::ColdTaiga
                | Biome::ColdTaigaHills
                | Biome::IcePlainsSpikes
                | Biome::ColdTaigaM
        )
    )
}

/// Arid biomes that never see rain.
pub fn is_no_downfall(id: i32) -> bool {
    matches!(
        Biome::from_id(id),
        Some(
            Biome::Desert
                | Biome::DesertHills
                | Biome::DesertM
                | Biome::Savanna
                | Biome::SavannaM
                | Biome::SavannaPlateau
                | Biome::SavannaPlateauM
                | Biome::Mesa
                | Biome::MesaBryce
                | Biome::MesaPlateau
                | Biome::MesaPlateauF
                | Biome::MesaPlateauFM
                | Biome::MesaPlateauM
                | Biome::Nether
                | Biome::End
        )
    )
}

/// Biomes a mesa plateau may border without an edge.
pub fn is_mesa_compatible(id: i32) -> bool {
    matches!(
        Biome::from_id(id),
        Some(
            Biome::Desert
                | Biome::Mesa
                | Biome::MesaBryce
                | Biome::MesaPlateau
                | Biome::MesaPlateauF
                | Biome::MesaPlateauFM
                | Biome::MesaPlateauM
                | Biome::Ocean
                | Biome::DeepOcean
        )
    )
}

/// Biomes a jungle may border without an edge.
pub fn is_jungle_compatible(id: i32) -> bool {
    matches!(
        Biome::from_id(id),
        Some(
            Biome::Jungle
                | Biome::JungleM
                | Biome::JungleEdge
                | Biome::JungleEdgeM
                | Biome::JungleHills
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_roundtrip() {
        for biome in Biome::ALL {
            assert_eq!(Biome::from_id(biome.id()), Some(biome));
        }
        assert_eq!(Biome::from_id(40), None);
        assert_eq!(Biome::from_id(-1), None);
        assert_eq!(Biome::from_id(1024), None);
    }

    #[test]
    fn test_lookup_table_covers_every_id() {
        for id in -10..400 {
            let scanned = Biome::ALL.iter().copied().find(|b| b.id() == id);
            assert_eq!(Biome::from_id(id), scanned, "id {id}");
        }
        assert_eq!(Biome::from_id(i32::MIN), None);
        assert_eq!(Biome::from_id(i32::MAX), None);
        assert_eq!(BY_ID.iter().flatten().count(), Biome::ALL.len());
    }

    #[test]
    fn test_all_is_sorted_and_unique() {
        for pair in Biome::ALL.windows(2) {
            assert!(pair[0].id() < pair[1].id(), "{:?} / {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_variant_family() {
        assert!(Biome::SunflowerPlains.is_variant());
        assert_eq!(Biome::SunflowerPlains.id() - VARIANT_OFFSET, Biome::Plains.id());
        assert!(!Biome::Plains.is_variant());
    }

    #[test]
    fn test_predicates() {
        assert!(is_ocean(Biome::DeepOcean.id()));
        assert!(!is_ocean(Biome::River.id()));
        assert!(is_very_cold(Biome::IcePlains.id()));
        assert!(!is_very_cold(Biome::Plains.id()));
        assert!(is_no_downfall(Biome::Savanna.id()));
        assert!(is_mesa_compatible(Biome::Desert.id()));
        assert!(!is_mesa_compatible(Biome::Forest.id()));
        assert!(is_jungle_compatible(Biome::JungleHills.id()));
        assert!(!is_very_cold(9999));
    }
}
