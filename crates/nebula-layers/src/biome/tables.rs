//! Static biome substitution tables: beaches, hills, and M variants.

use super::{Biome, VARIANT_OFFSET};

/// Beach variant of each base biome, indexed by biome id.
static TO_BEACH: [Biome; 40] = [
    /* Ocean            */ Biome::Ocean,
    /* Plains           */ Biome::Beach,
    /* Desert           */ Biome::Beach,
    /* ExtremeHills     */ Biome::StoneBeach,
    /* Forest           */ Biome::Beach,
    /* Taiga            */ Biome::ColdBeach,
    /* Swampland        */ Biome::Swampland,
    /* River            */ Biome::River,
    /* Nether           */ Biome::Nether,
    /* End              */ Biome::End,
    /* FrozenOcean      */ Biome::ColdBeach,
    /* FrozenRiver      */ Biome::ColdBeach,
    /* IcePlains        */ Biome::ColdBeach,
    /* IceMountains     */ Biome::ColdBeach,
    /* MushroomIsland   */ Biome::MushroomShore,
    /* MushroomShore    */ Biome::MushroomShore,
    /* Beach            */ Biome::Beach,
    /* DesertHills      */ Biome::Beach,
    /* ForestHills      */ Biome::Beach,
    /* TaigaHills       */ Biome::ColdBeach,
    /* ExtremeHillsEdge */ Biome::StoneBeach,
    /* Jungle           */ Biome::Beach,
    /* JungleHills      */ Biome::Beach,
    /* JungleEdge       */ Biome::Beach,
    /* DeepOcean        */ Biome::Ocean,
    /* StoneBeach       */ Biome::StoneBeach,
    /* ColdBeach        */ Biome::ColdBeach,
    /* BirchForest      */ Biome::Beach,
    /* BirchForestHills */ Biome::Beach,
    /* RoofedForest     */ Biome::Beach,
    /* ColdTaiga        */ Biome::ColdBeach,
    /* ColdTaigaHills   */ Biome::ColdBeach,
    /* MegaTaiga        */ Biome::StoneBeach,
    /* MegaTaigaHills   */ Biome::StoneBeach,
    /* ExtremeHillsPlus */ Biome::StoneBeach,
    /* Savanna          */ Biome::Beach,
    /* SavannaPlateau   */ Biome::Beach,
    /* Mesa             */ Biome::Mesa,
    /* MesaPlateauF     */ Biome::Mesa,
    /* MesaPlateau      */ Biome::Mesa,
];

/// Beach variant of a biome cell.
///
/// The variant bit is dropped first, then the id wraps modulo the table
/// size, so values outside the known alphabet still map to a valid biome.
pub fn beach_variant(value: i32) -> i32 {
    let base = value.rem_euclid(VARIANT_OFFSET) as usize;
    TO_BEACH[base % TO_BEACH.len()].id()
}

/// Elevated ("hills") counterpart used by alternate substitution.
pub fn hills_variant(biome: Biome) -> Option<Biome> {
    use Biome::*;
    Some(match biome {
        BirchForest => BirchForestHills,
        Desert => DesertHills,
        ExtremeHills => ExtremeHillsPlus,
        Forest => ForestHills,
        IcePlains => IceMountains,
        Jungle => JungleHills,
        MegaTaiga => MegaTaigaHills,
        MesaPlateau | MesaPlateauF | MesaPlateauM | MesaPlateauFM => Mesa,
        Plains => Forest,
        RoofedForest => Plains,
        Savanna => SavannaPlateau,
        Taiga => TaigaHills,
        _ => return None,
    })
}

/// Rarer "M" counterpart used by M-variant substitution.
pub fn m_variant(biome: Biome) -> Option<Biome> {
    use Biome::*;
    Some(match biome {
        Plains => SunflowerPlains,
        Desert => DesertM,
        ExtremeHills => ExtremeHillsM,
        Forest => FlowerForest,
        Taiga => TaigaM,
        Swampland => SwamplandM,
        Jungle => JungleM,
        JungleEdge => JungleEdgeM,
        BirchForest => BirchForestM,
        BirchForestHills => BirchForestHillsM,
        RoofedForest => RoofedForestM,
        ColdTaiga => ColdTaigaM,
        ExtremeHillsPlus => ExtremeHillsPlusM,
        Savanna => SavannaM,
        SavannaPlateau => SavannaPlateauM,
        Mesa | MesaPlateau => MesaBryce,
        MesaPlateauF => MesaPlateauFM,
        _ => return None,
    })
}
