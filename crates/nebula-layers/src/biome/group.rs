//! Biome groups and the candidate lists used to materialise them.

use serde::{Deserialize, Serialize};

use super::Biome;
use crate::error::BuildError;

/// Ocean group; also the "unset" cell value.
pub const OCEAN: i32 = 0;
/// Hot, dry group.
pub const DESERT: i32 = 1;
/// Neutral group used to repair implausible adjacency.
pub const TEMPERATE: i32 = 2;
/// Hills and highland forests.
pub const MOUNTAINS: i32 = 3;
/// Frozen group.
pub const ICE: i32 = 4;
/// Number of groups, ocean included.
pub const GROUP_COUNT: usize = 5;
/// Largest group id produced by the land/ocean classifier.
pub const MAX_LAND_GROUP: i32 = ICE;
/// Flag OR'd into a group to request a biome from the rare list.
pub const RARE_FLAG: i32 = 1024;

/// Returns `true` for a plain group id.
#[inline]
pub fn is_group(value: i32) -> bool {
    (OCEAN..=MAX_LAND_GROUP).contains(&value)
}

/// Returns `true` for a group id with or without the rare flag.
#[inline]
pub fn is_rare_group(value: i32) -> bool {
    is_group(value & !RARE_FLAG)
}

/// Name of a group id, used in error messages.
pub fn group_name(group: usize) -> &'static str {
    match group {
        0 => "ocean",
        1 => "desert",
        2 => "temperate",
        3 => "mountains",
        4 => "ice",
        _ => "unknown",
    }
}

/// Per-group candidate lists. Duplicated entries raise a biome's odds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupBiomes {
    /// Candidates for untagged cells, indexed by group id.
    pub normal: [Vec<Biome>; GROUP_COUNT],
    /// Candidates for rare-flagged cells, indexed by group id.
    pub rare: [Vec<Biome>; GROUP_COUNT],
}

impl Default for GroupBiomes {
    fn default() -> Self {
        use Biome::*;
        Self {
            normal: [
                vec![Ocean],
                vec![Desert, Desert, Desert, Desert, Desert, Desert, Savanna, Savanna, Plains],
                vec![Forest, Forest, RoofedForest, ExtremeHills, Plains, BirchForest, Swampland],
                vec![ExtremeHills, Forest, Taiga, Plains],
                vec![IcePlains, IcePlains, IcePlains, IcePlains, ColdTaiga],
            ],
            rare: [
                vec![Ocean],
                vec![MesaPlateau, MesaPlateauF],
                vec![Jungle],
                vec![MegaTaiga],
                vec![IcePlains, IcePlains, IcePlains, IcePlains, ColdTaiga],
            ],
        }
    }
}

impl GroupBiomes {
    /// Rejects empty candidate lists.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyCandidateList`] naming the first empty list.
    pub fn validate(&self) -> Result<(), BuildError> {
        for (rare, lists) in [(false, &self.normal), (true, &self.rare)] {
            if let Some(group) = lists.iter().position(Vec::is_empty) {
                return Err(BuildError::EmptyCandidateList {
                    group: group_name(group),
                    rare,
                });
            }
        }
        Ok(())
    }

    /// Candidate list for a cell value.
    ///
    /// The rare flag selects the rare list. Group ids outside `0..5` wrap
    /// modulo the group count.
    pub fn candidates(&self, value: i32) -> &[Biome] {
        let group = ((value & (RARE_FLAG - 1)) as usize) % GROUP_COUNT;
        if value & RARE_FLAG != 0 {
            &self.rare[group]
        } else {
            &self.normal[group]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists_are_valid() {
        assert!(GroupBiomes::default().validate().is_ok());
    }

    #[test]
    fn test_empty_rare_list_is_rejected() {
        let mut table = GroupBiomes::default();
        table.rare[MOUNTAINS as usize].clear();
        let err = table.validate().unwrap_err();
        assert!(matches!(
            err,
            BuildError::EmptyCandidateList {
                group: "mountains",
                rare: true
            }
        ));
    }

    #[test]
    fn test_candidates_follow_rare_flag() {
        let table = GroupBiomes::default();
        assert_eq!(table.candidates(TEMPERATE), table.normal[2].as_slice());
        assert_eq!(table.candidates(TEMPERATE | RARE_FLAG), &[Biome::Jungle]);
        // Out-of-range groups wrap.
        assert_eq!(table.candidates(7), table.normal[2].as_slice());
    }

    #[test]
    fn test_group_predicates() {
        assert!(is_group(ICE));
        assert!(!is_group(5));
        assert!(!is_group(DESERT | RARE_FLAG));
        assert!(is_rare_group(DESERT | RARE_FLAG));
        assert!(is_rare_group(OCEAN));
    }
}
