//! Cell alphabets: biome groups, the rare flag, and final biome identifiers.
//!
//! Early stages work on coarse climate groups; [`Materialize`](crate::stages::Materialize)
//! turns groups into concrete [`Biome`] ids, after which the substitution
//! tables in this module drive beaches, hills and M variants.

mod group;
mod id;
mod tables;

pub use group::{
    DESERT, GROUP_COUNT, GroupBiomes, ICE, MAX_LAND_GROUP, MOUNTAINS, OCEAN, RARE_FLAG, TEMPERATE,
    group_name, is_group, is_rare_group,
};
pub use id::{
    Biome, VARIANT_OFFSET, is_biome_id, is_jungle_compatible, is_mesa_compatible, is_no_downfall,
    is_ocean, is_very_cold,
};
pub use tables::{beach_variant, hills_variant, m_variant};
