//! Concrete grid generators.
//!
//! Stages are grouped by how they read their upstream: sources read nothing,
//! zoom reads a half-resolution tile, cross filters read a one-cell halo, and
//! the remaining stages read one or two tiles of their own size.

mod base;
mod biomes;
mod neighborhood;
mod stochastic;
mod zoom;

pub use base::{Choice, LandOcean};
pub use biomes::{AlternateBiomes, MVariants, Materialize, MixRivers};
pub use neighborhood::{AddToOcean, Beaches, BiomeEdges, GroupEdges, River, Smooth};
pub use stochastic::{AddIslands, RareGroups, ReplaceRandomly, SetRandomly};
pub use zoom::Zoom;
