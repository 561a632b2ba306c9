//! Layered, deterministic biome grid generation.
//!
//! A world seed and a chain of small stages turn absolute integer coordinates
//! into classification values: ocean/land, biome groups, and finally biome
//! ids. Each stage pulls a tile from its upstream (possibly at half
//! resolution, possibly with a one-cell halo) and transforms it, so the value
//! of any column depends only on the seed and the column itself.
//!
//! ```ignore
//! use nebula_layers::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new(42).build()?;
//! let tile = pipeline.resolve(-16, 32);
//! ```

mod builder;
mod cache;
mod error;
mod grid;
mod noise;
mod params;
mod pipeline;
mod stage;

pub mod biome;
pub mod debug_viz;
pub mod stages;

#[cfg(test)]
mod testing;

pub use builder::{Chain, DEFAULT_TILE_SIZE, PipelineBuilder, StageKind, StageSpec, world_chain};
pub use cache::{CachedStage, TileCache, TileKey};
pub use error::BuildError;
pub use grid::Grid;
pub use noise::{DECORRELATION_DIVISOR, IntNoise, fold_seed, stage_seed};
pub use params::{LayerParams, MAX_ZOOM_LEVELS, Replacement};
pub use pipeline::BiomePipeline;
pub use stage::{Alphabet, BoxedGenerator, GridGenerator, neighborhood_dims, zoom_dims};
