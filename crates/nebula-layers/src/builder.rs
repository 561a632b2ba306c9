//! Declarative chain description and pipeline assembly.
//!
//! A [`Chain`] lists stages from source to output. Building it walks the list
//! backwards to work out the tile size every stage must produce so that the
//! last one yields the requested size, then instantiates the stages forwards,
//! letting each constructor validate its upstream.

use std::sync::Arc;

use tracing::{debug, info};

use crate::biome::{Biome, GroupBiomes};
use crate::cache::{CachedStage, TileCache};
use crate::error::BuildError;
use crate::noise::{fold_seed, stage_seed};
use crate::params::LayerParams;
use crate::pipeline::BiomePipeline;
use crate::stage::{BoxedGenerator, neighborhood_dims, zoom_dims};
use crate::stages::{
    AddIslands, AddToOcean, AlternateBiomes, Beaches, BiomeEdges, Choice, GroupEdges, LandOcean,
    MVariants, Materialize, MixRivers, RareGroups, ReplaceRandomly, River, SetRandomly, Smooth,
    Zoom,
};

/// Default output tile edge.
pub const DEFAULT_TILE_SIZE: usize = 16;

/// One entry of the stage catalog together with its tunables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageKind {
    /// Uniform region ids in `[0, range)`.
    Choice { range: i32 },
    /// Initial land/ocean split.
    LandOcean { threshold_percent: i32 },
    /// Resolution doubling.
    Zoom,
    /// Single-cell artefact removal.
    Smooth,
    /// Coastal beaches.
    Beaches,
    /// Group border fixes.
    GroupEdges,
    /// Biome border fixes.
    BiomeEdges,
    /// Region edge detection.
    River,
    /// Open-ocean seeding.
    AddToOcean { chance: i32, to: i32 },
    /// Ocean-to-land islands.
    AddIslands { chance: i32 },
    /// Random `from` to `to` swaps.
    ReplaceRandomly { from: i32, to: i32, chance: i32 },
    /// Random overwrite.
    SetRandomly { chance: i32, to: i32 },
    /// Rare tagging.
    RareGroups { chance: i32 },
    /// Group to biome.
    Materialize { table: GroupBiomes },
    /// Hills substitution under a mask chain.
    AlternateBiomes { mask: Chain },
    /// M-variant substitution under a mask chain.
    MVariants { mask: Chain },
    /// River overlay from a river chain.
    MixRivers { rivers: Chain },
}

impl StageKind {
    /// Stage name as reported by the built generator.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Choice { .. } => "choice",
            Self::LandOcean { .. } => "land_ocean",
            Self::Zoom => "zoom",
            Self::Smooth => "smooth",
            Self::Beaches => "beaches",
            Self::GroupEdges => "group_edges",
            Self::BiomeEdges => "biome_edges",
            Self::River => "river",
            Self::AddToOcean { .. } => "add_to_ocean",
            Self::AddIslands { .. } => "add_islands",
            Self::ReplaceRandomly { .. } => "replace_randomly",
            Self::SetRandomly { .. } => "set_randomly",
            Self::RareGroups { .. } => "rare_groups",
            Self::Materialize { .. } => "materialize",
            Self::AlternateBiomes { .. } => "alternate_biomes",
            Self::MVariants { .. } => "m_variants",
            Self::MixRivers { .. } => "mix_rivers",
        }
    }

    /// Returns `true` for stages without an upstream.
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Choice { .. } | Self::LandOcean { .. })
    }

    /// Tile size this stage needs from its upstream to produce
    /// `width × height`, or `None` for sources.
    pub fn upstream_dims(&self, width: usize, height: usize) -> Option<(usize, usize)> {
        match self {
            Self::Choice { .. } | Self::LandOcean { .. } => None,
            Self::Zoom => Some(zoom_dims(width, height)),
            Self::Smooth
            | Self::Beaches
            | Self::GroupEdges
            | Self::BiomeEdges
            | Self::River
            | Self::AddToOcean { .. } => Some(neighborhood_dims(width, height)),
            _ => Some((width, height)),
        }
    }

    /// Number of stages including embedded secondary chains.
    fn stage_count(&self) -> usize {
        match self {
            Self::AlternateBiomes { mask: chain }
            | Self::MVariants { mask: chain }
            | Self::MixRivers { rivers: chain } => 1 + chain.stage_count(),
            _ => 1,
        }
    }

    fn instantiate(
        &self,
        seed: i32,
        upstream: Option<BoxedGenerator>,
        (width, height): (usize, usize),
        cache: Option<&Arc<TileCache>>,
    ) -> Result<BoxedGenerator, BuildError> {
        // Chain::build guarantees exactly the first stage is a source.
        let up = || upstream.ok_or(BuildError::MissingSource(self.name()));

        let stage: BoxedGenerator = match self {
            Self::Choice { range } => Box::new(Choice::new(seed, *range, width, height)?),
            Self::LandOcean { threshold_percent } => {
                Box::new(LandOcean::new(seed, *threshold_percent, width, height)?)
            }
            Self::Zoom => {
                let zoom: BoxedGenerator = Box::new(Zoom::new(seed, up()?, width, height)?);
                match cache {
                    Some(cache) => Box::new(CachedStage::new(zoom, Arc::clone(cache))),
                    None => zoom,
                }
            }
            Self::Smooth => Box::new(Smooth::new(seed, up()?, width, height)?),
            Self::Beaches => Box::new(Beaches::new(up()?, width, height)?),
            Self::GroupEdges => Box::new(GroupEdges::new(up()?, width, height)?),
            Self::BiomeEdges => Box::new(BiomeEdges::new(up()?, width, height)?),
            Self::River => Box::new(River::new(up()?, width, height)?),
            Self::AddToOcean { chance, to } => Box::new(AddToOcean::new(
                seed,
                *chance,
                *to,
                up()?,
                width,
                height,
            )?),
            Self::AddIslands { chance } => Box::new(AddIslands::new(seed, *chance, up()?)?),
            Self::ReplaceRandomly { from, to, chance } => {
                Box::new(ReplaceRandomly::new(seed, *from, *to, *chance, up()?)?)
            }
            Self::SetRandomly { chance, to } => {
                Box::new(SetRandomly::new(seed, *chance, *to, up()?)?)
            }
            Self::RareGroups { chance } => Box::new(RareGroups::new(seed, *chance, up()?)?),
            Self::Materialize { table } => Box::new(Materialize::new(seed, table.clone(), up()?)?),
            Self::AlternateBiomes { mask } => {
                let mask = mask.build(seed, width, height, cache)?;
                Box::new(AlternateBiomes::new(up()?, mask)?)
            }
            Self::MVariants { mask } => {
                let mask = mask.build(seed, width, height, cache)?;
                Box::new(MVariants::new(up()?, mask)?)
            }
            Self::MixRivers { rivers } => {
                let rivers = rivers.build(seed, width, height, cache)?;
                Box::new(MixRivers::new(up()?, rivers)?)
            }
        };
        Ok(stage)
    }
}

/// A stage and the offset added to the chain seed for its noise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageSpec {
    /// What to build.
    pub kind: StageKind,
    /// Seed offset; distinct offsets keep stages uncorrelated.
    pub seed_offset: i32,
}

/// An ordered list of stages, source first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chain {
    steps: Vec<StageSpec>,
}

impl Chain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    pub fn then(mut self, kind: StageKind, seed_offset: i32) -> Self {
        self.steps.push(StageSpec { kind, seed_offset });
        self
    }

    /// Appends `count` zoom stages with consecutive seed offsets.
    pub fn zoomed(mut self, count: u32, first_offset: i32) -> Self {
        for i in 0..count {
            self = self.then(StageKind::Zoom, first_offset.wrapping_add(i as i32));
        }
        self
    }

    /// The stages in source-to-output order.
    pub fn steps(&self) -> &[StageSpec] {
        &self.steps
    }

    /// Number of top-level stages.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of stages including every secondary chain.
    pub fn stage_count(&self) -> usize {
        self.steps.iter().map(|step| step.kind.stage_count()).sum()
    }

    /// Instantiates the chain so that its last stage produces
    /// `width × height` tiles.
    ///
    /// `seed` is the folded world seed; each stage adds its own offset.
    ///
    /// # Errors
    ///
    /// Fails on an empty chain, a chain that does not start with exactly one
    /// source, or any wiring a stage constructor rejects.
    pub fn build(
        &self,
        seed: i32,
        width: usize,
        height: usize,
        cache: Option<&Arc<TileCache>>,
    ) -> Result<BoxedGenerator, BuildError> {
        let Some(first) = self.steps.first() else {
            return Err(BuildError::EmptyChain);
        };
        if !first.kind.is_source() {
            return Err(BuildError::MissingSource(first.kind.name()));
        }
        if let Some(late) = self.steps[1..].iter().find(|step| step.kind.is_source()) {
            return Err(BuildError::MisplacedSource(late.kind.name()));
        }

        // dims[i] is the tile size stage i must produce.
        let mut dims = vec![(width, height); self.steps.len()];
        for i in (1..self.steps.len()).rev() {
            let (w, h) = dims[i];
            if let Some(upstream) = self.steps[i].kind.upstream_dims(w, h) {
                dims[i - 1] = upstream;
            }
        }

        let mut current: Option<BoxedGenerator> = None;
        for (step, &size) in self.steps.iter().zip(&dims) {
            let seeded = stage_seed(seed, step.seed_offset);
            let stage = step.kind.instantiate(seeded, current.take(), size, cache)?;
            debug!(
                stage = stage.name(),
                width = size.0,
                height = size.1,
                alphabet = %stage.alphabet(),
                "wired stage"
            );
            current = Some(stage);
        }
        current.ok_or(BuildError::EmptyChain)
    }
}

/// The standard world chain for `params`: continents, groups, biomes, then
/// edges, beaches and rivers.
pub fn world_chain(params: &LayerParams) -> Chain {
    let hills_mask = Chain::new()
        .then(StageKind::Choice { range: 2 }, 200)
        .zoomed(2, 201);

    let m_mask = Chain::new()
        .then(StageKind::Choice { range: 2 }, 300)
        .then(StageKind::Zoom, 301)
        .then(StageKind::SetRandomly { chance: 800, to: 0 }, 302)
        .then(StageKind::Zoom, 303)
        .then(StageKind::Smooth, 304);

    let rivers = Chain::new()
        .then(StageKind::Choice { range: 4 }, 400)
        .zoomed(params.river_zoom_levels, 401)
        .then(StageKind::River, 420)
        .then(StageKind::Smooth, 421)
        .then(StageKind::Zoom, 422)
        .then(StageKind::Smooth, 423);

    let mut chain = Chain::new()
        .then(
            StageKind::LandOcean {
                threshold_percent: params.land_threshold_percent,
            },
            1,
        )
        .zoomed(params.continent_zoom_levels, 10)
        .then(StageKind::Zoom, 20)
        .then(
            StageKind::AddIslands {
                chance: params.island_chance_permille,
            },
            21,
        )
        .then(StageKind::Zoom, 22)
        .then(
            StageKind::AddIslands {
                chance: params.island_chance_permille,
            },
            23,
        )
        .then(StageKind::Zoom, 24)
        .then(StageKind::GroupEdges, 25)
        .then(StageKind::Smooth, 26)
        .then(
            StageKind::RareGroups {
                chance: params.rare_biome_chance_permille,
            },
            27,
        )
        .then(
            StageKind::Materialize {
                table: params.group_biomes.clone(),
            },
            28,
        );

    for (i, replacement) in params.replacements.iter().enumerate() {
        chain = chain.then(
            StageKind::ReplaceRandomly {
                from: replacement.from.id(),
                to: replacement.to.id(),
                chance: replacement.chance_permille,
            },
            100i32.wrapping_add(i as i32),
        );
    }

    chain
        .then(
            StageKind::AddToOcean {
                chance: params.ocean_seed_chance_permille,
                to: Biome::MushroomIsland.id(),
            },
            40,
        )
        .then(
            StageKind::AddToOcean {
                chance: params.deep_ocean_chance_permille,
                to: Biome::DeepOcean.id(),
            },
            41,
        )
        .then(StageKind::Zoom, 42)
        .then(StageKind::AlternateBiomes { mask: hills_mask }, 43)
        .then(StageKind::Zoom, 44)
        .then(StageKind::BiomeEdges, 45)
        .then(StageKind::Zoom, 46)
        .then(StageKind::MVariants { mask: m_mask }, 47)
        .then(StageKind::Beaches, 48)
        .then(StageKind::Smooth, 49)
        .then(StageKind::Zoom, 50)
        .then(StageKind::Smooth, 51)
        .then(StageKind::MixRivers { rivers }, 52)
}

/// Assembles a [`BiomePipeline`].
///
/// ```ignore
/// let pipeline = PipelineBuilder::new(42).tile_size(32, 32).build()?;
/// let tile = pipeline.resolve(0, 0);
/// ```
#[derive(Clone, Debug)]
pub struct PipelineBuilder {
    seed: i64,
    params: LayerParams,
    width: usize,
    height: usize,
    cache_capacity: usize,
    chain: Option<Chain>,
}

impl PipelineBuilder {
    /// Starts a builder with default parameters, 16×16 tiles and no cache.
    pub fn new(seed: i64) -> Self {
        Self {
            seed,
            params: LayerParams::default(),
            width: DEFAULT_TILE_SIZE,
            height: DEFAULT_TILE_SIZE,
            cache_capacity: 0,
            chain: None,
        }
    }

    /// Replaces the chain parameters.
    pub fn params(mut self, params: LayerParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the size of the tiles returned by `resolve`.
    pub fn tile_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enables the shared tile cache with room for `capacity` tiles.
    /// Zero disables it.
    pub fn cache(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Uses a custom chain instead of [`world_chain`].
    pub fn chain(mut self, chain: Chain) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Validates the parameters and wires every stage.
    ///
    /// # Errors
    ///
    /// Returns the first parameter or wiring problem found.
    pub fn build(self) -> Result<BiomePipeline, BuildError> {
        self.params.validate()?;
        let chain = match self.chain {
            Some(chain) => chain,
            None => world_chain(&self.params),
        };
        let cache = (self.cache_capacity > 0).then(|| Arc::new(TileCache::new(self.cache_capacity)));
        let root = chain.build(fold_seed(self.seed), self.width, self.height, cache.as_ref())?;

        info!(
            seed = self.seed,
            stages = chain.stage_count(),
            tile_width = self.width,
            tile_height = self.height,
            cache_capacity = self.cache_capacity,
            "built biome pipeline"
        );
        Ok(BiomePipeline::new(self.seed, root, chain.stage_count(), cache))
    }
}
