//! The consumer-facing handle on a built chain.

use std::sync::Arc;

use crossbeam_channel::unbounded;
use tracing::debug;

use crate::builder::PipelineBuilder;
use crate::cache::TileCache;
use crate::grid::Grid;
use crate::stage::{Alphabet, BoxedGenerator};

/// A fully wired, immutable biome chain.
///
/// `resolve` is a pure function of the seed and the anchor, so the pipeline
/// can be shared across threads (`Arc<BiomePipeline>` or plain `&`) and
/// queried concurrently.
pub struct BiomePipeline {
    seed: i64,
    root: BoxedGenerator,
    stage_count: usize,
    cache: Option<Arc<TileCache>>,
}

impl BiomePipeline {
    pub(crate) fn new(
        seed: i64,
        root: BoxedGenerator,
        stage_count: usize,
        cache: Option<Arc<TileCache>>,
    ) -> Self {
        Self {
            seed,
            root,
            stage_count,
            cache,
        }
    }

    /// Shorthand for [`PipelineBuilder::new`].
    pub fn builder(seed: i64) -> PipelineBuilder {
        PipelineBuilder::new(seed)
    }

    /// World seed the pipeline was built from.
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Width of the tiles returned by [`resolve`](Self::resolve).
    pub fn tile_width(&self) -> usize {
        self.root.width()
    }

    /// Height of the tiles returned by [`resolve`](Self::resolve).
    pub fn tile_height(&self) -> usize {
        self.root.height()
    }

    /// Alphabet of the output values.
    pub fn alphabet(&self) -> Alphabet {
        self.root.alphabet()
    }

    /// Number of stages in the chain, secondary chains included.
    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    /// Tiles currently held by the shared cache, `0` when caching is off.
    pub fn cached_tiles(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.len())
    }

    /// Classifies the tile whose top-left column is `(min_x, min_z)`.
    pub fn resolve(&self, min_x: i32, min_z: i32) -> Grid {
        self.root.generate(min_x, min_z)
    }

    /// Resolves `tiles_x × tiles_z` adjacent tiles on all cores and stitches
    /// them into one grid anchored at `(min_x, min_z)`.
    pub fn resolve_region(&self, min_x: i32, min_z: i32, tiles_x: usize, tiles_z: usize) -> Grid {
        self.resolve_region_with_threads(min_x, min_z, tiles_x, tiles_z, num_cpus::get())
    }

    /// [`resolve_region`](Self::resolve_region) with an explicit worker count.
    pub fn resolve_region_with_threads(
        &self,
        min_x: i32,
        min_z: i32,
        tiles_x: usize,
        tiles_z: usize,
        threads: usize,
    ) -> Grid {
        let (tile_w, tile_h) = (self.tile_width(), self.tile_height());
        let mut region = Grid::new(min_x, min_z, tiles_x * tile_w, tiles_z * tile_h);
        let jobs = tiles_x * tiles_z;
        if jobs == 0 {
            return region;
        }
        let threads = threads.clamp(1, jobs);
        debug!(tiles_x, tiles_z, threads, "resolving region");

        let (job_tx, job_rx) = unbounded::<(i32, i32)>();
        for tz in 0..tiles_z {
            for tx in 0..tiles_x {
                let anchor_x = min_x.wrapping_add((tx * tile_w) as i32);
                let anchor_z = min_z.wrapping_add((tz * tile_h) as i32);
                job_tx
                    .send((anchor_x, anchor_z))
                    .expect("job receiver is held until every job is queued");
            }
        }
        drop(job_tx);

        let (tile_tx, tile_rx) = unbounded::<Grid>();
        std::thread::scope(|scope| {
            for _ in 0..threads {
                let jobs = job_rx.clone();
                let tiles = tile_tx.clone();
                scope.spawn(move || {
                    while let Ok((x, z)) = jobs.recv() {
                        if tiles.send(self.resolve(x, z)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(tile_tx);
            for tile in tile_rx.iter() {
                region.paste(&tile);
            }
        });
        region
    }
}
