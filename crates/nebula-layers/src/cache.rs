//! Optional memoisation of intermediate tiles.
//!
//! Neighbouring output tiles request heavily overlapping upstream tiles, so a
//! shared cache in front of the expensive stages saves most of the work when
//! a region is resolved tile by tile. The cache is bounded and append-only:
//! once `capacity` tiles are stored, further tiles are computed but not kept,
//! and stored tiles are never replaced. A cached stage therefore returns
//! exactly what the wrapped stage would.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::trace;

use crate::grid::Grid;
use crate::stage::{Alphabet, BoxedGenerator, GridGenerator};

/// Identifies one tile of one stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileKey {
    /// Id handed out by [`TileCache::register`].
    pub stage: u32,
    /// Anchor x.
    pub min_x: i32,
    /// Anchor z.
    pub min_z: i32,
    /// Tile width.
    pub width: usize,
    /// Tile height.
    pub height: usize,
}

/// Bounded, append-only tile store shared by every cached stage of a pipeline.
#[derive(Debug)]
pub struct TileCache {
    tiles: DashMap<TileKey, Arc<Grid>>,
    capacity: usize,
    stored: AtomicUsize,
    next_stage: AtomicU32,
}

impl TileCache {
    /// Creates a cache holding at most `capacity` tiles.
    pub fn new(capacity: usize) -> Self {
        Self {
            tiles: DashMap::new(),
            capacity,
            stored: AtomicUsize::new(0),
            next_stage: AtomicU32::new(0),
        }
    }

    /// Maximum number of stored tiles.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tiles currently stored.
    pub fn len(&self) -> usize {
        self.stored.load(Ordering::Relaxed)
    }

    /// Returns `true` if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hands out a fresh stage id.
    pub fn register(&self) -> u32 {
        self.next_stage.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the stored tile for `key`, computing it with `generate` on a miss.
    ///
    /// No shard lock is held while `generate` runs, since generating a tile
    /// usually queries other cached stages.
    pub fn get_or_generate(&self, key: TileKey, generate: impl FnOnce() -> Grid) -> Arc<Grid> {
        if let Some(tile) = self.tiles.get(&key) {
            return Arc::clone(tile.value());
        }

        let tile = Arc::new(generate());
        if self.stored.load(Ordering::Relaxed) >= self.capacity {
            return tile;
        }
        match self.tiles.entry(key) {
            // Another thread got there first; its tile is identical.
            Entry::Occupied(existing) => Arc::clone(existing.get()),
            Entry::Vacant(slot) => {
                if self.stored.fetch_add(1, Ordering::Relaxed) < self.capacity {
                    trace!(stage = key.stage, min_x = key.min_x, min_z = key.min_z, "cached tile");
                    slot.insert(Arc::clone(&tile));
                } else {
                    self.stored.fetch_sub(1, Ordering::Relaxed);
                }
                tile
            }
        }
    }
}

/// A stage whose tiles go through a shared [`TileCache`].
pub struct CachedStage {
    id: u32,
    inner: BoxedGenerator,
    cache: Arc<TileCache>,
}

impl CachedStage {
    /// Wraps `inner`, registering it with `cache`.
    pub fn new(inner: BoxedGenerator, cache: Arc<TileCache>) -> Self {
        Self {
            id: cache.register(),
            inner,
            cache,
        }
    }
}

impl GridGenerator for CachedStage {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn width(&self) -> usize {
        self.inner.width()
    }

    fn height(&self) -> usize {
        self.inner.height()
    }

    fn alphabet(&self) -> Alphabet {
        self.inner.alphabet()
    }

    fn generate(&self, min_x: i32, min_z: i32) -> Grid {
        let key = TileKey {
            stage: self.id,
            min_x,
            min_z,
            width: self.inner.width(),
            height: self.inner.height(),
        };
        let tile = self
            .cache
            .get_or_generate(key, || self.inner.generate(min_x, min_z));
        Grid::clone(&tile)
    }
}
