//! Terrain: the height field plus the bounded cache of generated chunks.

use glam::Vec2;
use tracing::{debug, info, trace, warn};
use verdant_common::{ChunkCoord, EntityId};

use crate::block::{Block, BlockMaterial};
use crate::cache::ChunkCache;
use crate::chunk::{Chunk, ChunkContents};
use crate::config::WorldConfig;
use crate::height::{baseline_for_window, GroundHeight, HeightField};

/// Owns the ground of one world.
///
/// Chunks are generated on first request, kept in an LRU cache, and
/// regenerated bit for bit after eviction. Only `Terrain` inserts into or
/// evicts from the cache.
#[derive(Debug)]
pub struct Terrain {
    /// World configuration
    config: WorldConfig,
    /// Height of the visible window; columns stop just below it
    window_height: f32,
    /// Ground elevation
    height: HeightField,
    /// Cached chunks
    cache: ChunkCache,
    /// Coordinates evicted since the last `take_evictions`
    evictions: Vec<ChunkCoord>,
}

impl Terrain {
    /// Creates terrain for a window of the given height.
    ///
    /// The configuration is validated first, so out-of-range values are
    /// clamped rather than reaching generation.
    #[must_use]
    pub fn new(mut config: WorldConfig, window_height: f32, seed: u64) -> Self {
        config.validate();
        let baseline = baseline_for_window(window_height);
        info!(
            "Creating terrain with seed={}, baseline={}, cache_capacity={}",
            seed, baseline, config.cache_capacity
        );

        Self {
            height: HeightField::new(seed, baseline, &config.height),
            cache: ChunkCache::new(config.cache_capacity),
            config,
            window_height,
            evictions: Vec::new(),
        }
    }

    /// Returns the world seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.height.seed()
    }

    /// Returns the baseline ground height.
    #[must_use]
    pub const fn baseline(&self) -> f32 {
        self.height.baseline()
    }

    /// Returns the world configuration.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the window height.
    #[must_use]
    pub const fn window_height(&self) -> f32 {
        self.window_height
    }

    /// Ground y at world x.
    #[must_use]
    pub fn height_at(&self, x: f32) -> f32 {
        self.height.height_at(x)
    }

    /// Materializes every chunk overlapping `[min_x, max_x)` and returns
    /// their blocks in ascending chunk order.
    ///
    /// Cached chunks are refreshed to most recently used. Eviction runs
    /// once the whole batch is loaded and never touches the batch itself.
    pub fn create_in_range(&mut self, min_x: i32, max_x: i32) -> Vec<Block> {
        let width = self.config.chunk_width();
        let batch: Vec<ChunkCoord> = ChunkCoord::covering(min_x, max_x, width).collect();

        let mut blocks = Vec::new();
        for &coord in &batch {
            self.ensure_loaded(coord);
            if let Some(chunk) = self.cache.get(coord) {
                blocks.extend_from_slice(chunk.blocks());
            }
        }

        self.evict_excess(&batch);
        blocks
    }

    /// Sets the active flag of a cached chunk.
    ///
    /// Returns `false` if the chunk is not cached.
    pub fn set_active(&mut self, coord: ChunkCoord, active: bool) -> bool {
        match self.cache.get_mut(coord) {
            Some(chunk) => {
                chunk.set_active(active);
                true
            },
            None => false,
        }
    }

    /// Records the flora entities living on a cached chunk.
    pub fn attach_flora(&mut self, coord: ChunkCoord, flora: Vec<EntityId>) -> bool {
        self.cache
            .get_mut(coord)
            .is_some_and(|chunk| chunk.attach_flora(flora))
    }

    /// Destroys a cached chunk immediately.
    ///
    /// Active chunks are refused; unknown coordinates are a no-op.
    pub fn unload(&mut self, coord: ChunkCoord) -> Option<ChunkContents> {
        if self.cache.get(coord)?.is_active() {
            debug!("Refusing to unload active {coord}");
            return None;
        }
        let mut chunk = self.cache.remove(coord)?;
        debug!("Unloaded {coord}");
        chunk.unload()
    }

    /// Drains the coordinates evicted since the last call.
    pub fn take_evictions(&mut self) -> Vec<ChunkCoord> {
        std::mem::take(&mut self.evictions)
    }

    /// Checks if a chunk is cached and loaded.
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.cache.get(coord).is_some_and(Chunk::is_loaded)
    }

    /// Returns a cached chunk.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.cache.get(coord)
    }

    /// Returns the number of loaded chunks.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.cache.len()
    }

    /// Returns the chunk cache.
    #[must_use]
    pub const fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    /// Loads a chunk if absent, otherwise refreshes its recency.
    fn ensure_loaded(&mut self, coord: ChunkCoord) {
        if self.cache.touch(coord) {
            return;
        }

        let mut chunk = Chunk::new(coord, self.config.chunk_width());
        chunk.load(self.generate_blocks(coord));
        debug!("Generated {coord} with {} blocks", chunk.blocks().len());
        self.cache.insert(chunk);
    }

    fn evict_excess(&mut self, batch: &[ChunkCoord]) {
        if !self.cache.is_over_capacity() {
            return;
        }

        for eviction in self.cache.evict_excess(batch) {
            debug!(
                "Evicted {} ({} blocks, {} flora)",
                eviction.coord,
                eviction.contents.blocks.len(),
                eviction.contents.flora.len()
            );
            self.evictions.push(eviction.coord);
        }

        if self.cache.is_over_capacity() {
            warn!(
                "Chunk cache over capacity ({}/{}): no inactive chunk left to evict",
                self.cache.len(),
                self.cache.capacity()
            );
        }
    }

    /// Builds the block columns of one chunk.
    fn generate_blocks(&self, coord: ChunkCoord) -> Vec<Block> {
        let block = self.config.block_size;
        let size = block as f32;
        let width = self.config.chunk_width();
        let floor_y = self.window_height + size;

        let mut blocks =
            Vec::with_capacity((self.config.chunk_blocks * self.config.terrain_depth) as usize);

        for x in (coord.min_x(width)..coord.max_x(width)).step_by(block as usize) {
            let column_top = (self.height_at(x as f32) / size).floor() * size;

            for depth in 0..self.config.terrain_depth {
                let y = column_top + depth as f32 * size;
                if y >= floor_y {
                    break;
                }
                blocks.push(Block::new(
                    Vec2::new(x as f32, y),
                    size,
                    BlockMaterial::for_depth(depth),
                ));
            }
        }

        trace!("{coord}: {} blocks", blocks.len());
        blocks
    }
}

impl GroundHeight for Terrain {
    fn height_at(&self, x: f32) -> f32 {
        self.height.height_at(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terrain(seed: u64) -> Terrain {
        Terrain::new(WorldConfig::default(), 500.0, seed)
    }

    #[test]
    fn test_baseline() {
        assert!((terrain(1).baseline() - 333.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_blocks_stay_inside_their_chunk() {
        let mut terrain = terrain(42);
        for x in [-3, 0, 3] {
            let coord = ChunkCoord::new(x);
            let blocks = terrain.create_in_range(coord.min_x(300), coord.max_x(300));
            assert!(!blocks.is_empty());
            for block in &blocks {
                let bx = block.position().x as i32;
                assert!(coord.min_x(300) <= bx && bx < coord.max_x(300));
                assert_eq!(bx.rem_euclid(30), 0);
            }
        }
    }

    #[test]
    fn test_columns_start_on_grid_with_topsoil() {
        let mut terrain = Terrain::new(WorldConfig::default(), 720.0, 42);
        let blocks = terrain.create_in_range(0, 300);

        for x in (0..300).step_by(30) {
            let column: Vec<_> = blocks
                .iter()
                .filter(|b| b.position().x as i32 == x)
                .collect();
            assert!(!column.is_empty() && column.len() <= 25);
            let top = (terrain.height_at(x as f32) / 30.0).floor() * 30.0;
            assert!((column[0].position().y - top).abs() < f32::EPSILON);
            assert_eq!(column[0].material(), BlockMaterial::Topsoil);
            if column.len() > 2 {
                assert_eq!(column[2].material(), BlockMaterial::Subsoil);
            }
            assert!(column.iter().all(|b| b.position().y < 750.0));
        }
    }

    #[test]
    fn test_range_output_is_ordered_by_chunk() {
        let mut terrain = terrain(5);
        let blocks = terrain.create_in_range(-600, 600);
        let xs: Vec<f32> = blocks.iter().map(|b| b.position().x).collect();
        assert!(xs.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(terrain.loaded_count(), 4);
    }

    #[test]
    fn test_empty_range() {
        let mut terrain = terrain(5);
        assert!(terrain.create_in_range(300, 300).is_empty());
        assert_eq!(terrain.loaded_count(), 0);
    }

    #[test]
    fn test_regeneration_after_eviction_is_identical() {
        let mut terrain = terrain(42);
        let coord = ChunkCoord::new(3);
        let first: Vec<_> = terrain
            .create_in_range(coord.min_x(300), coord.max_x(300))
            .iter()
            .map(Block::layout_key)
            .collect();

        for x in 10..35 {
            terrain.create_in_range(x * 300, (x + 1) * 300);
        }
        assert!(!terrain.is_loaded(coord));
        assert!(terrain.take_evictions().contains(&coord));

        let second: Vec<_> = terrain
            .create_in_range(coord.min_x(300), coord.max_x(300))
            .iter()
            .map(Block::layout_key)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_active_chunks_survive_pressure() {
        let mut terrain = terrain(9);
        terrain.create_in_range(0, 300);
        assert!(terrain.set_active(ChunkCoord::new(0), true));

        for x in 1..40 {
            terrain.create_in_range(x * 300, (x + 1) * 300);
        }
        assert!(terrain.is_loaded(ChunkCoord::new(0)));
        assert!(terrain.loaded_count() <= 20);
    }

    #[test]
    fn test_degenerate_config_is_clamped() {
        let config = WorldConfig {
            block_size: 0,
            chunk_blocks: 0,
            ..WorldConfig::default()
        };
        let mut terrain = Terrain::new(config, 1000.0, 1);
        assert_eq!(terrain.config().chunk_width(), 1);

        let blocks = terrain.create_in_range(0, 3);
        assert_eq!(terrain.loaded_count(), 3);
        assert!(!blocks.is_empty());
    }

    #[test]
    fn test_explicit_unload() {
        let mut terrain = terrain(9);
        terrain.create_in_range(0, 300);
        terrain.set_active(ChunkCoord::new(0), true);
        assert!(terrain.unload(ChunkCoord::new(0)).is_none());

        terrain.set_active(ChunkCoord::new(0), false);
        let contents = terrain.unload(ChunkCoord::new(0)).expect("cached chunk");
        assert!(!contents.blocks.is_empty());
        assert!(!terrain.is_loaded(ChunkCoord::new(0)));
        assert!(terrain.unload(ChunkCoord::new(0)).is_none());
        assert!(!terrain.set_active(ChunkCoord::new(0), true));
    }
}
