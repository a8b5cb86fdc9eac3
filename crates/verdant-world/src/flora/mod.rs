//! Deterministic per-chunk tree placement.
//!
//! Trees are never cached. Requesting the same chunk again regenerates the
//! same trees from `(seed, chunk, x)` alone.

mod fruit;
mod leaf;
mod tree;

pub use fruit::{Fruit, FruitState};
pub use leaf::{Leaf, LeafSway};
pub use tree::Tree;

use glam::Vec2;
use tracing::trace;
use verdant_common::ChunkCoord;

use crate::config::{FloraConfig, WorldConfig};
use crate::height::GroundHeight;
use crate::seed;

/// Places trees over terrain.
#[derive(Debug, Clone)]
pub struct FloraGenerator {
    /// World seed
    seed: u64,
    /// Placement parameters
    config: FloraConfig,
    /// Block edge length in world units
    block_size: u32,
}

impl FloraGenerator {
    /// Creates a generator for a world.
    #[must_use]
    pub fn new(seed: u64, world: &WorldConfig) -> Self {
        Self {
            seed,
            config: world.flora.clone(),
            block_size: world.block_size,
        }
    }

    /// Returns the world seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the placement parameters.
    #[must_use]
    pub const fn config(&self) -> &FloraConfig {
        &self.config
    }

    /// Generates the trees of `chunk` rooted in `[min_x, max_x)`.
    ///
    /// Candidates sit every `tree_spacing` units starting at `min_x`; the
    /// n-th candidate grows a tree when its roll is below the spawn
    /// probability.
    pub fn generate_in_range<G>(
        &self,
        ground: &G,
        chunk: ChunkCoord,
        min_x: i32,
        max_x: i32,
    ) -> Vec<Tree>
    where
        G: GroundHeight + ?Sized,
    {
        let spacing = (self.config.tree_spacing_blocks * self.block_size).max(1) as usize;
        let block_size = self.block_size as f32;

        let trees: Vec<Tree> = (min_x..max_x)
            .step_by(spacing)
            .enumerate()
            .filter(|&(index, _)| {
                seed::roll_percent(self.seed, chunk, index as u32) < self.config.spawn_probability
            })
            .map(|(_, x)| {
                let base = Vec2::new(x as f32, ground.height_at(x as f32));
                let tree_seed = seed::tree_seed(self.seed, chunk, x);
                Tree::grow(base, tree_seed, &self.config, block_size)
            })
            .collect();

        trace!("{chunk}: {} trees", trees.len());
        trees
    }
}
