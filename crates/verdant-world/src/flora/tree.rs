//! A single tree: trunk, canopy leaves and fruit.

use glam::Vec2;

use super::fruit::Fruit;
use super::leaf::{Leaf, LeafSway};
use crate::block::{Block, BlockMaterial};
use crate::config::FloraConfig;
use crate::entity::EntityKind;

/// A generated tree. Every part is a pure function of `(base, seed)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    base: Vec2,
    seed: u64,
    trunk: Vec<Block>,
    leaves: Vec<Leaf>,
    fruit: Vec<Fruit>,
}

impl Tree {
    /// Grows a tree whose trunk stands on `base`.
    #[must_use]
    pub fn grow(base: Vec2, seed: u64, config: &FloraConfig, block_size: f32) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);

        let trunk_height = rng.u32(config.min_trunk_height..=config.max_trunk_height);
        let trunk = (0..trunk_height)
            .map(|i| {
                let y = base.y - (i + 1) as f32 * block_size;
                Block::new(Vec2::new(base.x, y), block_size, BlockMaterial::Trunk)
            })
            .collect();

        let trunk_top = base.y - trunk_height as f32 * block_size;
        let canopy_origin = Vec2::new(
            base.x - config.canopy_width as f32 / 2.0 * block_size,
            trunk_top - config.canopy_height as f32 / 2.0 * block_size,
        );
        let cell_corner =
            |(cx, cy): (u32, u32)| canopy_origin + Vec2::new(cx as f32, cy as f32) * block_size;

        let mut cells: Vec<(u32, u32)> = (0..config.canopy_height)
            .flat_map(|cy| (0..config.canopy_width).map(move |cx| (cx, cy)))
            .collect();

        let leaf_count = rng.u32(config.min_leaves..=config.max_leaves) as usize;
        rng.shuffle(&mut cells);
        let leaves = cells
            .iter()
            .take(leaf_count)
            .map(|&cell| Leaf::new(cell_corner(cell), block_size, cell, LeafSway::random(&mut rng)))
            .collect();

        let fruit_count = rng.u32(config.min_fruit..=config.max_fruit) as usize;
        rng.shuffle(&mut cells);
        let half = Vec2::splat(block_size / 2.0);
        let fruit = cells
            .iter()
            .take(fruit_count)
            .map(|&cell| {
                Fruit::new(
                    cell_corner(cell) + half,
                    block_size,
                    config.fruit_respawn_secs,
                    config.fruit_energy,
                )
            })
            .collect();

        Self {
            base,
            seed,
            trunk,
            leaves,
            fruit,
        }
    }

    /// Where the trunk meets the ground.
    #[must_use]
    pub const fn base(&self) -> Vec2 {
        self.base
    }

    /// Seed the tree was grown from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Trunk height in blocks.
    #[must_use]
    pub fn trunk_height(&self) -> usize {
        self.trunk.len()
    }

    /// Trunk blocks, bottom to top.
    #[must_use]
    pub fn trunk(&self) -> &[Block] {
        &self.trunk
    }

    /// Canopy leaves.
    #[must_use]
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Fruit.
    #[must_use]
    pub fn fruit(&self) -> &[Fruit] {
        &self.fruit
    }

    /// Total number of parts.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.trunk.len() + self.leaves.len() + self.fruit.len()
    }

    /// Splits the tree into registrable parts: trunk, then leaves, then fruit.
    #[must_use]
    pub fn into_parts(self) -> Vec<EntityKind> {
        let mut parts = Vec::with_capacity(self.part_count());
        parts.extend(self.trunk.into_iter().map(EntityKind::Trunk));
        parts.extend(self.leaves.into_iter().map(EntityKind::Leaf));
        parts.extend(self.fruit.into_iter().map(EntityKind::Fruit));
        parts
    }
}
