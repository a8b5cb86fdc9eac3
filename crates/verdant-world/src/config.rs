//! World generation and streaming parameters.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Height-field noise parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightConfig {
    /// Peak deviation from the baseline, in world units
    pub amplitude: f32,
    /// World units covered by one noise period (larger = smoother)
    pub scale: f32,
    /// Fractal octaves
    pub octaves: usize,
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            amplitude: 210.0,
            scale: 840.0,
            octaves: 4,
        }
    }
}

/// Tree placement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloraConfig {
    /// Distance between candidate tree positions, in blocks
    pub tree_spacing_blocks: u32,
    /// Chance (0-100) that a candidate position grows a tree
    pub spawn_probability: u32,
    /// Shortest trunk, in blocks
    pub min_trunk_height: u32,
    /// Tallest trunk, in blocks
    pub max_trunk_height: u32,
    /// Canopy footprint width, in blocks
    pub canopy_width: u32,
    /// Canopy footprint height, in blocks
    pub canopy_height: u32,
    /// Fewest leaves per canopy
    pub min_leaves: u32,
    /// Most leaves per canopy
    pub max_leaves: u32,
    /// Fewest fruit per tree
    pub min_fruit: u32,
    /// Most fruit per tree
    pub max_fruit: u32,
    /// Seconds before an eaten fruit grows back
    pub fruit_respawn_secs: f32,
    /// Energy granted by eating one fruit
    pub fruit_energy: f32,
}

impl Default for FloraConfig {
    fn default() -> Self {
        Self {
            tree_spacing_blocks: 16,
            spawn_probability: 90,
            min_trunk_height: 4,
            max_trunk_height: 9,
            canopy_width: 7,
            canopy_height: 6,
            min_leaves: 22,
            max_leaves: 32,
            min_fruit: 1,
            max_fruit: 3,
            fruit_respawn_secs: 30.0,
            fruit_energy: 10.0,
        }
    }
}

impl FloraConfig {
    /// Number of cells in the canopy grid.
    #[must_use]
    pub const fn canopy_cells(&self) -> u32 {
        self.canopy_width * self.canopy_height
    }
}

/// Complete world configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of a block in world units
    pub block_size: u32,
    /// Chunk width in blocks
    pub chunk_blocks: u32,
    /// Maximum blocks per terrain column
    pub terrain_depth: u32,
    /// Chunks kept active on each side of the observer
    pub load_radius: u32,
    /// Maximum cached chunks before LRU eviction
    pub cache_capacity: usize,
    /// Height-field parameters
    pub height: HeightConfig,
    /// Flora parameters
    pub flora: FloraConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            block_size: 30,
            chunk_blocks: 10,
            terrain_depth: 25,
            load_radius: 5,
            cache_capacity: 20,
            height: HeightConfig::default(),
            flora: FloraConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Chunk width in world units.
    #[must_use]
    pub const fn chunk_width(&self) -> u32 {
        self.block_size * self.chunk_blocks
    }

    /// Distance between tree candidates in world units.
    #[must_use]
    pub const fn tree_spacing(&self) -> u32 {
        self.flora.tree_spacing_blocks * self.block_size
    }

    /// Number of chunks in a full active window.
    #[must_use]
    pub const fn window_len(&self) -> usize {
        (self.load_radius * 2 + 1) as usize
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        clamp_u32("block_size", &mut self.block_size, 1, 1024);
        clamp_u32("chunk_blocks", &mut self.chunk_blocks, 1, 256);
        clamp_u32("terrain_depth", &mut self.terrain_depth, 1, 256);
        clamp_u32("load_radius", &mut self.load_radius, 0, 64);

        if self.cache_capacity == 0 {
            warn!("cache_capacity must be positive, using 1");
            self.cache_capacity = 1;
        }

        if !self.height.amplitude.is_finite() || self.height.amplitude < 0.0 {
            warn!("height.amplitude {} invalid, using 0", self.height.amplitude);
            self.height.amplitude = 0.0;
        }
        if !self.height.scale.is_finite() || self.height.scale < 1.0 {
            warn!("height.scale {} invalid, using 1", self.height.scale);
            self.height.scale = 1.0;
        }
        let octaves = self.height.octaves.clamp(1, 8);
        if octaves != self.height.octaves {
            warn!(
                "height.octaves = {} out of range [1, 8], using {octaves}",
                self.height.octaves
            );
            self.height.octaves = octaves;
        }

        let flora = &mut self.flora;
        clamp_u32("flora.tree_spacing_blocks", &mut flora.tree_spacing_blocks, 1, 1024);
        clamp_u32("flora.spawn_probability", &mut flora.spawn_probability, 0, 100);
        clamp_u32("flora.canopy_width", &mut flora.canopy_width, 1, 32);
        clamp_u32("flora.canopy_height", &mut flora.canopy_height, 1, 32);
        clamp_u32("flora.min_trunk_height", &mut flora.min_trunk_height, 1, 64);
        let min_trunk = flora.min_trunk_height;
        clamp_u32("flora.max_trunk_height", &mut flora.max_trunk_height, min_trunk, 64);

        let cells = flora.canopy_cells();
        clamp_u32("flora.min_leaves", &mut flora.min_leaves, 0, cells);
        let min_leaves = flora.min_leaves;
        clamp_u32("flora.max_leaves", &mut flora.max_leaves, min_leaves, cells);
        clamp_u32("flora.min_fruit", &mut flora.min_fruit, 0, cells);
        let min_fruit = flora.min_fruit;
        clamp_u32("flora.max_fruit", &mut flora.max_fruit, min_fruit, cells);

        if !flora.fruit_respawn_secs.is_finite() || flora.fruit_respawn_secs < 0.0 {
            warn!("flora.fruit_respawn_secs invalid, using 0");
            flora.fruit_respawn_secs = 0.0;
        }
        if !flora.fruit_energy.is_finite() {
            warn!("flora.fruit_energy invalid, using 0");
            flora.fruit_energy = 0.0;
        }
    }
}

fn clamp_u32(field: &str, value: &mut u32, min: u32, max: u32) {
    let clamped = (*value).clamp(min, max);
    if clamped != *value {
        warn!("{field} = {} out of range [{min}, {max}], using {clamped}", *value);
        *value = clamped;
    }
}
