//! Square, immutable world tiles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a block is made of.
///
/// Only rendering and collision care about the difference; generation
/// treats all materials alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockMaterial {
    /// Top two blocks of a terrain column
    Topsoil,
    /// Remaining blocks of a terrain column
    Subsoil,
    /// Tree trunk segment
    Trunk,
}

impl BlockMaterial {
    /// Material for the block at `depth` (0 = top) within a terrain column.
    #[must_use]
    pub const fn for_depth(depth: u32) -> Self {
        if depth <= 1 {
            Self::Topsoil
        } else {
            Self::Subsoil
        }
    }

    /// Checks if this is ground (topsoil or subsoil).
    #[must_use]
    pub const fn is_ground(self) -> bool {
        matches!(self, Self::Topsoil | Self::Subsoil)
    }
}

/// A single square block. Created once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    position: Vec2,
    size: f32,
    material: BlockMaterial,
    immovable: bool,
}

impl Block {
    /// Creates an immovable block with its top-left corner at `position`.
    #[must_use]
    pub const fn new(position: Vec2, size: f32, material: BlockMaterial) -> Self {
        Self {
            position,
            size,
            material,
            immovable: true,
        }
    }

    /// Top-left corner in world space.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Edge length.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Block material.
    #[must_use]
    pub const fn material(&self) -> BlockMaterial {
        self.material
    }

    /// Whether physics must treat this block as infinitely heavy.
    #[must_use]
    pub const fn is_immovable(&self) -> bool {
        self.immovable
    }

    /// Identity tuple used to compare generated layouts bit for bit.
    #[must_use]
    pub fn layout_key(&self) -> (u32, u32, BlockMaterial) {
        (self.position.x.to_bits(), self.position.y.to_bits(), self.material)
    }
}
