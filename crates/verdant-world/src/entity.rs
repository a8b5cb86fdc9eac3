//! Entities handed to the world-object registry.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use verdant_common::{ChunkCoord, EntityId};

use crate::block::Block;
use crate::flora::{Fruit, Leaf};
use crate::registry::Layer;

/// Fieldless discriminant of [`EntityKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Terrain block
    Ground,
    /// Tree trunk block
    Trunk,
    /// Canopy leaf
    Leaf,
    /// Fruit
    Fruit,
}

/// What an entity is.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// Terrain block
    Ground(Block),
    /// Tree trunk block
    Trunk(Block),
    /// Canopy leaf
    Leaf(Leaf),
    /// Fruit
    Fruit(Fruit),
}

impl EntityKind {
    /// Returns the discriminant.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Ground(_) => EntityTag::Ground,
            Self::Trunk(_) => EntityTag::Trunk,
            Self::Leaf(_) => EntityTag::Leaf,
            Self::Fruit(_) => EntityTag::Fruit,
        }
    }

    /// Rendering layer: solid blocks are static, foliage is not.
    #[must_use]
    pub const fn layer(&self) -> Layer {
        match self {
            Self::Ground(_) | Self::Trunk(_) => Layer::StaticObjects,
            Self::Leaf(_) | Self::Fruit(_) => Layer::Default,
        }
    }

    /// Reference point in world space (top-left corner, fruit center).
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        match self {
            Self::Ground(block) | Self::Trunk(block) => block.position(),
            Self::Leaf(leaf) => leaf.position(),
            Self::Fruit(fruit) => fruit.center(),
        }
    }
}

/// An entity owned by a chunk while the chunk is in the active window.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldEntity {
    id: EntityId,
    chunk: ChunkCoord,
    kind: EntityKind,
}

impl WorldEntity {
    /// Creates an entity.
    #[must_use]
    pub const fn new(id: EntityId, chunk: ChunkCoord, kind: EntityKind) -> Self {
        Self { id, chunk, kind }
    }

    /// Entity ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Owning chunk.
    #[must_use]
    pub const fn chunk(&self) -> ChunkCoord {
        self.chunk
    }

    /// What the entity is.
    #[must_use]
    pub const fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Mutable access for runtime state such as fruit timers.
    pub fn kind_mut(&mut self) -> &mut EntityKind {
        &mut self.kind
    }

    /// Rendering layer.
    #[must_use]
    pub const fn layer(&self) -> Layer {
        self.kind.layer()
    }
}
