//! The world-object registry seam.
//!
//! The streaming window is the only caller. Implementations must accept
//! removals of entities they do not hold.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use verdant_common::{ChunkCoord, EntityId};

use crate::entity::{EntityTag, WorldEntity};

/// Rendering/collision layer an entity is registered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Immovable solids (ground, trunks)
    StaticObjects,
    /// Everything else (leaves, fruit)
    Default,
}

/// External collection of live game objects.
pub trait WorldObjectRegistry {
    /// Registers an entity on a layer. Re-adding replaces the entry.
    fn add(&mut self, entity: &WorldEntity, layer: Layer);

    /// Deregisters an entity from a layer.
    ///
    /// Returns `false` if it was not registered there; never an error.
    fn remove(&mut self, id: EntityId, layer: Layer) -> bool;
}

/// Snapshot of what was registered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegisteredObject {
    /// Layer the entity lives on
    pub layer: Layer,
    /// Owning chunk
    pub chunk: ChunkCoord,
    /// Entity kind
    pub tag: EntityTag,
    /// Reference point in world space
    pub position: Vec2,
}

/// In-memory registry keyed by entity ID.
#[derive(Debug, Default)]
pub struct ObjectCollection {
    objects: HashMap<EntityId, RegisteredObject>,
}

impl ObjectCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Checks if an entity is registered on any layer.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Returns what was registered for an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&RegisteredObject> {
        self.objects.get(&id)
    }

    /// Number of objects on a layer.
    #[must_use]
    pub fn count_in(&self, layer: Layer) -> usize {
        self.objects.values().filter(|o| o.layer == layer).count()
    }

    /// Number of objects of a kind.
    #[must_use]
    pub fn count_tagged(&self, tag: EntityTag) -> usize {
        self.objects.values().filter(|o| o.tag == tag).count()
    }

    /// Iterates over registered objects.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &RegisteredObject)> {
        self.objects.iter().map(|(&id, object)| (id, object))
    }
}

impl WorldObjectRegistry for ObjectCollection {
    fn add(&mut self, entity: &WorldEntity, layer: Layer) {
        self.objects.insert(
            entity.id(),
            RegisteredObject {
                layer,
                chunk: entity.chunk(),
                tag: entity.kind().tag(),
                position: entity.kind().position(),
            },
        );
    }

    fn remove(&mut self, id: EntityId, layer: Layer) -> bool {
        match self.objects.get(&id) {
            Some(object) if object.layer == layer => {
                self.objects.remove(&id);
                true
            },
            _ => false,
        }
    }
}
