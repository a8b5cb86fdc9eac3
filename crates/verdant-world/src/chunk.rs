//! Chunk data structure and lifecycle.

use verdant_common::{ChunkCoord, EntityId};

use crate::block::Block;

/// Lifecycle state of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChunkState {
    /// Never generated, or evicted
    #[default]
    Unloaded,
    /// Blocks materialized and cached
    Loaded,
}

/// Everything a chunk held when it was unloaded.
#[derive(Debug, Default)]
pub struct ChunkContents {
    /// Terrain blocks, in generation order
    pub blocks: Vec<Block>,
    /// Flora entities that were attached
    pub flora: Vec<EntityId>,
}

/// A fixed-width slice of the world.
///
/// All blocks lie within `[min_x, max_x)`. Transitions are idempotent:
/// loading a loaded chunk or unloading an unloaded one does nothing.
#[derive(Debug)]
pub struct Chunk {
    /// Chunk coordinate
    coord: ChunkCoord,
    /// Chunk width in world units
    width: u32,
    /// Lifecycle state
    state: ChunkState,
    /// Terrain blocks
    blocks: Vec<Block>,
    /// Attached flora entities
    flora: Vec<EntityId>,
    /// Inside the observer's window, so never evicted
    active: bool,
}

impl Chunk {
    /// Creates a new unloaded chunk.
    #[must_use]
    pub const fn new(coord: ChunkCoord, width: u32) -> Self {
        Self {
            coord,
            width,
            state: ChunkState::Unloaded,
            blocks: Vec::new(),
            flora: Vec::new(),
            active: false,
        }
    }

    /// Returns the chunk coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ChunkState {
        self.state
    }

    /// Returns whether the chunk is loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state == ChunkState::Loaded
    }

    /// Returns whether the chunk is inside the active window.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Sets the active flag.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// First world x of the chunk (inclusive).
    #[must_use]
    pub const fn min_x(&self) -> i32 {
        self.coord.min_x(self.width)
    }

    /// End world x of the chunk (exclusive).
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.coord.max_x(self.width)
    }

    /// Returns the terrain blocks.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the attached flora entities.
    #[must_use]
    pub fn flora(&self) -> &[EntityId] {
        &self.flora
    }

    /// Moves the chunk to `Loaded` with the given blocks.
    ///
    /// Returns `false` (and drops `blocks`) if it was already loaded.
    pub fn load(&mut self, blocks: Vec<Block>) -> bool {
        if self.is_loaded() {
            return false;
        }
        debug_assert!(
            blocks.iter().all(|b| {
                let x = b.position().x;
                // f32 positions round near the edge of the world; compare
                // inclusively so rounding never trips the check.
                x >= self.min_x() as f32 && x <= self.max_x() as f32
            }),
            "block outside {}",
            self.coord
        );
        self.blocks = blocks;
        self.state = ChunkState::Loaded;
        true
    }

    /// Replaces the attached flora. Ignored while unloaded.
    pub fn attach_flora(&mut self, flora: Vec<EntityId>) -> bool {
        if !self.is_loaded() {
            return false;
        }
        self.flora = flora;
        true
    }

    /// Moves the chunk to `Unloaded`, handing its contents back.
    ///
    /// Returns `None` if it was already unloaded.
    pub fn unload(&mut self) -> Option<ChunkContents> {
        if !self.is_loaded() {
            return None;
        }
        self.state = ChunkState::Unloaded;
        self.active = false;
        Some(ChunkContents {
            blocks: std::mem::take(&mut self.blocks),
            flora: std::mem::take(&mut self.flora),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockMaterial;
    use glam::Vec2;

    fn block_at(x: f32) -> Block {
        Block::new(Vec2::new(x, 330.0), 30.0, BlockMaterial::Topsoil)
    }

    #[test]
    fn test_chunk_creation() {
        let chunk = Chunk::new(ChunkCoord::new(-2), 300);
        assert_eq!(chunk.state(), ChunkState::Unloaded);
        assert_eq!(chunk.min_x(), -600);
        assert_eq!(chunk.max_x(), -300);
        assert!(chunk.blocks().is_empty());
        assert!(!chunk.is_active());
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut chunk = Chunk::new(ChunkCoord::new(0), 300);
        assert!(chunk.load(vec![block_at(0.0), block_at(30.0)]));
        assert!(!chunk.load(vec![block_at(60.0)]));
        assert_eq!(chunk.blocks().len(), 2);
    }

    #[test]
    fn test_unload_hands_back_contents() {
        let mut chunk = Chunk::new(ChunkCoord::new(0), 300);
        chunk.load(vec![block_at(0.0)]);
        assert!(chunk.attach_flora(vec![EntityId::from_raw(4), EntityId::from_raw(5)]));
        chunk.set_active(true);

        let contents = chunk.unload().expect("loaded chunk has contents");
        assert_eq!(contents.blocks.len(), 1);
        assert_eq!(contents.flora.len(), 2);
        assert_eq!(chunk.state(), ChunkState::Unloaded);
        assert!(!chunk.is_active());
        assert!(chunk.blocks().is_empty());
        assert!(chunk.flora().is_empty());

        assert!(chunk.unload().is_none());
    }

    #[test]
    fn test_flora_needs_loaded_chunk() {
        let mut chunk = Chunk::new(ChunkCoord::new(1), 300);
        assert!(!chunk.attach_flora(vec![EntityId::from_raw(1)]));
        assert!(chunk.flora().is_empty());
    }
}
