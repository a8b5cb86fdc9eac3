//! Bounded chunk cache with least-recently-used eviction.

use std::collections::{HashMap, VecDeque};

use tracing::trace;
use verdant_common::ChunkCoord;

use crate::chunk::{Chunk, ChunkContents};

/// A chunk removed by the eviction policy.
#[derive(Debug)]
pub struct Eviction {
    /// Coordinate of the evicted chunk
    pub coord: ChunkCoord,
    /// What the chunk held
    pub contents: ChunkContents,
}

/// Coordinate-keyed chunk storage with an access-order queue.
///
/// Active chunks are never evicted. When every remaining candidate is
/// active the cache stays over capacity until one becomes inactive.
#[derive(Debug)]
pub struct ChunkCache {
    /// Cached chunks
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Access order, least recently used at the front
    recency: VecDeque<ChunkCoord>,
    /// Target maximum number of chunks
    capacity: usize,
}

impl ChunkCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            chunks: HashMap::with_capacity(capacity + 1),
            recency: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Returns the target capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of cached chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns true if more chunks are cached than `capacity`.
    #[must_use]
    pub fn is_over_capacity(&self) -> bool {
        self.chunks.len() > self.capacity
    }

    /// Checks if a chunk is cached.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Gets a cached chunk without touching its recency.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Gets a cached chunk mutably without touching its recency.
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Marks a chunk as most recently used.
    pub fn touch(&mut self, coord: ChunkCoord) -> bool {
        if !self.chunks.contains_key(&coord) {
            return false;
        }
        if let Some(pos) = self.recency.iter().position(|&c| c == coord) {
            self.recency.remove(pos);
        }
        self.recency.push_back(coord);
        true
    }

    /// Inserts a chunk as most recently used, replacing any chunk at the
    /// same coordinate.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        let coord = chunk.coord();
        let previous = self.chunks.insert(coord, chunk);
        if previous.is_some() {
            self.recency.retain(|&c| c != coord);
        }
        self.recency.push_back(coord);
        previous
    }

    /// Removes a chunk regardless of recency.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let chunk = self.chunks.remove(&coord)?;
        self.recency.retain(|&c| c != coord);
        Some(chunk)
    }

    /// Evicts least recently used inactive chunks until the cache fits.
    ///
    /// Chunks listed in `protected` are skipped along with active ones.
    pub fn evict_excess(&mut self, protected: &[ChunkCoord]) -> Vec<Eviction> {
        let mut evicted = Vec::new();
        let mut cursor = 0;

        while self.chunks.len() > self.capacity && cursor < self.recency.len() {
            let coord = self.recency[cursor];
            let evictable = !protected.contains(&coord)
                && self.chunks.get(&coord).is_some_and(|c| !c.is_active());

            if !evictable {
                cursor += 1;
                continue;
            }

            self.recency.remove(cursor);
            if let Some(mut chunk) = self.chunks.remove(&coord) {
                trace!("Evicting {coord}");
                evicted.push(Eviction {
                    coord,
                    contents: chunk.unload().unwrap_or_default(),
                });
            }
        }

        evicted
    }

    /// Iterates cached coordinates from least to most recently used.
    pub fn recency(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.recency.iter().copied()
    }

    /// Iterates over cached chunks in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }
}
