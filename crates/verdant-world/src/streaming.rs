//! Observer-driven chunk streaming.
//!
//! Each tick the window recomputes which chunks surround the observer,
//! loads the ones that entered, tears down the ones that left, and keeps a
//! record of every entity it registered so teardown is exact.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info, warn};
use verdant_common::{ChunkCoord, EntityId, EntityIdAllocator};

use crate::config::WorldConfig;
use crate::entity::{EntityKind, WorldEntity};
use crate::flora::FloraGenerator;
use crate::registry::WorldObjectRegistry;
use crate::terrain::Terrain;

/// Streaming window configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingConfig {
    /// Chunks kept active on each side of the observer's chunk
    pub load_radius: u32,
    /// Chunk width in world units
    pub chunk_width: u32,
    /// Destroy chunks as soon as they leave the window instead of leaving
    /// them to LRU eviction
    pub unload_on_exit: bool,
}

impl StreamingConfig {
    /// Derives the window configuration from world settings.
    #[must_use]
    pub const fn from_world(world: &WorldConfig) -> Self {
        Self {
            load_radius: world.load_radius,
            chunk_width: world.chunk_width(),
            unload_on_exit: false,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self::from_world(&WorldConfig::default())
    }
}

/// What one tick changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowDiff {
    /// Chunk containing the observer
    pub center: ChunkCoord,
    /// Chunks that entered the window, ascending
    pub loaded: Vec<ChunkCoord>,
    /// Chunks that left the window, ascending
    pub unloaded: Vec<ChunkCoord>,
    /// Tracked chunks torn down because terrain evicted them
    pub torn_down: Vec<ChunkCoord>,
}

impl WindowDiff {
    /// Returns true if the tick changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.unloaded.is_empty() && self.torn_down.is_empty()
    }
}

/// Running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamingStats {
    /// Ticks processed
    pub ticks: u64,
    /// Chunks brought into the window
    pub chunks_loaded: u64,
    /// Chunks dropped from the window
    pub chunks_unloaded: u64,
    /// Entities handed to the registry
    pub entities_registered: u64,
    /// Entities withdrawn from the registry
    pub entities_deregistered: u64,
    /// Tracked chunks torn down because terrain evicted them
    pub eviction_teardowns: u64,
}

/// The set of active chunks around one observer.
#[derive(Debug)]
pub struct StreamingWindow {
    /// Configuration
    config: StreamingConfig,
    /// Tree placement
    flora: FloraGenerator,
    /// Chunks currently inside the window
    active: BTreeSet<ChunkCoord>,
    /// Entities registered per chunk
    tracked: HashMap<ChunkCoord, Vec<WorldEntity>>,
    /// Entity ID source for this world
    ids: EntityIdAllocator,
    /// Chunk the observer was in at the last tick
    center: Option<ChunkCoord>,
    /// Running totals
    stats: StreamingStats,
}

impl StreamingWindow {
    /// Creates an empty window.
    #[must_use]
    pub fn new(config: StreamingConfig, flora: FloraGenerator) -> Self {
        info!(
            "Creating streaming window with load_radius={}, chunk_width={}",
            config.load_radius, config.chunk_width
        );

        Self {
            config,
            flora,
            active: BTreeSet::new(),
            tracked: HashMap::new(),
            ids: EntityIdAllocator::new(),
            center: None,
            stats: StreamingStats::default(),
        }
    }

    /// Creates a window with the default configuration for a world.
    ///
    /// Validates a copy of `world` the same way [`Terrain::new`] does, so
    /// both agree on chunk geometry.
    #[must_use]
    pub fn for_world(world: &WorldConfig, seed: u64) -> Self {
        let mut world = world.clone();
        world.validate();
        Self::new(
            StreamingConfig::from_world(&world),
            FloraGenerator::new(seed, &world),
        )
    }

    /// Recomputes the window around `observer_x` and applies the difference.
    ///
    /// Observers beyond the representable world stop at its edge: the window
    /// never reaches past `ChunkCoord::limit`.
    pub fn tick<R>(&mut self, observer_x: f32, terrain: &mut Terrain, registry: &mut R) -> WindowDiff
    where
        R: WorldObjectRegistry + ?Sized,
    {
        let center = ChunkCoord::from_world_x(observer_x, self.config.chunk_width)
            .clamp_for_window(self.config.load_radius, self.config.chunk_width);
        let desired: BTreeSet<ChunkCoord> = center.window(self.config.load_radius).collect();

        let unloaded: Vec<ChunkCoord> = self.active.difference(&desired).copied().collect();
        let loaded: Vec<ChunkCoord> = desired.difference(&self.active).copied().collect();

        for &coord in &unloaded {
            self.unload_chunk(coord, terrain, registry);
        }
        for &coord in &loaded {
            self.load_chunk(coord, terrain, registry);
        }

        self.active = desired;
        self.center = Some(center);

        let torn_down = self.reconcile_evictions(terrain, registry);

        self.stats.ticks += 1;
        let diff = WindowDiff {
            center,
            loaded,
            unloaded,
            torn_down,
        };
        if !diff.is_empty() {
            debug!(
                "Window at {center}: +{} -{} chunks, {} cached",
                diff.loaded.len(),
                diff.unloaded.len(),
                terrain.loaded_count()
            );
        }
        diff
    }

    /// Advances runtime state (fruit respawn timers) of active chunks.
    pub fn update(&mut self, dt: f32) {
        for entity in self.tracked.values_mut().flatten() {
            if let EntityKind::Fruit(fruit) = entity.kind_mut() {
                fruit.update(dt);
            }
        }
    }

    /// Eats a ripe fruit in the window, returning the energy gained.
    pub fn eat_fruit(&mut self, id: EntityId) -> Option<f32> {
        let entity = self
            .tracked
            .values_mut()
            .flatten()
            .find(|entity| entity.id() == id)?;
        match entity.kind_mut() {
            EntityKind::Fruit(fruit) => fruit.eat(),
            _ => None,
        }
    }

    /// Deregisters everything and empties the window.
    pub fn clear<R>(&mut self, terrain: &mut Terrain, registry: &mut R)
    where
        R: WorldObjectRegistry + ?Sized,
    {
        let active: Vec<ChunkCoord> = self.active.iter().copied().collect();
        for coord in active {
            self.unload_chunk(coord, terrain, registry);
        }
        self.active.clear();
        self.center = None;
    }

    /// Chunks currently in the window, ascending.
    #[must_use]
    pub const fn active(&self) -> &BTreeSet<ChunkCoord> {
        &self.active
    }

    /// Checks if a chunk is in the window.
    #[must_use]
    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.active.contains(&coord)
    }

    /// Entities registered for a chunk.
    #[must_use]
    pub fn entities(&self, coord: ChunkCoord) -> Option<&[WorldEntity]> {
        self.tracked.get(&coord).map(Vec::as_slice)
    }

    /// Looks up a registered entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&WorldEntity> {
        self.tracked.values().flatten().find(|entity| entity.id() == id)
    }

    /// Total entities currently registered by this window.
    #[must_use]
    pub fn tracked_entity_count(&self) -> usize {
        self.tracked.values().map(Vec::len).sum()
    }

    /// Chunk the observer was in at the last tick.
    #[must_use]
    pub const fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Window configuration.
    #[must_use]
    pub const fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Running totals.
    #[must_use]
    pub const fn stats(&self) -> &StreamingStats {
        &self.stats
    }

    fn load_chunk<R>(&mut self, coord: ChunkCoord, terrain: &mut Terrain, registry: &mut R)
    where
        R: WorldObjectRegistry + ?Sized,
    {
        let min_x = coord.min_x(self.config.chunk_width);
        let max_x = coord.max_x(self.config.chunk_width);

        let blocks = terrain.create_in_range(min_x, max_x);
        terrain.set_active(coord, true);
        let trees = self.flora.generate_in_range(&*terrain, coord, min_x, max_x);

        let mut entities = Vec::with_capacity(
            blocks.len() + trees.iter().map(|tree| tree.part_count()).sum::<usize>(),
        );
        entities.extend(
            blocks
                .into_iter()
                .map(|block| WorldEntity::new(self.ids.allocate(), coord, EntityKind::Ground(block))),
        );

        let mut flora_ids = Vec::new();
        for part in trees.into_iter().flat_map(|tree| tree.into_parts()) {
            let id = self.ids.allocate();
            flora_ids.push(id);
            entities.push(WorldEntity::new(id, coord, part));
        }
        terrain.attach_flora(coord, flora_ids);

        for entity in &entities {
            registry.add(entity, entity.layer());
        }

        debug!("Loaded {coord}: {} entities", entities.len());
        self.stats.chunks_loaded += 1;
        self.stats.entities_registered += entities.len() as u64;
        self.tracked.insert(coord, entities);
    }

    fn unload_chunk<R>(&mut self, coord: ChunkCoord, terrain: &mut Terrain, registry: &mut R)
    where
        R: WorldObjectRegistry + ?Sized,
    {
        let removed = self.deregister(coord, registry);
        debug!("Unloaded {coord}: {removed} entities");
        self.stats.chunks_unloaded += 1;

        terrain.set_active(coord, false);
        if self.config.unload_on_exit {
            terrain.unload(coord);
        }
    }

    /// Deregisters everything recorded for a chunk and forgets it.
    fn deregister<R>(&mut self, coord: ChunkCoord, registry: &mut R) -> usize
    where
        R: WorldObjectRegistry + ?Sized,
    {
        let Some(entities) = self.tracked.remove(&coord) else {
            return 0;
        };
        for entity in &entities {
            registry.remove(entity.id(), entity.layer());
        }
        self.stats.entities_deregistered += entities.len() as u64;
        entities.len()
    }

    /// Terrain's cache decides what content is alive: tear down anything
    /// still tracked for a chunk it evicted.
    fn reconcile_evictions<R>(&mut self, terrain: &mut Terrain, registry: &mut R) -> Vec<ChunkCoord>
    where
        R: WorldObjectRegistry + ?Sized,
    {
        let mut torn_down = Vec::new();
        for coord in terrain.take_evictions() {
            if !self.tracked.contains_key(&coord) {
                continue;
            }
            warn!("Terrain evicted tracked {coord}, tearing down its entities");
            self.deregister(coord, registry);
            self.active.remove(&coord);
            self.stats.eviction_teardowns += 1;
            torn_down.push(coord);
        }
        torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ObjectCollection;

    fn world(seed: u64) -> (Terrain, StreamingWindow, ObjectCollection) {
        let config = WorldConfig::default();
        (
            Terrain::new(config.clone(), 500.0, seed),
            StreamingWindow::for_world(&config, seed),
            ObjectCollection::new(),
        )
    }

    fn coords(range: std::ops::RangeInclusive<i32>) -> Vec<ChunkCoord> {
        range.map(ChunkCoord::new).collect()
    }

    #[test]
    fn test_first_tick_loads_full_window() {
        let (mut terrain, mut window, mut objects) = world(1);
        let diff = window.tick(0.0, &mut terrain, &mut objects);

        assert_eq!(diff.center, ChunkCoord::new(0));
        assert_eq!(diff.loaded, coords(-5..=5));
        assert!(diff.unloaded.is_empty());
        assert_eq!(window.active().len(), 11);
        assert_eq!(objects.len(), window.tracked_entity_count());
        for coord in coords(-5..=5) {
            assert!(terrain.chunk(coord).is_some_and(|c| c.is_active()));
        }
    }

    #[test]
    fn test_moving_one_chunk() {
        let (mut terrain, mut window, mut objects) = world(1);
        window.tick(0.0, &mut terrain, &mut objects);
        let diff = window.tick(400.0, &mut terrain, &mut objects);

        assert_eq!(diff.center, ChunkCoord::new(1));
        assert_eq!(diff.loaded, vec![ChunkCoord::new(6)]);
        assert_eq!(diff.unloaded, vec![ChunkCoord::new(-5)]);
        assert!(window.entities(ChunkCoord::new(-5)).is_none());
        // Left the window but stays cached until evicted.
        assert!(terrain.chunk(ChunkCoord::new(-5)).is_some_and(|c| !c.is_active()));
    }

    #[test]
    fn test_same_chunk_is_a_noop() {
        let (mut terrain, mut window, mut objects) = world(1);
        window.tick(10.0, &mut terrain, &mut objects);
        let registered = objects.len();
        assert!(window.tick(290.0, &mut terrain, &mut objects).is_empty());
        assert_eq!(objects.len(), registered);
    }

    #[test]
    fn test_unload_on_exit_destroys_chunks() {
        let config = WorldConfig::default();
        let mut terrain = Terrain::new(config.clone(), 500.0, 3);
        let mut streaming = StreamingConfig::from_world(&config);
        streaming.unload_on_exit = true;
        let mut window = StreamingWindow::new(streaming, FloraGenerator::new(3, &config));
        let mut objects = ObjectCollection::new();

        window.tick(0.0, &mut terrain, &mut objects);
        window.tick(3000.0, &mut terrain, &mut objects);
        assert_eq!(terrain.loaded_count(), 11);
        assert!(!terrain.is_loaded(ChunkCoord::new(0)));
    }

    #[test]
    fn test_fruit_can_be_eaten_and_respawns() {
        let (mut terrain, mut window, mut objects) = world(42);
        window.tick(0.0, &mut terrain, &mut objects);

        let fruit_id = coords(-5..=5)
            .into_iter()
            .filter_map(|c| window.entities(c))
            .flatten()
            .find(|e| matches!(e.kind(), EntityKind::Fruit(_)))
            .map(WorldEntity::id)
            .expect("eleven chunks grow at least one fruit");

        assert_eq!(window.eat_fruit(fruit_id), Some(10.0));
        assert_eq!(window.eat_fruit(fruit_id), None);
        window.update(30.0);
        assert_eq!(window.eat_fruit(fruit_id), Some(10.0));
    }

    #[test]
    fn test_eat_non_fruit_returns_none() {
        let (mut terrain, mut window, mut objects) = world(42);
        window.tick(0.0, &mut terrain, &mut objects);
        let ground = window
            .entities(ChunkCoord::new(0))
            .and_then(|e| e.first())
            .map(WorldEntity::id)
            .expect("chunk has ground");
        assert_eq!(window.eat_fruit(ground), None);
        assert_eq!(window.eat_fruit(EntityId::from_raw(u64::MAX)), None);
    }

    #[test]
    fn test_flora_attached_to_terrain_chunk() {
        let (mut terrain, mut window, mut objects) = world(42);
        window.tick(0.0, &mut terrain, &mut objects);
        for coord in coords(-5..=5) {
            let tracked = window.entities(coord).map_or(0, |e| {
                e.iter()
                    .filter(|e| !matches!(e.kind(), EntityKind::Ground(_)))
                    .count()
            });
            let attached = terrain.chunk(coord).map_or(0, |c| c.flora().len());
            assert_eq!(tracked, attached);
        }
    }

    #[test]
    fn test_clear_deregisters_everything() {
        let (mut terrain, mut window, mut objects) = world(8);
        window.tick(0.0, &mut terrain, &mut objects);
        window.clear(&mut terrain, &mut objects);
        assert!(objects.is_empty());
        assert!(window.active().is_empty());
        assert_eq!(window.tracked_entity_count(), 0);
        let stats = window.stats();
        assert_eq!(stats.entities_registered, stats.entities_deregistered);
    }
}
