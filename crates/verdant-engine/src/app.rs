//! Headless session.
//!
//! Moves an observer through the world at a fixed step, streams chunks
//! around it, and forages fruit near its position.

use anyhow::Result;
use tracing::{debug, info};
use verdant_common::{ChunkCoord, EntityId};
use verdant_world::{
    EntityKind, FloraGenerator, ObjectCollection, StreamingConfig, StreamingWindow, Terrain,
    WindowDiff,
};

use crate::config::EngineConfig;
use crate::timing::FrameClock;

/// World, window and observer of one run.
pub struct Simulation {
    /// Ground and chunk cache
    terrain: Terrain,
    /// Active window around the observer
    window: StreamingWindow,
    /// Registered game objects
    objects: ObjectCollection,
    /// Observer position
    observer_x: f32,
    /// Signed observer speed
    velocity: f32,
    /// Seconds between turns (0 = never)
    turn_after: f32,
    /// Seconds walked since the last turn
    since_turn: f32,
    /// Seconds between foraging attempts (0 = never)
    forage_interval: f32,
    /// Seconds since the last foraging attempt
    since_forage: f32,
    /// Energy gathered from fruit
    energy: f32,
    /// Fruit eaten
    fruit_eaten: u64,
}

impl Simulation {
    /// Builds the world described by `config`.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let seed = config.world_seed.unwrap_or_else(|| fastrand::u64(..));
        info!("World seed: {seed}");

        let world = &config.world;
        let mut streaming = StreamingConfig::from_world(world);
        streaming.unload_on_exit = config.unload_on_exit;

        Self {
            terrain: Terrain::new(world.clone(), config.window_height, seed),
            window: StreamingWindow::new(streaming, FloraGenerator::new(seed, world)),
            objects: ObjectCollection::new(),
            observer_x: config.observer_start_x,
            velocity: config.observer_speed,
            turn_after: config.turn_after_secs,
            since_turn: 0.0,
            forage_interval: config.forage_interval_secs,
            since_forage: 0.0,
            energy: 0.0,
            fruit_eaten: 0,
        }
    }

    /// Advances one frame.
    pub fn step(&mut self, dt: f32) -> WindowDiff {
        self.observer_x += self.velocity * dt;
        if self.turn_after > 0.0 {
            self.since_turn += dt;
            if self.since_turn >= self.turn_after {
                self.since_turn = 0.0;
                self.velocity = -self.velocity;
                debug!("Observer turned at x={:.0}", self.observer_x);
            }
        }

        let diff = self
            .window
            .tick(self.observer_x, &mut self.terrain, &mut self.objects);
        self.window.update(dt);

        if self.forage_interval > 0.0 {
            self.since_forage += dt;
            if self.since_forage >= self.forage_interval {
                self.since_forage = 0.0;
                self.forage(diff.center);
            }
        }

        diff
    }

    /// Eats the ripe fruit in `center` closest to the observer.
    fn forage(&mut self, center: ChunkCoord) {
        let Some(id) = self.nearest_ripe_fruit(center) else {
            return;
        };
        if let Some(energy) = self.window.eat_fruit(id) {
            self.energy += energy;
            self.fruit_eaten += 1;
            debug!("Ate fruit {id} for {energy} energy");
        }
    }

    fn nearest_ripe_fruit(&self, center: ChunkCoord) -> Option<EntityId> {
        self.window
            .entities(center)?
            .iter()
            .filter_map(|entity| match entity.kind() {
                EntityKind::Fruit(fruit) if fruit.is_ripe() => {
                    Some((entity.id(), (fruit.center().x - self.observer_x).abs()))
                },
                _ => None,
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Observer position.
    #[must_use]
    pub fn observer_x(&self) -> f32 {
        self.observer_x
    }

    /// Fruit eaten so far.
    #[must_use]
    pub fn fruit_eaten(&self) -> u64 {
        self.fruit_eaten
    }

    /// Energy gathered so far.
    #[must_use]
    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Streaming window.
    #[must_use]
    pub fn window(&self) -> &StreamingWindow {
        &self.window
    }

    /// Terrain.
    #[must_use]
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Registered objects.
    #[must_use]
    pub fn objects(&self) -> &ObjectCollection {
        &self.objects
    }

    /// Deregisters everything still in the window.
    pub fn shutdown(&mut self) {
        self.window.clear(&mut self.terrain, &mut self.objects);
    }

    fn log_stats(&self, clock: &FrameClock) {
        let stats = self.window.stats();
        info!(
            "frame {} t={:.1}s x={:.0}: {} objects, {} cached chunks, loaded {} / unloaded {}, {:.3} ms/frame",
            clock.frames(),
            clock.sim_time(),
            self.observer_x(),
            self.objects().len(),
            self.terrain().loaded_count(),
            stats.chunks_loaded,
            stats.chunks_unloaded,
            clock.average_frame_time_ms()
        );
    }
}

/// Run the session to completion.
pub fn run(config: &EngineConfig) -> Result<()> {
    let mut sim = Simulation::new(config);
    let mut clock = FrameClock::new(config.target_fps, config.realtime);

    info!(
        "Simulating {} frames of {:.4}s{}",
        config.frames,
        clock.fixed_dt(),
        if config.realtime { " (realtime)" } else { "" }
    );

    for _ in 0..config.frames {
        let dt = clock.advance();
        sim.step(dt);

        if config.stats_interval > 0 && clock.frames() % config.stats_interval == 0 {
            sim.log_stats(&clock);
        }
    }

    sim.log_stats(&clock);
    let stats = *sim.window().stats();
    info!(
        "Ate {} fruit for {:.0} energy; {} eviction teardowns",
        sim.fruit_eaten(),
        sim.energy(),
        stats.eviction_teardowns
    );

    sim.shutdown();
    debug_assert!(sim.objects().is_empty());
    Ok(())
}
