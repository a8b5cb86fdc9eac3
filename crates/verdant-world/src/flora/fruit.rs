//! Edible fruit with a respawn timer.
//!
//! Fruit state is runtime-only: a regenerated tree always starts with
//! ripe fruit.

use glam::Vec2;

/// Whether a fruit can be eaten right now.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FruitState {
    /// Hanging on the tree
    #[default]
    Ripe,
    /// Eaten, growing back
    Eaten {
        /// Seconds until ripe again
        respawn_in: f32,
    },
}

/// A fruit hanging in a canopy cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Fruit {
    center: Vec2,
    size: f32,
    state: FruitState,
    respawn_secs: f32,
    energy: f32,
}

impl Fruit {
    /// Creates a ripe fruit.
    #[must_use]
    pub const fn new(center: Vec2, size: f32, respawn_secs: f32, energy: f32) -> Self {
        Self {
            center,
            size,
            state: FruitState::Ripe,
            respawn_secs,
            energy,
        }
    }

    /// Center in world space.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Diameter.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> FruitState {
        self.state
    }

    /// Checks if the fruit can be eaten.
    #[must_use]
    pub const fn is_ripe(&self) -> bool {
        matches!(self.state, FruitState::Ripe)
    }

    /// Eats the fruit, returning the energy gained.
    ///
    /// Returns `None` if it was already eaten.
    pub fn eat(&mut self) -> Option<f32> {
        if !self.is_ripe() {
            return None;
        }
        self.state = FruitState::Eaten {
            respawn_in: self.respawn_secs,
        };
        Some(self.energy)
    }

    /// Advances the respawn timer.
    pub fn update(&mut self, dt: f32) {
        if let FruitState::Eaten { respawn_in } = self.state {
            let remaining = respawn_in - dt;
            self.state = if remaining <= 0.0 {
                FruitState::Ripe
            } else {
                FruitState::Eaten {
                    respawn_in: remaining,
                }
            };
        }
    }
}
