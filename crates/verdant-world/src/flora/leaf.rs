//! Canopy leaves.

use glam::Vec2;

/// Back-and-forth sway of a leaf, purely a function of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafSway {
    /// Seconds before swaying starts
    pub delay: f32,
    /// Leftmost angle in degrees
    pub min_angle: f32,
    /// Rightmost angle in degrees
    pub max_angle: f32,
    /// Seconds for one sweep from one extreme to the other
    pub sweep_secs: f32,
}

impl LeafSway {
    /// Shortest start delay.
    pub const MIN_DELAY: f32 = 0.2;
    /// Longest start delay.
    pub const MAX_DELAY: f32 = 0.7;
    /// Sway amplitude in degrees.
    pub const ANGLE: f32 = 15.0;
    /// Duration of one sweep.
    pub const SWEEP_SECS: f32 = 1.2;

    /// Draws a start delay from `rng`.
    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self {
            delay: Self::MIN_DELAY + rng.f32() * (Self::MAX_DELAY - Self::MIN_DELAY),
            min_angle: -Self::ANGLE,
            max_angle: Self::ANGLE,
            sweep_secs: Self::SWEEP_SECS,
        }
    }

    /// Rendering angle `elapsed` seconds after the leaf appeared.
    #[must_use]
    pub fn angle_at(&self, elapsed: f32) -> f32 {
        if elapsed < self.delay {
            return 0.0;
        }
        let phase = ((elapsed - self.delay) / self.sweep_secs).rem_euclid(2.0);
        let t = if phase < 1.0 { phase } else { 2.0 - phase };
        self.min_angle + (self.max_angle - self.min_angle) * t
    }
}

/// One leaf tile of a canopy.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    position: Vec2,
    size: f32,
    cell: (u32, u32),
    sway: LeafSway,
}

impl Leaf {
    /// Creates a leaf with its top-left corner at `position`.
    #[must_use]
    pub const fn new(position: Vec2, size: f32, cell: (u32, u32), sway: LeafSway) -> Self {
        Self {
            position,
            size,
            cell,
            sway,
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

    /// Canopy grid cell `(column, row)`.
    #[must_use]
    pub const fn cell(&self) -> (u32, u32) {
        self.cell
    }

    /// Sway parameters.
    #[must_use]
    pub const fn sway(&self) -> &LeafSway {
        &self.sway
    }

    /// Rendering angle `elapsed` seconds after the leaf appeared.
    #[must_use]
    pub fn angle_at(&self, elapsed: f32) -> f32 {
        self.sway.angle_at(elapsed)
    }
}
