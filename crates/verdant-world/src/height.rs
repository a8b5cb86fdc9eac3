//! Ground elevation as a pure function of world x.

use std::fmt;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::config::HeightConfig;
use crate::seed::fold32;

/// Anything that can report the ground elevation at a world x position.
///
/// Screen-style coordinates: larger y is further down.
pub trait GroundHeight {
    /// Ground y at world x.
    fn height_at(&self, x: f32) -> f32;
}

/// Baseline ground height for a window of the given height.
#[must_use]
pub fn baseline_for_window(window_height: f32) -> f32 {
    (window_height * 2.0 / 3.0).floor()
}

/// Deterministic 1D height field: `baseline + noise(seed, |x|)`.
pub struct HeightField {
    seed: u64,
    baseline: f32,
    amplitude: f64,
    scale: f64,
    noise: Fbm<Perlin>,
}

impl HeightField {
    /// Creates a height field centred on `baseline`.
    #[must_use]
    pub fn new(seed: u64, baseline: f32, config: &HeightConfig) -> Self {
        let noise = Fbm::<Perlin>::new(fold32(seed)).set_octaves(config.octaves);
        Self {
            seed,
            baseline,
            amplitude: f64::from(config.amplitude),
            scale: f64::from(config.scale),
            noise,
        }
    }

    /// Returns the world seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the baseline ground height.
    #[must_use]
    pub const fn baseline(&self) -> f32 {
        self.baseline
    }
}

impl GroundHeight for HeightField {
    fn height_at(&self, x: f32) -> f32 {
        let sample = self.noise.get([f64::from(x.abs()) / self.scale, 0.5]);
        self.baseline + (sample * self.amplitude) as f32
    }
}

impl fmt::Debug for HeightField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeightField")
            .field("seed", &self.seed)
            .field("baseline", &self.baseline)
            .field("amplitude", &self.amplitude)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}
