//! Engine configuration.
//!
//! Provides the run, observer and world parameters of a headless session.
//! Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use verdant_common::{ConfigError, VerdantResult};
use verdant_world::WorldConfig;

/// Configuration file name.
pub const CONFIG_FILE: &str = "verdant.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Run Settings ===
    /// Height of the virtual window in world units (sets the ground baseline)
    pub window_height: f32,
    /// Simulated frames per second
    pub target_fps: u32,
    /// Frames to simulate before exiting
    pub frames: u64,
    /// Pace frames in real time instead of running flat out
    pub realtime: bool,
    /// Log a stats line every this many frames (0 = only at the end)
    pub stats_interval: u64,

    // === Observer Settings ===
    /// World seed (None = random)
    pub world_seed: Option<u64>,
    /// Observer start position
    pub observer_start_x: f32,
    /// Observer speed in world units per second (negative walks left)
    pub observer_speed: f32,
    /// Turn around after walking this many seconds (0 = never)
    pub turn_after_secs: f32,
    /// Seconds between attempts to eat nearby fruit (0 = never)
    pub forage_interval_secs: f32,

    // === Streaming Settings ===
    /// Destroy chunks as soon as they leave the window
    pub unload_on_exit: bool,

    // === World Settings ===
    /// World generation parameters
    pub world: WorldConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Run
            window_height: 720.0,
            target_fps: 60,
            frames: 3600,
            realtime: false,
            stats_interval: 600,

            // Observer
            world_seed: None,
            observer_start_x: 0.0,
            observer_speed: 240.0,
            turn_after_secs: 0.0,
            forage_interval_secs: 5.0,

            // Streaming
            unload_on_exit: false,

            // World
            world: WorldConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match Self::from_toml_str(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{e}");
                Self::default()
            },
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> VerdantResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.target_fps = self.target_fps.clamp(1, 240);
        self.forage_interval_secs = self.forage_interval_secs.max(0.0);
        self.turn_after_secs = self.turn_after_secs.max(0.0);

        self.world.validate();
    }

    /// Rejects values no clamp can repair.
    pub fn check(&self) -> Result<(), ConfigError> {
        if !self.window_height.is_finite() || self.window_height <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "window_height",
                reason: format!("{} is not a positive height", self.window_height),
            });
        }
        if !self.observer_speed.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "observer_speed",
                reason: "must be finite".to_string(),
            });
        }
        if !self.observer_start_x.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "observer_start_x",
                reason: "must be finite".to_string(),
            });
        }
        Ok(())
    }
}
