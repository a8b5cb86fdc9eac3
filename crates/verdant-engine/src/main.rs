//! # Verdant Engine
//!
//! Headless entry point for Verdant, an endless side-scrolling world.
//!
//! Walks an observer across the world for a configured number of frames,
//! streaming terrain and flora around it and logging what the window does.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod timing;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{EngineConfig, CONFIG_FILE};

/// Main entry point.
///
/// Usage: `verdant [CONFIG]` (defaults to `verdant.toml`), or
/// `verdant --write-config [PATH]` to write the default configuration.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("verdant=info".parse()?))
        .init();

    info!("Verdant starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let first = args.next();

    if first.as_deref() == Some("--write-config") {
        let path = args.next().unwrap_or_else(|| CONFIG_FILE.to_string());
        EngineConfig::default()
            .save_to(&path)
            .with_context(|| format!("writing {path}"))?;
        return Ok(());
    }

    let path = first.unwrap_or_else(|| CONFIG_FILE.to_string());
    let mut config = EngineConfig::load_from(&path);
    config.validate();
    config.check()?;

    app::run(&config)?;

    info!("Verdant shutdown complete");
    Ok(())
}
