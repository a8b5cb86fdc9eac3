//! # Verdant World
//!
//! World management for Verdant.
//!
//! This crate handles:
//! - Terrain generation from a seeded height field
//! - A bounded LRU cache of generated chunks
//! - Deterministic tree placement (trunks, leaves, fruit)
//! - The observer-driven streaming window and its object registry seam

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod block;
pub mod cache;
pub mod chunk;
pub mod config;
pub mod entity;
pub mod flora;
pub mod height;
pub mod registry;
pub mod seed;
pub mod streaming;
pub mod terrain;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::block::*;
    pub use crate::cache::*;
    pub use crate::chunk::*;
    pub use crate::config::*;
    pub use crate::entity::*;
    pub use crate::flora::*;
    pub use crate::height::*;
    pub use crate::registry::*;
    pub use crate::streaming::*;
    pub use crate::terrain::*;
}

pub use prelude::*;
