//! # Verdant Common
//!
//! Common types shared by the Verdant crates.
//!
//! This crate provides:
//! - Chunk coordinates and world-span math
//! - Entity identifiers and a per-world allocator
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
