//! Heightmap terrain generation library
//!
//! Re-exports modules for use by binaries and host integrations.

pub mod config;
pub mod erosion;
pub mod error;
pub mod export;
pub mod generators;
pub mod host;
pub mod hull;
pub mod island;
pub mod kernels;
pub mod lakes;
pub mod pipeline;
pub mod placement;
pub mod random;
pub mod seeds;
pub mod splatmap;
pub mod tilemap;

pub use config::TerrainConfig;
pub use error::{Result, TerrainError};
pub use pipeline::{erode_terrain, generate, GeneratedTerrain};
pub use seeds::TerrainSeeds;
pub use tilemap::{Heightmap, Tilemap};
