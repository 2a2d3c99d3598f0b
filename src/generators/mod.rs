//! Elevation generators.
//!
//! Each generator is a transform over an owned [`Heightmap`](crate::tilemap::Heightmap):
//! - **Perlin**: one or several layers of fractal noise added to the grid
//! - **Voronoi**: random peaks with a choice of falloff curves, max-combined
//! - **Midpoint displacement**: plasma fractal subdivision
//! - **Smoothing**: double-buffered neighbourhood mean

pub mod midpoint;
pub mod params;
pub mod perlin;
pub mod smoothing;
pub mod voronoi;

pub use midpoint::midpoint_displacement;
pub use params::{MidpointParams, NoiseLayerParams, VoronoiMode, VoronoiParams};
pub use perlin::{multi_perlin, perlin, random_heights};
pub use smoothing::smooth;
pub use voronoi::{voronoi, VoronoiPeak};
