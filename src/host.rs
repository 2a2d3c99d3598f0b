//! Boundary between the generator and whatever engine owns the terrain.
//!
//! Generators work on owned grids; a host commits results through these
//! traits. [`InMemoryTerrain`] implements all of them for standalone runs and
//! tests.

use crate::error::{Result, TerrainError};
use crate::placement::PlacementRecord;
use crate::splatmap::AlphaLayers;
use crate::tilemap::{Heightmap, Tilemap};

/// Elevation persistence.
pub trait HeightStore {
    /// Snapshot of the current elevation grid.
    fn load_heights(&self) -> Heightmap;

    /// Commit a grid. Rejects a grid of different dimensions.
    fn store_heights(&mut self, heights: &Heightmap) -> Result<()>;
}

/// Texture weight persistence.
pub trait AlphaStore {
    fn load_alpha_layers(&self) -> Option<AlphaLayers>;
    fn store_alpha_layers(&mut self, alpha: &AlphaLayers) -> Result<()>;
}

/// Gradient magnitude query used by splat weighting and placement.
///
/// A host can answer from its own mesh normals; a bare [`Heightmap`] answers
/// with its forward-difference [`steepness`](Tilemap::steepness).
pub trait SlopeSource {
    fn slope(&self, x: usize, z: usize) -> f32;
}

impl SlopeSource for Heightmap {
    fn slope(&self, x: usize, z: usize) -> f32 {
        self.steepness(x, z)
    }
}

/// Implements [`SlopeSource`] for any closure `Fn(usize, usize) -> f32`.
impl<F> SlopeSource for F
where
    F: Fn(usize, usize) -> f32,
{
    fn slope(&self, x: usize, z: usize) -> f32 {
        self(x, z)
    }
}

/// Receives vegetation instances and detail layers.
pub trait PlacementSink {
    fn place_instances(&mut self, records: Vec<PlacementRecord>) -> Result<()>;

    /// Detail density layers, one per detail prototype. Hosts without detail
    /// support ignore them.
    fn place_details(&mut self, _layers: Vec<Tilemap<i32>>) -> Result<()> {
        Ok(())
    }
}

/// A host that keeps everything in memory.
#[derive(Clone, Debug)]
pub struct InMemoryTerrain {
    heights: Heightmap,
    alpha: Option<AlphaLayers>,
    pub instances: Vec<PlacementRecord>,
    pub details: Vec<Tilemap<i32>>,
}

impl InMemoryTerrain {
    pub fn new(resolution: usize) -> Self {
        Self::from_heights(Heightmap::new(resolution, resolution))
    }

    pub fn from_heights(heights: Heightmap) -> Self {
        Self {
            heights,
            alpha: None,
            instances: Vec::new(),
            details: Vec::new(),
        }
    }

    pub fn heights(&self) -> &Heightmap {
        &self.heights
    }

    pub fn alpha(&self) -> Option<&AlphaLayers> {
        self.alpha.as_ref()
    }
}

impl HeightStore for InMemoryTerrain {
    fn load_heights(&self) -> Heightmap {
        self.heights.clone()
    }

    fn store_heights(&mut self, heights: &Heightmap) -> Result<()> {
        self.heights.ensure_same_dims(heights)?;
        self.heights.set_region(0, 0, heights)
    }
}

impl AlphaStore for InMemoryTerrain {
    fn load_alpha_layers(&self) -> Option<AlphaLayers> {
        self.alpha.clone()
    }

    fn store_alpha_layers(&mut self, alpha: &AlphaLayers) -> Result<()> {
        if (alpha.width, alpha.height) != self.heights.dims() {
            return Err(TerrainError::DimensionMismatch {
                expected: self.heights.dims(),
                actual: (alpha.width, alpha.height),
            });
        }
        self.alpha = Some(alpha.clone());
        Ok(())
    }
}

impl SlopeSource for InMemoryTerrain {
    fn slope(&self, x: usize, z: usize) -> f32 {
        self.heights.steepness(x, z)
    }
}

impl PlacementSink for InMemoryTerrain {
    fn place_instances(&mut self, records: Vec<PlacementRecord>) -> Result<()> {
        self.instances = records;
        Ok(())
    }

    fn place_details(&mut self, layers: Vec<Tilemap<i32>>) -> Result<()> {
        for layer in &layers {
            self.heights.ensure_same_dims(layer)?;
        }
        self.details = layers;
        Ok(())
    }
}
