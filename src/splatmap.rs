//! Texture splat weighting.
//!
//! Each splat layer claims cells whose height falls in a noise-jittered band
//! and whose slope falls in a fixed window. Claimed cells get weight 1 for
//! that layer; weights are then normalized so every claimed cell sums to 1.

use noise::Perlin;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::host::SlopeSource;
use crate::kernels::base_noise;
use crate::tilemap::Heightmap;

/// One texture layer and the terrain it covers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplatLayerSpec {
    /// Host texture reference
    pub texture_id: String,
    pub min_height: f32,
    pub max_height: f32,
    pub min_slope: f32,
    pub max_slope: f32,
    /// Texture tiling, passed through to the host
    pub tile_offset: [f32; 2],
    pub tile_size: [f32; 2],
    /// Fixed widening of the height band on both sides
    pub offset: f32,
    pub noise_x_scale: f32,
    pub noise_z_scale: f32,
    /// Amplitude of the noise added to `offset`
    pub noise_scaler: f32,
}

impl Default for SplatLayerSpec {
    fn default() -> Self {
        Self {
            texture_id: String::new(),
            min_height: 0.1,
            max_height: 0.2,
            min_slope: 0.0,
            max_slope: 1.5,
            tile_offset: [0.0, 0.0],
            tile_size: [50.0, 50.0],
            offset: 0.1,
            noise_x_scale: 0.01,
            noise_z_scale: 0.01,
            noise_scaler: 0.1,
        }
    }
}

impl SplatLayerSpec {
    /// Whether this layer claims a cell with the given height and slope.
    pub fn matches(&self, noise: &Perlin, x: usize, z: usize, height: f32, slope: f32) -> bool {
        let jitter = base_noise(
            noise,
            x as f64 * self.noise_x_scale as f64,
            z as f64 * self.noise_z_scale as f64,
        ) * self.noise_scaler;
        let offset = self.offset + jitter;
        let start = self.min_height - offset;
        let stop = self.max_height + offset;
        (start..=stop).contains(&height) && (self.min_slope..=self.max_slope).contains(&slope)
    }
}

/// Per-cell texture weights, `layers` values per cell, row-major by (x, z).
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaLayers {
    pub width: usize,
    pub height: usize,
    pub layers: usize,
    data: Vec<f32>,
}

impl AlphaLayers {
    pub fn new(width: usize, height: usize, layers: usize) -> Self {
        Self {
            width,
            height,
            layers,
            data: vec![0.0; width * height * layers],
        }
    }

    fn offset(&self, x: usize, z: usize) -> usize {
        debug_assert!(x < self.width && z < self.height, "({x}, {z}) out of grid");
        (z * self.width + x) * self.layers
    }

    pub fn get(&self, x: usize, z: usize, layer: usize) -> f32 {
        self.data[self.offset(x, z) + layer]
    }

    pub fn set(&mut self, x: usize, z: usize, layer: usize, value: f32) {
        let idx = self.offset(x, z) + layer;
        self.data[idx] = value;
    }

    /// All layer weights of one cell.
    pub fn weights(&self, x: usize, z: usize) -> &[f32] {
        let start = self.offset(x, z);
        &self.data[start..start + self.layers]
    }

    pub fn sum(&self, x: usize, z: usize) -> f32 {
        self.weights(x, z).iter().sum()
    }

    /// Index of the heaviest layer at a cell, `None` for an all-zero cell.
    pub fn dominant(&self, x: usize, z: usize) -> Option<usize> {
        self.weights(x, z)
            .iter()
            .enumerate()
            .filter(|(_, &w)| w > 0.0)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }
}

/// Weight every cell against every layer and normalize.
///
/// Slopes come from `slopes`; pass the heightmap itself to use its
/// forward-difference steepness. A cell no layer claims stays all zero and
/// is reported once as a warning.
pub fn splat_weights<S: SlopeSource + Sync + ?Sized>(
    heightmap: &Heightmap,
    layers: &[SplatLayerSpec],
    slopes: &S,
    noise: &Perlin,
) -> Result<AlphaLayers> {
    if layers.is_empty() {
        return Err(TerrainError::EmptyLayers("splat layer"));
    }

    let width = heightmap.width;
    let mut alpha = AlphaLayers::new(width, heightmap.height, layers.len());
    if width == 0 {
        return Ok(alpha);
    }

    let unclaimed: usize = alpha
        .data
        .par_chunks_mut(width * layers.len())
        .enumerate()
        .map(|(z, row)| {
            let mut unclaimed = 0;
            for (x, cell) in row.chunks_mut(layers.len()).enumerate() {
                let h = *heightmap.get(x, z);
                let slope = slopes.slope(x, z);
                for (weight, layer) in cell.iter_mut().zip(layers) {
                    if layer.matches(noise, x, z, h, slope) {
                        *weight = 1.0;
                    }
                }

                let total: f32 = cell.iter().sum();
                if total > 0.0 {
                    cell.iter_mut().for_each(|w| *w /= total);
                } else {
                    unclaimed += 1;
                }
            }
            unclaimed
        })
        .sum();

    if unclaimed > 0 {
        tracing::warn!(unclaimed, "cells matched no splat layer and keep zero weight");
    }
    tracing::debug!(layers = layers.len(), "computed splat weights");
    Ok(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::default_noise;

    fn ramp(size: usize) -> Heightmap {
        let mut map = Heightmap::new(size, size);
        for (x, _, h) in map.iter_mut() {
            *h = x as f32 / (size - 1) as f32;
        }
        map
    }

    fn band(min: f32, max: f32) -> SplatLayerSpec {
        SplatLayerSpec {
            min_height: min,
            max_height: max,
            offset: 0.0,
            noise_scaler: 0.0,
            max_slope: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let map = ramp(16);
        let layers = vec![band(0.0, 0.6), band(0.4, 1.0), band(0.0, 1.0)];
        let alpha = splat_weights(&map, &layers, &map, &default_noise()).unwrap();

        for z in 0..16 {
            for x in 0..16 {
                assert!((alpha.sum(x, z) - 1.0).abs() < 1e-6);
            }
        }
        // Overlap of all three bands splits evenly
        let mid = alpha.weights(7, 3);
        assert!(mid.iter().all(|&w| (w - 1.0 / 3.0).abs() < 1e-6));
        // Low cells only match the first and last layer
        assert_eq!(alpha.get(0, 0, 1), 0.0);
        assert!((alpha.get(0, 0, 0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unclaimed_cells_stay_zero() {
        let map = ramp(8);
        let layers = vec![band(0.9, 1.0)];
        let alpha = splat_weights(&map, &layers, &map, &default_noise()).unwrap();

        assert_eq!(alpha.sum(0, 0), 0.0);
        assert_eq!(alpha.dominant(0, 0), None);
        assert_eq!(alpha.get(7, 0, 0), 1.0);
        assert_eq!(alpha.dominant(7, 0), Some(0));
    }

    #[test]
    fn test_slope_window_uses_source() {
        let map = Heightmap::new_with(6, 6, 0.5);
        let steep = |_: usize, _: usize| 2.0f32;
        let layers = vec![
            SplatLayerSpec {
                max_slope: 1.0,
                ..band(0.0, 1.0)
            },
            SplatLayerSpec {
                min_slope: 1.5,
                ..band(0.0, 1.0)
            },
        ];
        let alpha = splat_weights(&map, &layers, &steep, &default_noise()).unwrap();
        assert_eq!(alpha.weights(2, 2), &[0.0, 1.0]);

        let alpha = splat_weights(&map, &layers, &map, &default_noise()).unwrap();
        assert_eq!(alpha.weights(2, 2), &[1.0, 0.0]);
    }

    #[test]
    fn test_offset_widens_band() {
        let map = Heightmap::new_with(4, 4, 0.35);
        let mut layer = band(0.1, 0.2);
        let narrow = splat_weights(&map, std::slice::from_ref(&layer), &map, &default_noise()).unwrap();
        assert_eq!(narrow.sum(1, 1), 0.0);

        layer.offset = 0.2;
        let wide = splat_weights(&map, std::slice::from_ref(&layer), &map, &default_noise()).unwrap();
        assert_eq!(wide.sum(1, 1), 1.0);
    }

    #[test]
    fn test_rejects_empty_layers() {
        let map = ramp(4);
        assert!(matches!(
            splat_weights(&map, &[], &map, &default_noise()),
            Err(TerrainError::EmptyLayers(_))
        ));
    }
}
