//! Vegetation and detail placement.
//!
//! Both walk the grid on a fixed stride and test each sample against the
//! prototypes' height and slope windows. Vegetation produces individual
//! instances; details produce one density layer per prototype.

use noise::Perlin;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::host::SlopeSource;
use crate::kernels::{base_noise, map_range};
use crate::random::RandomSource;
use crate::tilemap::{Heightmap, Tilemap};

/// Maximum position jitter, in cells, applied to each tree.
pub const TREE_JITTER: i64 = 5;

/// A placed instance handed to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementRecord {
    pub prototype: usize,
    /// (x, height, z), with x and z normalized by the grid size
    pub position: [f32; 3],
    /// Degrees around the vertical axis
    pub rotation: f32,
    pub scale: f32,
    pub color: [f32; 4],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationSpec {
    pub prototype: usize,
    pub min_height: f32,
    pub max_height: f32,
    pub min_slope: f32,
    pub max_slope: f32,
    /// Chance in [0, 1] that a sample considers this prototype at all
    pub density: f32,
    pub min_rotation: f32,
    pub max_rotation: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub color_a: [f32; 4],
    pub color_b: [f32; 4],
}

impl Default for VegetationSpec {
    fn default() -> Self {
        Self {
            prototype: 0,
            min_height: 0.025,
            max_height: 0.07,
            min_slope: 0.0,
            max_slope: 0.02,
            density: 0.5,
            min_rotation: 0.0,
            max_rotation: 360.0,
            min_scale: 0.5,
            max_scale: 1.0,
            color_a: [1.0, 1.0, 1.0, 1.0],
            color_b: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationParams {
    pub max_trees: usize,
    /// Grid stride between samples
    pub tree_spacing: usize,
    pub specs: Vec<VegetationSpec>,
}

impl Default for VegetationParams {
    fn default() -> Self {
        Self {
            max_trees: 5000,
            tree_spacing: 5,
            specs: vec![VegetationSpec::default()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSpec {
    pub prototype: usize,
    pub min_height: f32,
    pub max_height: f32,
    pub min_slope: f32,
    pub max_slope: f32,
    /// Widening of the height band, scaled by the feather noise
    pub overlap: f32,
    /// Frequency of the noise that feathers the height band
    pub feather: f32,
    pub density: f32,
}

impl Default for DetailSpec {
    fn default() -> Self {
        Self {
            prototype: 0,
            min_height: 0.02,
            max_height: 0.05,
            min_slope: 0.0,
            max_slope: 0.02,
            overlap: 0.005,
            feather: 0.05,
            density: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailParams {
    /// Cap on the total number of detail cells set across all layers
    pub max_details: usize,
    pub detail_spacing: usize,
    pub specs: Vec<DetailSpec>,
}

impl Default for DetailParams {
    fn default() -> Self {
        Self {
            max_details: 5000,
            detail_spacing: 5,
            specs: vec![DetailSpec::default()],
        }
    }
}

fn ensure_stride(name: &'static str, stride: usize) -> Result<()> {
    if stride == 0 {
        return Err(TerrainError::invalid(name, "must be at least 1"));
    }
    Ok(())
}

fn lerp_color(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] * (1.0 - t) + b[0] * t,
        a[1] * (1.0 - t) + b[1] * t,
        a[2] * (1.0 - t) + b[2] * t,
        a[3] * (1.0 - t) + b[3] * t,
    ]
}

/// Scatter vegetation instances over the grid.
///
/// At every `tree_spacing`-th cell the prototypes are tried in order. A
/// failed density draw ends the prototype loop for that cell, so later
/// prototypes are only tried when earlier draws pass. Stops at `max_trees`.
pub fn plant_vegetation<S, R>(
    heightmap: &Heightmap,
    params: &VegetationParams,
    slopes: &S,
    rng: &mut R,
) -> Result<Vec<PlacementRecord>>
where
    S: SlopeSource + ?Sized,
    R: RandomSource + ?Sized,
{
    ensure_stride("tree_spacing", params.tree_spacing)?;
    if params.specs.is_empty() {
        return Err(TerrainError::EmptyLayers("vegetation prototype"));
    }

    let width = heightmap.width as f32;
    let depth = heightmap.height as f32;
    let mut records = Vec::new();

    'grid: for z in (0..heightmap.height).step_by(params.tree_spacing) {
        for x in (0..heightmap.width).step_by(params.tree_spacing) {
            for spec in &params.specs {
                if records.len() >= params.max_trees {
                    break 'grid;
                }
                if rng.uniform(0.0, 1.0) > spec.density {
                    break;
                }

                let h = *heightmap.get(x, z);
                let slope = slopes.slope(x, z);
                if !(spec.min_height..=spec.max_height).contains(&h)
                    || !(spec.min_slope..=spec.max_slope).contains(&slope)
                {
                    continue;
                }

                let jitter_x = rng.uniform_int(-TREE_JITTER, TREE_JITTER);
                let jitter_z = rng.uniform_int(-TREE_JITTER, TREE_JITTER);
                records.push(PlacementRecord {
                    prototype: spec.prototype,
                    position: [
                        (x as i64 + jitter_x) as f32 / width,
                        h,
                        (z as i64 + jitter_z) as f32 / depth,
                    ],
                    rotation: rng.uniform(spec.min_rotation, spec.max_rotation),
                    scale: rng.uniform(spec.min_scale, spec.max_scale),
                    color: lerp_color(spec.color_a, spec.color_b, rng.uniform(0.0, 1.0)),
                });
            }
        }
    }

    tracing::info!(trees = records.len(), "planted vegetation");
    Ok(records)
}

/// Build one detail layer per prototype, with 1 marking a detail patch.
///
/// Each prototype's height band is feathered by a noise factor `n` in
/// [0.5, 1]: the band is `[min*n - overlap*n, max*n + overlap*n]`.
pub fn detail_layers<S, R>(
    heightmap: &Heightmap,
    params: &DetailParams,
    slopes: &S,
    noise: &Perlin,
    rng: &mut R,
) -> Result<Vec<Tilemap<i32>>>
where
    S: SlopeSource + ?Sized,
    R: RandomSource + ?Sized,
{
    ensure_stride("detail_spacing", params.detail_spacing)?;

    let mut placed = 0usize;
    let mut layers = Vec::with_capacity(params.specs.len());

    for spec in &params.specs {
        let mut layer = Tilemap::new(heightmap.width, heightmap.height);
        'layer: for z in (0..heightmap.height).step_by(params.detail_spacing) {
            for x in (0..heightmap.width).step_by(params.detail_spacing) {
                if placed >= params.max_details {
                    break 'layer;
                }
                if rng.uniform(0.0, 1.0) > spec.density {
                    continue;
                }

                let n = map_range(
                    base_noise(noise, x as f64 * spec.feather as f64, z as f64 * spec.feather as f64),
                    0.0,
                    1.0,
                    0.5,
                    1.0,
                );
                let start = spec.min_height * n - spec.overlap * n;
                let stop = spec.max_height * n + spec.overlap * n;

                let h = *heightmap.get(x, z);
                let slope = slopes.slope(x, z);
                if (start..=stop).contains(&h) && (spec.min_slope..=spec.max_slope).contains(&slope) {
                    layer.set(x, z, 1);
                    placed += 1;
                }
            }
        }
        layers.push(layer);
    }

    tracing::info!(layers = layers.len(), details = placed, "placed detail layers");
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::default_noise;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn everywhere() -> VegetationSpec {
        VegetationSpec {
            min_height: 0.0,
            max_height: 1.0,
            max_slope: 10.0,
            density: 1.0,
            min_scale: 0.8,
            max_scale: 1.2,
            color_a: [0.0, 0.0, 0.0, 1.0],
            color_b: [1.0, 1.0, 1.0, 1.0],
            ..Default::default()
        }
    }

    #[test]
    fn test_vegetation_fills_every_sample() {
        let map = Heightmap::new_with(20, 20, 0.5);
        let params = VegetationParams {
            max_trees: 1000,
            tree_spacing: 5,
            specs: vec![everywhere()],
        };
        let trees = plant_vegetation(&map, &params, &map, &mut ChaCha8Rng::seed_from_u64(4)).unwrap();

        assert_eq!(trees.len(), 16);
        for tree in &trees {
            assert_eq!(tree.position[1], 0.5);
            assert!(tree.position[0] >= -0.25 && tree.position[0] <= 1.0);
            assert!((0.8..=1.2).contains(&tree.scale));
            assert!((0.0..=360.0).contains(&tree.rotation));
            assert_eq!(tree.color[3], 1.0);
        }
    }

    #[test]
    fn test_vegetation_respects_cap() {
        let map = Heightmap::new_with(40, 40, 0.5);
        let params = VegetationParams {
            max_trees: 7,
            tree_spacing: 2,
            specs: vec![everywhere(), everywhere()],
        };
        let trees = plant_vegetation(&map, &params, &map, &mut ChaCha8Rng::seed_from_u64(4)).unwrap();
        assert_eq!(trees.len(), 7);
    }

    #[test]
    fn test_vegetation_height_window() {
        let mut map = Heightmap::new_with(10, 10, 0.9);
        map.set(0, 0, 0.15);
        let params = VegetationParams {
            max_trees: 100,
            tree_spacing: 5,
            specs: vec![VegetationSpec {
                min_height: 0.1,
                max_height: 0.2,
                ..everywhere()
            }],
        };
        let trees = plant_vegetation(&map, &params, &map, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].position[1], 0.15);
    }

    #[test]
    fn test_failed_density_skips_later_prototypes() {
        let map = Heightmap::new_with(10, 10, 0.5);
        let params = VegetationParams {
            max_trees: 100,
            tree_spacing: 1,
            specs: vec![
                VegetationSpec {
                    prototype: 0,
                    density: -1.0,
                    ..everywhere()
                },
                VegetationSpec {
                    prototype: 1,
                    ..everywhere()
                },
            ],
        };
        let trees = plant_vegetation(&map, &params, &map, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert!(trees.is_empty());
    }

    #[test]
    fn test_zero_spacing_rejected() {
        let map = Heightmap::new(4, 4);
        let params = VegetationParams {
            tree_spacing: 0,
            ..Default::default()
        };
        assert!(plant_vegetation(&map, &params, &map, &mut ChaCha8Rng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn test_detail_layers() {
        let mut map = Heightmap::new_with(12, 12, 0.9);
        for x in 0..12 {
            map.set(x, 0, 0.1);
        }
        let params = DetailParams {
            max_details: 100,
            detail_spacing: 1,
            specs: vec![
                DetailSpec {
                    min_height: 0.0,
                    max_height: 0.2,
                    max_slope: 10.0,
                    density: 1.0,
                    ..Default::default()
                },
                DetailSpec {
                    density: -1.0,
                    ..Default::default()
                },
            ],
        };
        let layers = detail_layers(&map, &params, &map, &default_noise(), &mut ChaCha8Rng::seed_from_u64(2)).unwrap();

        assert_eq!(layers.len(), 2);
        // The feathered band tops out at (0.2 + 0.005) * n <= 0.205
        for x in 0..12 {
            assert_eq!(*layers[0].get(x, 0), 1);
            assert_eq!(*layers[0].get(x, 5), 0);
        }
        assert!(layers[1].iter().all(|(_, _, &v)| v == 0));
    }

    #[test]
    fn test_detail_cap() {
        let map = Heightmap::new_with(10, 10, 0.1);
        let params = DetailParams {
            max_details: 3,
            detail_spacing: 1,
            specs: vec![DetailSpec {
                min_height: 0.0,
                max_height: 1.0,
                max_slope: 10.0,
                density: 1.0,
                ..Default::default()
            }],
        };
        let layers = detail_layers(&map, &params, &map, &default_noise(), &mut ChaCha8Rng::seed_from_u64(2)).unwrap();
        let set: i32 = layers[0].iter().map(|(_, _, &v)| v).sum();
        assert_eq!(set, 3);
    }
}
