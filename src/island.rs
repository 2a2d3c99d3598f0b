//! Island shaping: sink the rim of the map with a radial falloff so the
//! landmass sits in the middle, surrounded by sea.

use noise::Perlin;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::kernels::{falloff_curve, fbm};
use crate::random::RandomSource;
use crate::tilemap::Heightmap;

/// Steepness of the falloff transition.
pub const FALLOFF_A: f32 = 2.7;
/// Position of the falloff transition.
pub const FALLOFF_B: f32 = 3.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandParams {
    /// Frequency of the coastline noise (low = broad bays and headlands)
    pub noise_scale: f32,
    pub noise_octaves: u32,
    pub noise_persistence: f32,
    /// Amplitude of the coastline noise added to the falloff
    pub noise_strength: f32,
    /// Upper bound applied to every shaped cell
    pub height_cap: f32,
}

impl Default for IslandParams {
    fn default() -> Self {
        Self {
            noise_scale: 0.02,
            noise_octaves: 2,
            noise_persistence: 0.5,
            noise_strength: 0.4,
            height_cap: 0.1,
        }
    }
}

/// Distance of (x, z) from the grid centre, scaled so the middle of each
/// edge sits at 1 and clamped to [0, 1].
pub fn normalized_center_distance(width: usize, height: usize, x: usize, z: usize) -> f32 {
    let cx = (width as f32 - 1.0) * 0.5;
    let cz = (height as f32 - 1.0) * 0.5;
    let dx = if cx > 0.0 { (x as f32 - cx) / cx } else { 0.0 };
    let dz = if cz > 0.0 { (z as f32 - cz) / cz } else { 0.0 };
    (dx * dx + dz * dz).sqrt().min(1.0)
}

/// Subtract the island falloff from every cell.
///
/// The falloff is `x^a / (x^a + (b - b*x)^a)` of the normalized centre
/// distance plus a coastline noise term sampled at a random offset. The
/// shaped elevation is capped at `params.height_cap`. Must run after the
/// base noise and before erosion or splat weighting.
pub fn islandize<R: RandomSource + ?Sized>(
    heightmap: &mut Heightmap,
    params: &IslandParams,
    noise: &Perlin,
    rng: &mut R,
) {
    let width = heightmap.width;
    let height = heightmap.height;
    if width == 0 || height == 0 {
        return;
    }

    let offset_x = rng.uniform(0.0, 10_000.0) as f64;
    let offset_z = rng.uniform(0.0, 10_000.0) as f64;

    heightmap
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(z, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                let d = normalized_center_distance(width, height, x, z);
                let coast = fbm(
                    noise,
                    (x as f64 + offset_x) * params.noise_scale as f64,
                    (z as f64 + offset_z) * params.noise_scale as f64,
                    params.noise_octaves,
                    params.noise_persistence as f64,
                );
                let falloff = falloff_curve(d, FALLOFF_A, FALLOFF_B) + (coast - 0.5) * params.noise_strength;
                *cell = (*cell - falloff).min(params.height_cap);
            }
        });

    tracing::debug!(offset_x, offset_z, "islandized heightmap");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::default_noise;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_center_distance() {
        assert_eq!(normalized_center_distance(5, 5, 2, 2), 0.0);
        assert_eq!(normalized_center_distance(5, 5, 0, 2), 1.0);
        assert_eq!(normalized_center_distance(5, 5, 0, 0), 1.0);
        assert!((normalized_center_distance(5, 5, 1, 2) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rim_sinks_below_center() {
        let params = IslandParams {
            noise_strength: 0.0,
            height_cap: 1.0,
            ..Default::default()
        };
        let mut map = Heightmap::new_with(33, 33, 0.5);
        islandize(&mut map, &params, &default_noise(), &mut ChaCha8Rng::seed_from_u64(2));

        // Centre keeps its height, the edge midpoint loses a full unit
        assert!((map.get(16, 16) - 0.5).abs() < 1e-6);
        assert!((map.get(0, 16) - (-0.5)).abs() < 1e-6);
        assert!(map.get(8, 16) > map.get(2, 16));
    }

    #[test]
    fn test_height_cap_applies() {
        let params = IslandParams {
            noise_strength: 0.0,
            ..Default::default()
        };
        let mut map = Heightmap::new_with(17, 17, 0.8);
        islandize(&mut map, &params, &default_noise(), &mut ChaCha8Rng::seed_from_u64(2));
        assert!(map.iter().all(|(_, _, &h)| h <= 0.1));
        assert_eq!(*map.get(8, 8), 0.1);
    }
}
