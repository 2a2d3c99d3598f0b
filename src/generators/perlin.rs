//! Noise-based elevation: single and layered fractal Perlin, plus uniform
//! random jitter.

use noise::{NoiseFn, Perlin};
use rayon::prelude::*;

use crate::error::{Result, TerrainError};
use crate::generators::params::NoiseLayerParams;
use crate::kernels::fbm;
use crate::random::RandomSource;
use crate::tilemap::Heightmap;

/// Height contributed by one noise layer at cell (x, z).
pub fn layer_height<N: NoiseFn<f64, 2>>(noise: &N, layer: &NoiseLayerParams, x: usize, z: usize) -> f32 {
    let nx = (x as f64 + layer.offset_x as f64) * layer.x_scale as f64;
    let nz = (z as f64 + layer.offset_z as f64) * layer.z_scale as f64;
    fbm(noise, nx, nz, layer.octaves, layer.persistence as f64) * layer.height_scale
}

/// Add one layer of fractal noise to every cell, optionally zeroing the
/// grid first.
pub fn perlin(heightmap: &mut Heightmap, layer: &NoiseLayerParams, reset: bool, noise: &Perlin) {
    apply_layers(heightmap, std::slice::from_ref(layer), reset, noise);
}

/// Add the sum of several noise layers to every cell in a single write.
///
/// Rows are independent, so they are computed in parallel.
pub fn multi_perlin(
    heightmap: &mut Heightmap,
    layers: &[NoiseLayerParams],
    reset: bool,
    noise: &Perlin,
) -> Result<()> {
    if layers.is_empty() {
        return Err(TerrainError::EmptyLayers("noise layer"));
    }
    apply_layers(heightmap, layers, reset, noise);
    Ok(())
}

fn apply_layers(heightmap: &mut Heightmap, layers: &[NoiseLayerParams], reset: bool, noise: &Perlin) {
    if reset {
        heightmap.reset();
    }

    let width = heightmap.width;
    if width == 0 {
        return;
    }
    heightmap
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(z, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell += layers
                    .iter()
                    .map(|layer| layer_height(noise, layer, x, z))
                    .sum::<f32>();
            }
        });

    tracing::debug!(layers = layers.len(), reset, "applied perlin layers");
}

/// Add a uniform random value from `[min, max]` to every cell.
pub fn random_heights<R: RandomSource + ?Sized>(heightmap: &mut Heightmap, min: f32, max: f32, rng: &mut R) {
    for (_, _, h) in heightmap.iter_mut() {
        *h += rng.uniform(min, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::default_noise;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_perlin_adds_to_base() {
        let noise = default_noise();
        let layer = NoiseLayerParams::default();

        let mut flat = Heightmap::new_with(16, 16, 0.0);
        perlin(&mut flat, &layer, false, &noise);

        let mut raised = Heightmap::new_with(16, 16, 0.25);
        perlin(&mut raised, &layer, false, &noise);

        for (x, z, &h) in flat.iter() {
            assert!((raised.get(x, z) - (h + 0.25)).abs() < 1e-6);
            assert!((h - layer_height(&noise, &layer, x, z)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_perlin_reset() {
        let noise = default_noise();
        let layer = NoiseLayerParams::default();

        let mut a = Heightmap::new_with(8, 8, 3.0);
        perlin(&mut a, &layer, true, &noise);
        let mut b = Heightmap::new_with(8, 8, 0.0);
        perlin(&mut b, &layer, false, &noise);
        assert_eq!(a, b);
    }

    #[test]
    fn test_multi_perlin_sums_layers() {
        let noise = default_noise();
        let hills = NoiseLayerParams {
            x_scale: 0.05,
            z_scale: 0.05,
            octaves: 2,
            persistence: 0.5,
            height_scale: 0.3,
            ..Default::default()
        };
        let detail = NoiseLayerParams {
            x_scale: 0.2,
            z_scale: 0.3,
            offset_x: 500,
            offset_z: 120,
            ..Default::default()
        };

        let mut combined = Heightmap::new_with(12, 12, 0.0);
        multi_perlin(&mut combined, &[hills.clone(), detail.clone()], true, &noise).unwrap();

        let mut sequential = Heightmap::new_with(12, 12, 0.0);
        perlin(&mut sequential, &hills, false, &noise);
        perlin(&mut sequential, &detail, false, &noise);

        for (x, z, &h) in combined.iter() {
            assert!((h - sequential.get(x, z)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_multi_perlin_rejects_empty() {
        let mut map = Heightmap::new_with(4, 4, 0.0);
        let result = multi_perlin(&mut map, &[], false, &default_noise());
        assert!(matches!(result, Err(TerrainError::EmptyLayers(_))));
    }

    #[test]
    fn test_random_heights_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut map = Heightmap::new_with(10, 10, 0.5);
        random_heights(&mut map, 0.0, 0.1, &mut rng);
        for (_, _, &h) in map.iter() {
            assert!(h >= 0.5 && h <= 0.6 + 1e-6);
        }
    }
}
