//! Voronoi peaks: raise random cells and drape a falloff around each.

use rayon::prelude::*;

use crate::generators::params::{VoronoiMode, VoronoiParams};
use crate::random::RandomSource;
use crate::tilemap::Heightmap;

/// A peak placed by [`voronoi`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoronoiPeak {
    pub x: usize,
    pub z: usize,
    pub height: f32,
}

/// Height of the falloff surface at normalized distance `d` from a peak.
pub fn falloff_height(params: &VoronoiParams, peak_height: f32, d: f32) -> f32 {
    match params.mode {
        VoronoiMode::Linear => peak_height - d * params.falloff,
        VoronoiMode::Power => peak_height - d.powf(params.dropoff) * params.falloff,
        VoronoiMode::Combined => peak_height - d * params.falloff - d.powf(params.dropoff),
        VoronoiMode::SinPow => {
            peak_height
                - (d * 3.0).powf(params.falloff)
                - (d * 2.0 * std::f32::consts::PI).sin() / params.dropoff
        }
    }
}

/// Place `peak_count` peaks.
///
/// Each draw picks a cell and a target height. If the cell already stands at
/// or above the target the draw is spent without effect. Otherwise the cell
/// is set to the target and every other cell is raised to the falloff
/// surface wherever that surface is higher. Cells are never lowered.
///
/// Distance is Euclidean, divided by the grid diagonal. Returns the peaks
/// that were applied.
pub fn voronoi<R: RandomSource + ?Sized>(
    heightmap: &mut Heightmap,
    params: &VoronoiParams,
    rng: &mut R,
) -> Vec<VoronoiPeak> {
    let width = heightmap.width;
    let height = heightmap.height;
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let max_distance = ((width * width + height * height) as f32).sqrt();
    let mut applied = Vec::new();

    for _ in 0..params.peak_count {
        let x = rng.index(width);
        let peak_height = rng.uniform(params.min_height, params.max_height);
        let z = rng.index(height);

        if *heightmap.get(x, z) >= peak_height {
            continue;
        }
        heightmap.set(x, z, peak_height);

        heightmap
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(cz, row)| {
                for (cx, cell) in row.iter_mut().enumerate() {
                    if cx == x && cz == z {
                        continue;
                    }
                    let dx = cx as f32 - x as f32;
                    let dz = cz as f32 - z as f32;
                    let d = (dx * dx + dz * dz).sqrt() / max_distance;
                    let h = falloff_height(params, peak_height, d);
                    if *cell < h {
                        *cell = h;
                    }
                }
            });

        applied.push(VoronoiPeak { x, z, height: peak_height });
    }

    tracing::debug!(
        requested = params.peak_count,
        applied = applied.len(),
        mode = %params.mode,
        "placed voronoi peaks"
    );
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::perlin::perlin;
    use crate::generators::params::NoiseLayerParams;
    use crate::kernels::default_noise;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_single_linear_peak_on_flat_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut map = Heightmap::new_with(5, 5, 0.0);
        let params = VoronoiParams {
            peak_count: 1,
            falloff: 0.2,
            dropoff: 0.6,
            min_height: 0.5,
            max_height: 0.5,
            mode: VoronoiMode::Linear,
        };

        let peaks = voronoi(&mut map, &params, &mut rng);
        assert_eq!(peaks.len(), 1);
        let peak = peaks[0];

        let at_peak = map.iter().filter(|&(_, _, &h)| h == 0.5).count();
        assert_eq!(at_peak, 1);
        assert_eq!(*map.get(peak.x, peak.z), 0.5);

        // Diagonal of a 5x5 grid is sqrt(50)
        let diagonal = 50.0f32.sqrt();
        for (nx, nz) in map.distinct_neighbors_8(peak.x, peak.z) {
            let dx = nx as f32 - peak.x as f32;
            let dz = nz as f32 - peak.z as f32;
            let expected = 0.5 - (dx * dx + dz * dz).sqrt() / diagonal * 0.2;
            assert!((map.get(nx, nz) - expected).abs() < 1e-6);
        }

        // Orthogonal neighbours at 0.5 - 0.2/sqrt(50), diagonals at 0.46
        let orthogonal = 0.5 - 0.2 / diagonal;
        assert!((orthogonal - 0.471_715_7).abs() < 1e-6);
        assert!((0.5 - 2.0f32.sqrt() / diagonal * 0.2 - 0.46).abs() < 1e-6);
    }

    #[test]
    fn test_voronoi_never_lowers() {
        let noise = default_noise();
        for (i, mode) in VoronoiMode::all().iter().enumerate() {
            let mut rng = ChaCha8Rng::seed_from_u64(100 + i as u64);
            let mut map = Heightmap::new_with(33, 33, 0.0);
            let layer = NoiseLayerParams {
                height_scale: 0.6,
                ..Default::default()
            };
            perlin(&mut map, &layer, false, &noise);
            let before = map.clone();

            let params = VoronoiParams {
                peak_count: 6,
                mode: *mode,
                ..Default::default()
            };
            voronoi(&mut map, &params, &mut rng);

            for (x, z, &h) in map.iter() {
                assert!(h >= *before.get(x, z), "{} lowered ({}, {})", mode, x, z);
            }
        }
    }

    #[test]
    fn test_peak_below_existing_height_is_skipped() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut map = Heightmap::new_with(9, 9, 0.8);
        let params = VoronoiParams {
            peak_count: 4,
            min_height: 0.1,
            max_height: 0.5,
            ..Default::default()
        };
        let peaks = voronoi(&mut map, &params, &mut rng);
        assert!(peaks.is_empty());
        assert!(map.iter().all(|(_, _, &h)| h == 0.8));
    }

    #[test]
    fn test_falloff_modes() {
        let params = VoronoiParams {
            falloff: 2.0,
            dropoff: 0.5,
            ..Default::default()
        };
        let at = |mode| falloff_height(&VoronoiParams { mode, ..params.clone() }, 1.0, 0.25);
        assert!((at(VoronoiMode::Linear) - 0.5).abs() < 1e-6);
        assert!((at(VoronoiMode::Power) - 0.0).abs() < 1e-6);
        assert!((at(VoronoiMode::Combined) - 0.0).abs() < 1e-6);
        // (0.75)^2 = 0.5625, sin(pi/2) / 0.5 = 2
        assert!((at(VoronoiMode::SinPow) - (1.0 - 0.5625 - 2.0)).abs() < 1e-5);
    }
}
