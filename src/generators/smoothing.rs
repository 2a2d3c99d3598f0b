//! Neighbourhood-mean smoothing.

use rayon::prelude::*;

use crate::tilemap::Heightmap;

/// Replace every cell with the mean of itself and its distinct Moore
/// neighbours, `passes` times.
///
/// Each pass reads only the previous pass's output, so the result does not
/// depend on visiting order.
pub fn smooth(heightmap: &mut Heightmap, passes: usize) {
    let width = heightmap.width;
    if width == 0 || heightmap.height == 0 {
        return;
    }

    for _ in 0..passes {
        let source = heightmap.clone();
        heightmap
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(z, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    let neighbours = source.distinct_neighbors_8(x, z);
                    // f64 keeps the mean of a flat neighbourhood exact
                    let sum = *source.get(x, z) as f64
                        + neighbours.iter().map(|&(nx, nz)| *source.get(nx, nz) as f64).sum::<f64>();
                    *cell = (sum / (neighbours.len() + 1) as f64) as f32;
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_grid_unchanged() {
        let mut map = Heightmap::new_with(7, 7, 0.25);
        smooth(&mut map, 5);
        assert!(map.iter().all(|(_, _, &h)| h == 0.25));
    }

    #[test]
    fn test_flat_grid_exact_at_any_level() {
        for level in [0.1f32, 0.3, 0.7, 0.02, 0.123, 0.9] {
            let mut map = Heightmap::new_with(7, 7, level);
            smooth(&mut map, 3);
            assert!(map.iter().all(|(_, _, &h)| h == level), "level {level} drifted");
        }
    }

    #[test]
    fn test_spike_spreads_symmetrically() {
        let mut map = Heightmap::new_with(5, 5, 0.0);
        map.set(2, 2, 9.0);
        smooth(&mut map, 1);

        assert!((map.get(2, 2) - 1.0).abs() < 1e-6);
        for (nx, nz) in map.distinct_neighbors_8(2, 2) {
            assert!((map.get(nx, nz) - 1.0).abs() < 1e-6);
        }
        assert_eq!(*map.get(0, 0), 0.0);
    }

    #[test]
    fn test_corner_uses_three_neighbours() {
        let mut map = Heightmap::new_with(4, 4, 0.0);
        map.set(0, 0, 4.0);
        smooth(&mut map, 1);
        assert!((map.get(0, 0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_passes_noop() {
        let mut map = Heightmap::new_with(3, 3, 0.0);
        map.set(1, 1, 1.0);
        let before = map.clone();
        smooth(&mut map, 0);
        assert_eq!(map, before);
    }
}
