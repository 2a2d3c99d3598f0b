//! Wind erosion: ripple-like dig/pile pairs laid out along the wind direction.
//!
//! A rotated raster covers the grid. Every tenth raster row digs a grain out
//! of one cell and piles it onto the cell a few rows downwind; a noise field
//! jitters the rows so the ripples are not perfectly straight.

use noise::Perlin;

use crate::erosion::params::ErosionParams;
use crate::kernels::base_noise;
use crate::tilemap::Heightmap;

/// Raster rows between ripples.
const ROW_STRIDE: usize = 10;
/// Downwind distance (in raster rows) between the dig and pile cells.
const PILE_OFFSET: i64 = 5;
/// Height moved by each dig/pile pair.
const GRAIN: f32 = 0.001;
const NOISE_FREQUENCY: f64 = 0.06;
const NOISE_AMPLITUDE: f32 = 20.0;

/// Apply wind erosion. Returns the number of dig/pile pairs applied.
///
/// Every pair removes and adds the same amount, so the total height is
/// conserved. Pairs with either end off the grid are skipped.
pub fn wind(heightmap: &mut Heightmap, params: &ErosionParams, noise: &Perlin) -> u64 {
    let size = heightmap.width.max(heightmap.height) as i64;
    if size == 0 {
        return 0;
    }
    let max_x = heightmap.width as f32 - 1.0;
    let max_z = heightmap.height as f32 - 1.0;

    let angle = params.wind_direction.to_radians();
    let sin = -angle.sin();
    let cos = angle.cos();
    let rotate = |x: f32, y: f32| (x * cos - y * sin, y * cos + x * sin);

    let mut pairs = 0u64;
    for y in (-(size - 1) * 2..=size * 2).step_by(ROW_STRIDE) {
        for x in -(size - 1) * 2..=size * 2 {
            let jitter = base_noise(noise, x as f64 * NOISE_FREQUENCY, y as f64 * NOISE_FREQUENCY)
                * NOISE_AMPLITUDE
                * params.strength;
            let dig = rotate(x as f32, (y + jitter as i64) as f32);
            let pile = rotate(x as f32, (y + PILE_OFFSET + jitter as i64) as f32);

            // Truncation toward zero matches the cell the pair lands on
            let (dig_x, dig_z) = (dig.0 as i64, dig.1 as i64);
            if dig_x < 0 || dig_x as f32 > max_x || dig_z < 0 || dig_z as f32 > max_z {
                continue;
            }
            if pile.0 < 0.0 || pile.0 > max_x || pile.1 < 0.0 || pile.1 > max_z {
                continue;
            }

            *heightmap.get_mut(dig_x as usize, dig_z as usize) -= GRAIN;
            *heightmap.get_mut(pile.0 as usize, pile.1 as usize) += GRAIN;
            pairs += 1;
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::default_noise;

    #[test]
    fn test_wind_conserves_height() {
        let mut map = Heightmap::new_with(32, 32, 0.5);
        let before = map.total();
        let params = ErosionParams {
            strength: 0.3,
            wind_direction: 35.0,
            ..Default::default()
        };
        let pairs = wind(&mut map, &params, &default_noise());

        assert!(pairs > 0);
        assert!((map.total() - before).abs() < 1e-3);
        assert!(map.iter().any(|(_, _, &h)| h != 0.5));
    }

    #[test]
    fn test_wind_along_z_piles_downwind() {
        // Direction 0 with no jitter: each pair digs at (x, y) and piles at (x, y + 5)
        let mut map = Heightmap::new_with(14, 14, 0.0);
        let params = ErosionParams {
            strength: 0.0,
            wind_direction: 0.0,
            ..Default::default()
        };
        let pairs = wind(&mut map, &params, &default_noise());

        // Raster rows run -26, -16, -6, 4, 14, 24; only row 4 lands both ends
        assert_eq!(pairs, 14);
        for x in 0..14 {
            assert!((*map.get(x, 4) + GRAIN).abs() < 1e-7);
            assert!((*map.get(x, 9) - GRAIN).abs() < 1e-7);
            assert_eq!(*map.get(x, 0), 0.0);
        }
    }

    #[test]
    fn test_wind_on_single_cell() {
        let mut map = Heightmap::new_with(1, 1, 0.2);
        let params = ErosionParams::default();
        // The pile end is always five rows away, off a 1x1 grid
        assert_eq!(wind(&mut map, &params, &default_noise()), 0);
        assert_eq!(*map.get(0, 0), 0.2);
    }
}
