//! Midpoint displacement (plasma fractal).

use crate::error::{Result, TerrainError};
use crate::generators::params::MidpointParams;
use crate::random::RandomSource;
use crate::tilemap::Heightmap;

/// Run square/diamond midpoint displacement over a square `2^n + 1` grid.
///
/// Works in place: later midpoints read values written earlier in the same
/// pass, so the visiting order (x outer, z inner) is part of the result.
/// Edge midpoints whose outer diamond neighbour would leave the grid
/// (including anything touching the border) are left untouched.
pub fn midpoint_displacement<R: RandomSource + ?Sized>(
    heightmap: &mut Heightmap,
    params: &MidpointParams,
    rng: &mut R,
) -> Result<()> {
    heightmap.ensure_square()?;
    if heightmap.width < 2 || !(heightmap.width - 1).is_power_of_two() {
        return Err(TerrainError::invalid(
            "resolution",
            format!("midpoint displacement needs a 2^n + 1 grid, got {}", heightmap.width),
        ));
    }

    let width = heightmap.width as i64 - 1;
    let mut square_size = width;
    let mut height_min = params.height_min;
    let mut height_max = params.height_max;
    let dampener = params.dampener();
    let mut iterations = 0;

    let h = |map: &Heightmap, x: i64, z: i64| *map.get(x as usize, z as usize);

    while square_size > 0 {
        // Square step: centre of every square from its four corners
        let mut x = 0;
        while x < width {
            let mut z = 0;
            while z < width {
                let corner_x = x + square_size;
                let corner_z = z + square_size;
                let mid_x = x + square_size / 2;
                let mid_z = z + square_size / 2;

                let avg = (h(heightmap, x, z)
                    + h(heightmap, corner_x, z)
                    + h(heightmap, x, corner_z)
                    + h(heightmap, corner_x, corner_z))
                    / 4.0;
                heightmap.set(
                    mid_x as usize,
                    mid_z as usize,
                    avg + rng.uniform(height_min, height_max),
                );
                z += square_size;
            }
            x += square_size;
        }

        // Diamond step: the four edge midpoints of every square
        let mut x = 0;
        while x < width {
            let mut z = 0;
            while z < width {
                let corner_x = x + square_size;
                let corner_z = z + square_size;
                let mid_x = x + square_size / 2;
                let mid_z = z + square_size / 2;

                let right = mid_x + square_size;
                let up = mid_z + square_size;
                let left = mid_x - square_size;
                let down = mid_z - square_size;

                if left <= 0 || down <= 0 || right >= width - 1 || up >= width - 1 {
                    z += square_size;
                    continue;
                }

                let centre = h(heightmap, mid_x, mid_z);

                // bottom edge
                let v = (centre + h(heightmap, x, z) + h(heightmap, mid_x, down) + h(heightmap, corner_x, z))
                    / 4.0;
                heightmap.set(mid_x as usize, z as usize, v + rng.uniform(height_min, height_max));

                // top edge
                let v = (h(heightmap, x, corner_z)
                    + centre
                    + h(heightmap, corner_x, corner_z)
                    + h(heightmap, mid_x, up))
                    / 4.0;
                heightmap.set(mid_x as usize, corner_z as usize, v + rng.uniform(height_min, height_max));

                // left edge
                let v = (h(heightmap, x, z) + h(heightmap, left, mid_z) + h(heightmap, x, corner_z) + centre)
                    / 4.0;
                heightmap.set(x as usize, mid_z as usize, v + rng.uniform(height_min, height_max));

                // right edge
                let v = (h(heightmap, corner_x, z)
                    + h(heightmap, right, mid_z)
                    + h(heightmap, corner_x, corner_z)
                    + centre)
                    / 4.0;
                heightmap.set(corner_x as usize, mid_z as usize, v + rng.uniform(height_min, height_max));

                z += square_size;
            }
            x += square_size;
        }

        square_size /= 2;
        height_min *= dampener;
        height_max *= dampener;
        iterations += 1;
    }

    tracing::debug!(iterations, dampener, "midpoint displacement finished");
    Ok(())
}
