//! Slope-driven erosion: thermal slumping and tidal flattening.

use crate::erosion::params::ErosionParams;
use crate::tilemap::Heightmap;

/// Full sweeps over the grid per thermal run.
pub const THERMAL_ITERATIONS: usize = 5;

/// Move material from cells that stand more than `params.strength` above a
/// neighbour onto that neighbour.
///
/// Each transfer moves `thermal_strength` times the height difference. The
/// sweep is in place and sequential (later cells see earlier transfers), so
/// the total height is conserved. Returns the number of transfers.
pub fn thermal(heightmap: &mut Heightmap, params: &ErosionParams) -> u64 {
    let mut transfers = 0u64;

    for _ in 0..THERMAL_ITERATIONS {
        for z in 0..heightmap.height {
            for x in 0..heightmap.width {
                for (nx, nz) in heightmap.distinct_neighbors_8(x, z) {
                    let h = *heightmap.get(x, z);
                    let nh = *heightmap.get(nx, nz);
                    if h > nh + params.strength {
                        let moved = (h - nh) * params.thermal_strength;
                        *heightmap.get_mut(x, z) -= moved;
                        *heightmap.get_mut(nx, nz) += moved;
                        transfers += 1;
                    }
                }
            }
        }
    }

    transfers
}

/// Flatten the shoreline: wherever an underwater cell borders a cell above
/// `water_height`, set both to exactly `water_height`.
///
/// Single in-place sweep. Returns the number of flattened pairs.
pub fn tidal(heightmap: &mut Heightmap, water_height: f32) -> u64 {
    let mut flattened = 0u64;

    for z in 0..heightmap.height {
        for x in 0..heightmap.width {
            for (nx, nz) in heightmap.distinct_neighbors_8(x, z) {
                if *heightmap.get(x, z) < water_height && *heightmap.get(nx, nz) > water_height {
                    heightmap.set(x, z, water_height);
                    heightmap.set(nx, nz, water_height);
                    flattened += 1;
                }
            }
        }
    }

    flattened
}
