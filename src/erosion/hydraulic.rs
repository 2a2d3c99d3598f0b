//! Water-driven erosion: rain pitting and downhill river particles.
//!
//! River particles carry an erosion potential. Each step a particle looks at
//! its neighbours in shuffled order (so no direction is favoured), moves to
//! the first lower one and hands it the potential minus `solubility`. A
//! particle with nowhere lower to go loses `solubility` in place. The walk
//! ends once the cell it stands on has no potential left; the accumulated
//! potential is carved out of the terrain at the end.

use crate::erosion::params::ErosionParams;
use crate::error::{Result, TerrainError};
use crate::kernels::shuffle;
use crate::random::RandomSource;
use crate::tilemap::{Heightmap, Tilemap};

/// Subtract `params.strength` from `params.droplets` random cells.
///
/// There is no floor: heavily hit cells can go negative. Returns the number
/// of droplets.
pub fn rain<R: RandomSource + ?Sized>(heightmap: &mut Heightmap, params: &ErosionParams, rng: &mut R) -> u64 {
    for _ in 0..params.droplets {
        let x = rng.index(heightmap.width);
        let z = rng.index(heightmap.height);
        *heightmap.get_mut(x, z) -= params.strength;
    }
    params.droplets as u64
}

/// Run river erosion. Returns the number of particle steps taken.
///
/// Every droplet seeds `params.strength` at a random start cell and
/// dispatches `params.springs_per_river` walks from there. Walks run as long
/// as they find potential, so one walk may take many more steps than
/// `springs_per_river`.
pub fn river<R: RandomSource + ?Sized>(
    heightmap: &mut Heightmap,
    params: &ErosionParams,
    rng: &mut R,
) -> Result<u64> {
    if !(params.solubility > 0.0 && params.solubility.is_finite()) {
        return Err(TerrainError::invalid(
            "solubility",
            format!("river walks never end without positive solubility, got {}", params.solubility),
        ));
    }

    let mut potential = Tilemap::new_with(heightmap.width, heightmap.height, 0.0f32);
    let mut steps = 0u64;

    for _ in 0..params.droplets {
        let start = (rng.index(heightmap.width), rng.index(heightmap.height));
        potential.set(start.0, start.1, params.strength);
        for _ in 0..params.springs_per_river {
            steps += run_river(heightmap, &mut potential, start, params.solubility, rng);
        }
    }

    for (x, z, &p) in potential.iter() {
        if p > 0.0 {
            *heightmap.get_mut(x, z) -= p;
        }
    }

    Ok(steps)
}

/// Walk one particle from `start` until its cell runs out of potential.
fn run_river<R: RandomSource + ?Sized>(
    heightmap: &Heightmap,
    potential: &mut Tilemap<f32>,
    start: (usize, usize),
    solubility: f32,
    rng: &mut R,
) -> u64 {
    let (mut x, mut z) = start;
    let mut steps = 0;

    while *potential.get(x, z) > 0.0 {
        let mut neighbours = heightmap.distinct_neighbors_8(x, z);
        shuffle(&mut neighbours, rng);

        let here = *heightmap.get(x, z);
        let current = *potential.get(x, z);
        match neighbours.into_iter().find(|&(nx, nz)| *heightmap.get(nx, nz) < here) {
            Some((nx, nz)) => {
                potential.set(nx, nz, current - solubility);
                x = nx;
                z = nz;
            }
            None => potential.set(x, z, current - solubility),
        }
        steps += 1;
    }

    steps
}
