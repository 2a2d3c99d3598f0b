//! Erosion simulation module
//!
//! Five single-shot erosion models over a [`Heightmap`]:
//! - **Rain**: random droplets each remove a fixed amount
//! - **Tidal**: cells straddling the water line are flattened onto it
//! - **Thermal**: material slides off slopes steeper than a threshold
//! - **River**: particles walk downhill and carve their remaining potential
//! - **Wind**: rotated dig/pile pairs that leave ripple patterns
//!
//! Every run is followed by the configured number of smoothing passes.

pub mod hydraulic;
pub mod params;
pub mod thermal;
pub mod utils;
pub mod wind;

pub use params::{ErosionModel, ErosionParams};
pub use utils::{height_delta, HeightDelta};

use noise::Perlin;

use crate::error::Result;
use crate::generators::smooth;
use crate::random::RandomSource;
use crate::tilemap::Heightmap;

/// Statistics from one erosion run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErosionStats {
    pub model: ErosionModel,
    /// Model-specific work count: droplets, particle steps, transfers,
    /// flattened pairs or dig/pile pairs
    pub steps_taken: u64,
    /// Height change made by the model itself, before smoothing
    pub delta: HeightDelta,
    /// Smoothing passes applied afterwards
    pub smooth_passes: usize,
}

/// Run `params.model` on the heightmap, then smooth it.
///
/// `water_height` is only read by the tidal model and `noise` only by the
/// wind model; both are always passed so every model shares one entry point.
pub fn erode<R: RandomSource + ?Sized>(
    heightmap: &mut Heightmap,
    params: &ErosionParams,
    water_height: f32,
    noise: &Perlin,
    rng: &mut R,
) -> Result<ErosionStats> {
    params.validate()?;

    let before = heightmap.clone();
    let steps_taken = match params.model {
        ErosionModel::Rain => hydraulic::rain(heightmap, params, rng),
        ErosionModel::Tidal => thermal::tidal(heightmap, water_height),
        ErosionModel::Thermal => thermal::thermal(heightmap, params),
        ErosionModel::River => hydraulic::river(heightmap, params, rng)?,
        ErosionModel::Wind => wind::wind(heightmap, params, noise),
    };
    let delta = height_delta(&before, heightmap);

    smooth(heightmap, params.smooth_amount);

    tracing::info!(
        model = %params.model,
        steps = steps_taken,
        eroded = delta.eroded,
        deposited = delta.deposited,
        cells = delta.cells_changed,
        "erosion complete"
    );

    Ok(ErosionStats {
        model: params.model,
        steps_taken,
        delta,
        smooth_passes: params.smooth_amount,
    })
}
