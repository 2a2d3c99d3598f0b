//! End-to-end terrain generation.
//!
//! `generate` runs base elevation, island shaping, lake removal, splat
//! weighting and placement in order. Erosion is a separate post-pass
//! ([`erode_terrain`]) that re-derives the splat weights afterwards.

use std::time::Instant;

use crate::config::{BaseGenerator, TerrainConfig};
use crate::erosion::{erode, ErosionStats};
use crate::error::Result;
use crate::generators::{midpoint_displacement, multi_perlin, random_heights, smooth, voronoi};
use crate::host::{AlphaStore, HeightStore, PlacementSink};
use crate::island::islandize;
use crate::lakes::{remove_inland_lakes, TerrainFeature};
use crate::placement::{detail_layers, plant_vegetation, PlacementRecord};
use crate::seeds::TerrainSeeds;
use crate::splatmap::{splat_weights, AlphaLayers};
use crate::tilemap::{Heightmap, Tilemap};

/// Everything one generation run produces.
#[derive(Clone, Debug)]
pub struct GeneratedTerrain {
    pub heightmap: Heightmap,
    pub alpha: AlphaLayers,
    /// Water features that survived lake removal, largest first
    pub water_features: Vec<TerrainFeature>,
    pub trees: Vec<PlacementRecord>,
    pub details: Vec<Tilemap<i32>>,
}

impl GeneratedTerrain {
    /// Hand the results to a host.
    pub fn commit<H>(&self, host: &mut H) -> Result<()>
    where
        H: HeightStore + AlphaStore + PlacementSink,
    {
        host.store_heights(&self.heightmap)?;
        host.store_alpha_layers(&self.alpha)?;
        host.place_instances(self.trees.clone())?;
        host.place_details(self.details.clone())?;
        Ok(())
    }
}

/// Lay down the configured base elevation on a fresh grid.
pub fn base_heightmap(config: &TerrainConfig, seeds: &TerrainSeeds) -> Result<Heightmap> {
    let mut heightmap = Heightmap::new(config.resolution, config.resolution);
    let mut rng = seeds.rng(seeds.heightmap);

    match config.generator {
        BaseGenerator::Perlin => multi_perlin(&mut heightmap, &config.noise_layers, true, &seeds.perlin())?,
        BaseGenerator::Voronoi => {
            let peaks = voronoi(&mut heightmap, &config.voronoi, &mut rng);
            tracing::debug!(peaks = peaks.len(), "placed voronoi peaks");
        }
        BaseGenerator::Midpoint => midpoint_displacement(&mut heightmap, &config.midpoint, &mut rng)?,
        BaseGenerator::Random => {
            let [low, high] = config.random_height_range;
            random_heights(&mut heightmap, low, high, &mut rng);
        }
    }

    smooth(&mut heightmap, config.smooth_amount);
    Ok(heightmap)
}

/// Run the full generation pipeline.
pub fn generate(config: &TerrainConfig, seeds: &TerrainSeeds) -> Result<GeneratedTerrain> {
    config.validate()?;
    let start = Instant::now();
    let noise = seeds.perlin();

    tracing::info!(
        resolution = config.resolution,
        generator = ?config.generator,
        seed = seeds.master,
        "generating terrain"
    );

    let mut heightmap = base_heightmap(config, seeds)?;

    if config.islandize {
        islandize(&mut heightmap, &config.island, &noise, &mut seeds.rng(seeds.island));
    }

    let water_features = remove_inland_lakes(&mut heightmap, config.water.height, config.water.lakes_to_keep);

    let alpha = splat_weights(&heightmap, &config.splat_layers, &heightmap, &noise)?;
    let trees = plant_vegetation(&heightmap, &config.vegetation, &heightmap, &mut seeds.rng(seeds.vegetation))?;
    let details = detail_layers(
        &heightmap,
        &config.details,
        &heightmap,
        &noise,
        &mut seeds.rng(seeds.details),
    )?;

    let (low, high) = heightmap.min_max();
    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        min = low,
        max = high,
        water_features = water_features.len(),
        trees = trees.len(),
        "terrain generated"
    );

    Ok(GeneratedTerrain {
        heightmap,
        alpha,
        water_features,
        trees,
        details,
    })
}

/// Erode a generated terrain with the configured model and refresh its
/// splat weights.
pub fn erode_terrain(
    terrain: &mut GeneratedTerrain,
    config: &TerrainConfig,
    seeds: &TerrainSeeds,
) -> Result<ErosionStats> {
    let noise = seeds.perlin();
    let stats = erode(
        &mut terrain.heightmap,
        &config.erosion,
        config.water.height,
        &noise,
        &mut seeds.rng(seeds.erosion),
    )?;
    terrain.alpha = splat_weights(&terrain.heightmap, &config.splat_layers, &terrain.heightmap, &noise)?;
    Ok(stats)
}
