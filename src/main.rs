use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use terrain_generator::erosion::ErosionModel;
use terrain_generator::export::{save_heightmap_png, save_shaded_png, save_splat_png};
use terrain_generator::{erode_terrain, generate, TerrainConfig, TerrainSeeds};

#[derive(Parser, Debug)]
#[command(name = "terrain_generator")]
#[command(about = "Generate island heightmaps with erosion and texture splat maps")]
struct Args {
    /// Grid size along both axes (overrides the config file)
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Master seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON config file (defaults are used if not specified)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output prefix for PNG previews
    #[arg(short, long, default_value = "terrain")]
    output: String,

    /// Erosion model to apply after generation (rain, tidal, thermal, river, wind)
    #[arg(long)]
    erode: Option<ErosionModel>,

    /// Smoothing passes after erosion (overrides the config file)
    #[arg(long)]
    smooth: Option<usize>,

    /// Write the effective config to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn with_suffix(prefix: &str, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}_{suffix}.png"))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TerrainConfig::load(path)?,
        None => TerrainConfig::default(),
    };
    if let Some(resolution) = args.resolution {
        config.resolution = resolution;
    }
    if let Some(model) = args.erode {
        config.erosion.model = model;
    }
    if let Some(passes) = args.smooth {
        config.erosion.smooth_amount = passes;
    }

    if let Some(path) = &args.write_config {
        config.validate()?;
        config.save(path)?;
        tracing::info!(path = %path.display(), "wrote config");
        return Ok(());
    }

    let seeds = TerrainSeeds::from_master(args.seed.unwrap_or_else(rand::random));
    tracing::info!(%seeds, "using seeds");

    let mut terrain = generate(&config, &seeds)?;

    if args.erode.is_some() {
        let stats = erode_terrain(&mut terrain, &config, &seeds)?;
        tracing::info!(
            model = %stats.model,
            steps = stats.steps_taken,
            eroded = stats.delta.eroded,
            deposited = stats.delta.deposited,
            "applied erosion"
        );
    }

    save_heightmap_png(&terrain.heightmap, &with_suffix(&args.output, "height"))?;
    save_shaded_png(&terrain.heightmap, config.water.height, &with_suffix(&args.output, "shaded"))?;
    save_splat_png(&terrain.alpha, &with_suffix(&args.output, "splat"))?;

    tracing::info!(
        output = %args.output,
        trees = terrain.trees.len(),
        water_features = terrain.water_features.len(),
        "done"
    );
    Ok(())
}
