//! Debug tool for comparing erosion models visually
//! Renders the same island once per model, hill-shaded, in a 3x2 grid

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use image::{ImageBuffer, Rgb, RgbImage};
use tracing_subscriber::EnvFilter;

use terrain_generator::erosion::{erode, ErosionModel, ErosionParams};
use terrain_generator::export::shaded_image;
use terrain_generator::{generate, Heightmap, TerrainConfig, TerrainSeeds};

#[derive(Parser, Debug)]
#[command(name = "debug_erosion")]
#[command(about = "Render every erosion model side by side")]
struct Args {
    #[arg(short, long, default_value = "42")]
    seed: u64,

    #[arg(short, long, default_value = "257")]
    resolution: usize,

    /// Multiplier on droplet counts, to make rain and river visible at preview scale
    #[arg(long, default_value = "200")]
    droplet_factor: usize,

    #[arg(short, long, default_value = "erosion_comparison.png")]
    output: PathBuf,
}

const COLS: u32 = 3;
const GAP: u32 = 4;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = TerrainConfig {
        resolution: args.resolution,
        ..Default::default()
    };
    let seeds = TerrainSeeds::from_master(args.seed);
    let base = generate(&config, &seeds)?.heightmap;
    let noise = seeds.perlin();

    // Cell 0 is the uneroded reference, then one cell per model
    let mut cells = vec![("none".to_string(), render(&base, config.water.height))];
    for &model in ErosionModel::all() {
        let mut heightmap = base.clone();
        let params = ErosionParams {
            model,
            droplets: config.erosion.droplets * args.droplet_factor,
            ..config.erosion.clone()
        };
        let stats = erode(
            &mut heightmap,
            &params,
            config.water.height,
            &noise,
            &mut seeds.rng(seeds.erosion),
        )?;
        tracing::info!(
            %model,
            description = model.description(),
            steps = stats.steps_taken,
            cells = stats.delta.cells_changed,
            "rendered variant"
        );
        cells.push((model.to_string(), render(&heightmap, config.water.height)));
    }

    let grid = compose(&cells);
    grid.save(&args.output)?;

    let order: Vec<&str> = cells.iter().map(|(name, _)| name.as_str()).collect();
    tracing::info!(path = %args.output.display(), layout = ?order, "saved comparison grid");
    Ok(())
}

/// Shaded colours darkened by a simple directional light from the upper left.
fn render(heightmap: &Heightmap, water_height: f32) -> RgbImage {
    let mut img = shaded_image(heightmap, water_height);
    let (min_h, max_h) = heightmap.min_max();
    // Exaggerate relief so a [0, 0.1] island reads as terrain
    let exaggeration = 40.0 / (max_h - min_h).max(f32::EPSILON);
    let light = normalize([-0.7, -0.7, 0.5]);

    for (x, z, pixel) in img.enumerate_pixels_mut() {
        let (x, z) = (x as usize, z as usize);
        let left = *heightmap.get(x.saturating_sub(1), z);
        let right = *heightmap.get((x + 1).min(heightmap.width - 1), z);
        let up = *heightmap.get(x, z.saturating_sub(1));
        let down = *heightmap.get(x, (z + 1).min(heightmap.height - 1));

        let normal = normalize([(left - right) * exaggeration, (up - down) * exaggeration, 1.0]);
        let diffuse = (normal[0] * light[0] + normal[1] * light[1] + normal[2] * light[2]).max(0.0);
        let lighting = (0.3 + 0.7 * diffuse).min(1.0);

        for channel in pixel.0.iter_mut() {
            *channel = (*channel as f32 * lighting) as u8;
        }
    }
    img
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

fn compose(cells: &[(String, RgbImage)]) -> RgbImage {
    let Some((_, first)) = cells.first() else {
        return ImageBuffer::new(1, 1);
    };
    let (cell_w, cell_h) = first.dimensions();
    let rows = (cells.len() as u32).div_ceil(COLS);

    let mut grid = ImageBuffer::from_pixel(
        COLS * (cell_w + GAP) - GAP,
        rows * (cell_h + GAP) - GAP,
        Rgb([40, 40, 40]),
    );
    for (idx, (_, img)) in cells.iter().enumerate() {
        let idx = idx as u32;
        let x0 = (idx % COLS) * (cell_w + GAP);
        let z0 = (idx / COLS) * (cell_h + GAP);
        for (x, z, pixel) in img.enumerate_pixels() {
            grid.put_pixel(x0 + x, z0 + z, *pixel);
        }
    }
    grid
}
