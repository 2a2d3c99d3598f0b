//! PNG previews of generated terrain.

use std::path::Path;

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

use crate::error::Result;
use crate::splatmap::AlphaLayers;
use crate::tilemap::Heightmap;

/// Colours for splat layers in dominant-layer previews, cycled by index.
const LAYER_COLORS: [[u8; 3]; 6] = [
    [214, 196, 140],
    [86, 140, 60],
    [128, 120, 112],
    [240, 240, 245],
    [60, 90, 150],
    [150, 90, 50],
];
const UNCLAIMED_COLOR: [u8; 3] = [255, 0, 255];

/// Grayscale image of the heightmap, stretched so min is black and max white.
pub fn heightmap_image(heightmap: &Heightmap) -> GrayImage {
    let (min_h, max_h) = heightmap.min_max();
    let range = (max_h - min_h).max(f32::EPSILON);

    ImageBuffer::from_fn(heightmap.width as u32, heightmap.height as u32, |x, z| {
        let h = *heightmap.get(x as usize, z as usize);
        Luma([((h - min_h) / range * 255.0).round() as u8])
    })
}

/// Colour-ramped preview: blue below `water_height`, then green, brown and
/// white with altitude.
pub fn shaded_image(heightmap: &Heightmap, water_height: f32) -> RgbImage {
    let (min_h, max_h) = heightmap.min_max();
    let depth = (water_height - min_h).max(f32::EPSILON);
    let relief = (max_h - water_height).max(f32::EPSILON);

    ImageBuffer::from_fn(heightmap.width as u32, heightmap.height as u32, |x, z| {
        let h = *heightmap.get(x as usize, z as usize);

        if h < water_height {
            let depth_ratio = (h - min_h) / depth;
            Rgb([20, 50, (100.0 + 155.0 * depth_ratio) as u8])
        } else {
            let elev = (h - water_height) / relief;
            if elev < 0.3 {
                Rgb([(50.0 + 100.0 * elev) as u8, (120.0 + 80.0 * elev) as u8, 50])
            } else if elev < 0.7 {
                let t = (elev - 0.3) / 0.4;
                Rgb([
                    (80.0 + 80.0 * t) as u8,
                    (150.0 - 50.0 * t) as u8,
                    (50.0 + 30.0 * t) as u8,
                ])
            } else {
                let t = (elev - 0.7) / 0.3;
                Rgb([
                    (160.0 + 95.0 * t) as u8,
                    (100.0 + 155.0 * t) as u8,
                    (80.0 + 175.0 * t) as u8,
                ])
            }
        }
    })
}

/// Each pixel coloured by its heaviest splat layer; magenta where no layer
/// claimed the cell.
pub fn splat_image(alpha: &AlphaLayers) -> RgbImage {
    ImageBuffer::from_fn(alpha.width as u32, alpha.height as u32, |x, z| {
        let color = alpha
            .dominant(x as usize, z as usize)
            .map_or(UNCLAIMED_COLOR, |layer| LAYER_COLORS[layer % LAYER_COLORS.len()]);
        Rgb(color)
    })
}

pub fn save_heightmap_png(heightmap: &Heightmap, path: &Path) -> Result<()> {
    heightmap_image(heightmap).save(path)?;
    tracing::info!(path = %path.display(), "wrote heightmap preview");
    Ok(())
}

pub fn save_shaded_png(heightmap: &Heightmap, water_height: f32, path: &Path) -> Result<()> {
    shaded_image(heightmap, water_height).save(path)?;
    tracing::info!(path = %path.display(), "wrote shaded preview");
    Ok(())
}

pub fn save_splat_png(alpha: &AlphaLayers, path: &Path) -> Result<()> {
    splat_image(alpha).save(path)?;
    tracing::info!(path = %path.display(), "wrote splat preview");
    Ok(())
}
