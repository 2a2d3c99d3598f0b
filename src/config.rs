//! Terrain configuration with sensible defaults and JSON persistence.
//!
//! Every section uses `#[serde(default)]`, so a config file only needs the
//! fields it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::erosion::ErosionParams;
use crate::error::{Result, TerrainError};
use crate::generators::{MidpointParams, NoiseLayerParams, VoronoiParams};
use crate::island::IslandParams;
use crate::placement::{DetailParams, VegetationParams};
use crate::splatmap::SplatLayerSpec;

/// Which generator lays down the base elevation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BaseGenerator {
    /// Sum of the configured noise layers
    #[default]
    Perlin,
    Voronoi,
    Midpoint,
    /// Uniform random heights in `random_height_range`
    Random,
}

/// Water level shared by tidal erosion and lake removal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterParams {
    pub height: f32,
    /// Number of water features (largest first) that survive lake removal
    pub lakes_to_keep: usize,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            height: 0.02,
            lakes_to_keep: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Grid size along both axes
    pub resolution: usize,
    pub generator: BaseGenerator,
    pub noise_layers: Vec<NoiseLayerParams>,
    pub voronoi: VoronoiParams,
    pub midpoint: MidpointParams,
    pub random_height_range: [f32; 2],
    /// Smoothing passes after the base generator
    pub smooth_amount: usize,
    pub islandize: bool,
    pub island: IslandParams,
    pub water: WaterParams,
    pub erosion: ErosionParams,
    pub splat_layers: Vec<SplatLayerSpec>,
    pub vegetation: VegetationParams,
    pub details: DetailParams,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            resolution: 257,
            generator: BaseGenerator::Perlin,
            noise_layers: vec![NoiseLayerParams::default()],
            voronoi: VoronoiParams::default(),
            midpoint: MidpointParams::default(),
            random_height_range: [0.0, 0.1],
            smooth_amount: 0,
            islandize: true,
            island: IslandParams::default(),
            water: WaterParams::default(),
            erosion: ErosionParams::default(),
            splat_layers: default_splat_layers(),
            vegetation: VegetationParams::default(),
            details: DetailParams::default(),
        }
    }
}

/// Sand below the water line, grass on the lowlands, rock on high or steep
/// ground.
fn default_splat_layers() -> Vec<SplatLayerSpec> {
    let jitter = |spec: SplatLayerSpec| SplatLayerSpec {
        offset: 0.002,
        noise_x_scale: 0.05,
        noise_z_scale: 0.05,
        noise_scaler: 0.004,
        ..spec
    };
    vec![
        jitter(SplatLayerSpec {
            texture_id: "sand".to_string(),
            min_height: -1.0,
            max_height: 0.025,
            ..Default::default()
        }),
        jitter(SplatLayerSpec {
            texture_id: "grass".to_string(),
            min_height: 0.025,
            max_height: 0.06,
            max_slope: 0.01,
            ..Default::default()
        }),
        jitter(SplatLayerSpec {
            texture_id: "rock".to_string(),
            min_height: 0.045,
            max_height: 1.0,
            ..Default::default()
        }),
    ]
}

impl TerrainConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: TerrainConfig = serde_json::from_str(&contents)?;
        tracing::info!(path = %path.display(), "loaded terrain config");
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check the invariants every pipeline stage relies on.
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 2 {
            return Err(TerrainError::invalid(
                "resolution",
                format!("must be at least 2, got {}", self.resolution),
            ));
        }
        if self.noise_layers.is_empty() {
            return Err(TerrainError::EmptyLayers("noise layer"));
        }
        if self.splat_layers.is_empty() {
            return Err(TerrainError::EmptyLayers("splat layer"));
        }
        if self.generator == BaseGenerator::Midpoint && !(self.resolution - 1).is_power_of_two() {
            return Err(TerrainError::invalid(
                "resolution",
                format!("midpoint displacement needs 2^n + 1 cells, got {}", self.resolution),
            ));
        }
        let [low, high] = self.random_height_range;
        if low > high {
            return Err(TerrainError::invalid(
                "random_height_range",
                format!("min {low} exceeds max {high}"),
            ));
        }
        if !self.water.height.is_finite() {
            return Err(TerrainError::invalid("water.height", "must be finite"));
        }
        if self.vegetation.tree_spacing == 0 {
            return Err(TerrainError::invalid("vegetation.tree_spacing", "must be at least 1"));
        }
        if self.details.detail_spacing == 0 {
            return Err(TerrainError::invalid("details.detail_spacing", "must be at least 1"));
        }
        self.erosion.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erosion::ErosionModel;

    #[test]
    fn test_default_config_is_valid() {
        let config = TerrainConfig::default();
        config.validate().unwrap();
        assert_eq!(config.splat_layers.len(), 3);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let config: TerrainConfig = serde_json::from_str(r#"{ "resolution": 65 }"#).unwrap();
        assert_eq!(config.resolution, 65);
        assert_eq!(config.water, WaterParams::default());
        assert_eq!(config.noise_layers.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("terrain.json");

        let mut config = TerrainConfig::default();
        config.resolution = 129;
        config.erosion.model = ErosionModel::Thermal;
        config.noise_layers.push(NoiseLayerParams {
            octaves: 6,
            ..Default::default()
        });

        config.save(&path).unwrap();
        let loaded = TerrainConfig::load(&path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_invalid_json_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(TerrainConfig::load(&path), Err(TerrainError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TerrainConfig::load(&dir.path().join("absent.json")),
            Err(TerrainError::Io(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let mut config = TerrainConfig::default();
        config.noise_layers.clear();
        assert!(matches!(config.validate(), Err(TerrainError::EmptyLayers(_))));

        let mut config = TerrainConfig::default();
        config.splat_layers.clear();
        assert!(config.validate().is_err());

        let config = TerrainConfig {
            generator: BaseGenerator::Midpoint,
            resolution: 100,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = TerrainConfig::default();
        config.erosion.model = ErosionModel::River;
        config.erosion.solubility = 0.0;
        assert!(config.validate().is_err());
    }
}
