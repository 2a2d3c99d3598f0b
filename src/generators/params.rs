//! Parameters for the elevation generators.

use serde::{Deserialize, Serialize};

/// One contributing layer of fractal noise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseLayerParams {
    /// Sample spacing along x (lower = broader features)
    pub x_scale: f32,
    /// Sample spacing along z
    pub z_scale: f32,
    pub octaves: u32,
    /// Amplitude multiplier per octave. Values above 1 emphasise fine detail.
    pub persistence: f32,
    /// Multiplier applied to the [0, 1] noise before it is added
    pub height_scale: f32,
    pub offset_x: i32,
    pub offset_z: i32,
}

impl Default for NoiseLayerParams {
    fn default() -> Self {
        Self {
            x_scale: 0.01,
            z_scale: 0.01,
            octaves: 3,
            persistence: 8.0,
            height_scale: 0.09,
            offset_x: 0,
            offset_z: 0,
        }
    }
}

/// How a Voronoi peak's height falls off with normalized distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VoronoiMode {
    /// `peak - falloff * d`
    #[default]
    Linear,
    /// `peak - falloff * d^dropoff`
    Power,
    /// `peak - falloff * d - d^dropoff`
    Combined,
    /// `peak - (3d)^falloff - sin(2 pi d) / dropoff`
    SinPow,
}

impl VoronoiMode {
    pub fn all() -> &'static [Self] {
        &[Self::Linear, Self::Power, Self::Combined, Self::SinPow]
    }
}

impl std::fmt::Display for VoronoiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Power => write!(f, "power"),
            Self::Combined => write!(f, "combined"),
            Self::SinPow => write!(f, "sinpow"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoronoiParams {
    pub peak_count: usize,
    pub falloff: f32,
    pub dropoff: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub mode: VoronoiMode,
}

impl Default for VoronoiParams {
    fn default() -> Self {
        Self {
            peak_count: 5,
            falloff: 0.2,
            dropoff: 0.6,
            min_height: 0.1,
            max_height: 0.5,
            mode: VoronoiMode::Linear,
        }
    }
}

/// Plasma fractal settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidpointParams {
    pub height_min: f32,
    pub height_max: f32,
    /// Base of the per-iteration dampening factor `dampener_power^(-roughness)`
    pub dampener_power: f32,
    pub roughness: f32,
}

impl Default for MidpointParams {
    fn default() -> Self {
        Self {
            height_min: -2.0,
            height_max: 2.0,
            dampener_power: 2.0,
            roughness: 2.0,
        }
    }
}

impl MidpointParams {
    pub fn dampener(&self) -> f32 {
        self.dampener_power.powf(-self.roughness)
    }
}
