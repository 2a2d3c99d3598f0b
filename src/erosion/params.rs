//! Erosion model selection and parameters

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Which erosion model a run uses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErosionModel {
    /// Random droplets each strip a fixed amount
    #[default]
    Rain,
    /// Flatten cells straddling the water line
    Tidal,
    /// Talus slumping from steep cells to their lower neighbours
    Thermal,
    /// Downhill particles carving channels
    River,
    /// Dune-like dig and pile pairs along the wind direction
    Wind,
}

impl ErosionModel {
    pub fn all() -> &'static [Self] {
        &[Self::Rain, Self::Tidal, Self::Thermal, Self::River, Self::Wind]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Rain => "Pitting from random raindrops",
            Self::Tidal => "Shoreline flattening at the water line",
            Self::Thermal => "Slope collapse onto lower ground",
            Self::River => "Downhill particle channels",
            Self::Wind => "Wind-blown ripples",
        }
    }
}

impl std::fmt::Display for ErosionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rain => write!(f, "rain"),
            Self::Tidal => write!(f, "tidal"),
            Self::Thermal => write!(f, "thermal"),
            Self::River => write!(f, "river"),
            Self::Wind => write!(f, "wind"),
        }
    }
}

impl std::str::FromStr for ErosionModel {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| TerrainError::invalid("erosion model", format!("unknown model `{s}`")))
    }
}

/// Erosion parameters shared by all models. Each model reads the subset it
/// needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionParams {
    pub model: ErosionModel,

    /// Rain: height removed per droplet. River: starting potential.
    /// Thermal: minimum drop before material slides.
    /// Wind: amplitude of the ripple noise.
    pub strength: f32,

    /// Rain and river: number of droplets
    pub droplets: usize,

    /// River: potential lost per step
    pub solubility: f32,

    /// River: walks dispatched from each droplet's start cell.
    /// Not a step cap: a walk continues while it has potential.
    pub springs_per_river: usize,

    /// Thermal: fraction of the height difference moved per transfer
    pub thermal_strength: f32,

    /// Wind: direction in degrees
    pub wind_direction: f32,

    /// Smoothing passes applied after every model
    pub smooth_amount: usize,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            model: ErosionModel::Rain,
            strength: 0.1,
            droplets: 10,
            solubility: 0.01,
            springs_per_river: 5,
            thermal_strength: 0.1,
            wind_direction: 0.0,
            smooth_amount: 5,
        }
    }
}

impl ErosionParams {
    /// Reject settings a model cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.model == ErosionModel::River && !(self.solubility > 0.0 && self.solubility.is_finite()) {
            return Err(TerrainError::invalid(
                "solubility",
                format!("river erosion needs a positive solubility, got {}", self.solubility),
            ));
        }
        if !self.strength.is_finite() {
            return Err(TerrainError::invalid("strength", "must be finite"));
        }
        if !(0.0..=1.0).contains(&self.thermal_strength) {
            return Err(TerrainError::invalid(
                "thermal_strength",
                format!("must be within [0, 1], got {}", self.thermal_strength),
            ));
        }
        Ok(())
    }
}
