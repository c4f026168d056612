use log::debug;
use serde::Deserialize;

use semantirs_core::error::ModelError;
use semantirs_core::metrics::{Decibel, Metric};
use semantirs_core::model::{ModelSettings, StochasticModel};

use crate::dist::RngSampler;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FadingSettings {
    pub variant: String,
    pub floor_db: Decibel,
}

impl Default for FadingSettings {
    fn default() -> Self {
        Self {
            variant: "rayleigh".to_string(),
            floor_db: Decibel::new(-5.0),
        }
    }
}

impl ModelSettings for FadingSettings {
    fn validate(&self) -> Result<(), ModelError> {
        if !self.floor_db.as_f64().is_finite() {
            return Err(ModelError::config("fading.floor_db", "must be finite"));
        }
        match self.variant.to_lowercase().as_str() {
            "rayleigh" | "none" => Ok(()),
            _ => Err(ModelError::config(
                "fading.variant",
                format!("unsupported fading {}, use rayleigh or none", self.variant),
            )),
        }
    }
}

/// Small-scale fading applied on top of the path loss.
#[derive(Debug, Clone)]
pub enum FadingType {
    Rayleigh(RayleighFading),
    Disabled,
}

impl StochasticModel for FadingType {
    type Settings = FadingSettings;

    fn with_settings(settings: &Self::Settings, seed: u64) -> Result<Self, ModelError> {
        settings.validate()?;
        debug!("Building {} fading", settings.variant);
        match settings.variant.to_lowercase().as_str() {
            "none" => Ok(FadingType::Disabled),
            _ => Ok(FadingType::Rayleigh(RayleighFading::new(
                settings.floor_db,
                seed,
            )?)),
        }
    }
}

impl FadingType {
    pub fn sample(&mut self) -> Decibel {
        match self {
            FadingType::Rayleigh(fading) => fading.sample(),
            FadingType::Disabled => Decibel::ZERO,
        }
    }
}

/// Draws a complex circularly-symmetric Gaussian coefficient with unit average power and
/// reports its magnitude in dB, never below the configured floor.
#[derive(Debug, Clone)]
pub struct RayleighFading {
    floor: Decibel,
    gaussian: RngSampler,
}

impl RayleighFading {
    pub fn new(floor: Decibel, seed: u64) -> Result<Self, ModelError> {
        Ok(Self {
            floor,
            gaussian: RngSampler::normal(0.0, 1.0, seed)?,
        })
    }

    pub fn sample(&mut self) -> Decibel {
        let in_phase = self.gaussian.sample();
        let quadrature = self.gaussian.sample();
        let magnitude = ((in_phase * in_phase + quadrature * quadrature) / 2.0).sqrt();
        Decibel::new(20.0 * magnitude.log10()).max(self.floor)
    }
}
