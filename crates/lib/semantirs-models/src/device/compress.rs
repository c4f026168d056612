use serde::Deserialize;

use semantirs_core::error::{ensure_positive, ensure_probability, ModelError};
use semantirs_core::metrics::{Kilobytes, Metric, Milliseconds};
use semantirs_core::model::{Model, ModelSettings};

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CompressorSettings {
    pub ratio: f64,
    pub quality: f64,
    pub processing_time: Milliseconds,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            ratio: 0.1,
            quality: 0.95,
            processing_time: Milliseconds::new(8.0),
        }
    }
}

impl ModelSettings for CompressorSettings {
    fn validate(&self) -> Result<(), ModelError> {
        ensure_positive("compressor.ratio", self.ratio)?;
        if self.ratio > 1.0 {
            return Err(ModelError::config(
                "compressor.ratio",
                format!("must not exceed 1, got {}", self.ratio),
            ));
        }
        ensure_probability("compressor.quality", self.quality)?;
        let delay = self.processing_time.as_f64();
        if delay.is_nan() || delay < 0.0 {
            return Err(ModelError::config(
                "compressor.processing_time",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compressed {
    pub size: Kilobytes,
    pub quality: f64,
    pub delay: Milliseconds,
}

/// On-board semantic encoder. Deterministic: the output depends only on the input size.
#[derive(Debug, Clone)]
pub struct Compressor {
    settings: CompressorSettings,
}

impl Model for Compressor {
    type Settings = CompressorSettings;

    fn with_settings(settings: &Self::Settings) -> Result<Self, ModelError> {
        settings.validate()?;
        Ok(Self {
            settings: settings.clone(),
        })
    }
}

impl Compressor {
    pub fn compress(&self, raw: Kilobytes) -> Compressed {
        Compressed {
            size: raw * self.settings.ratio,
            quality: self.settings.quality,
            delay: self.settings.processing_time,
        }
    }
}
