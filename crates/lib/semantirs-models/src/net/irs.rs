use log::debug;
use serde::Deserialize;

use semantirs_core::error::{ensure_positive, ModelError};
use semantirs_core::metrics::{Decibel, Metric};
use semantirs_core::model::{ModelSettings, StochasticModel};

use crate::dist::RngSampler;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct IrsSettings {
    pub element_count: u32,
    pub phase_bits: u8,
    pub efficiency: f64,
    pub estimation_error_db: Decibel,
    pub coherence_gain_db: Decibel,
    pub jitter_std_db: f64,
    pub min_gain_db: Decibel,
    pub max_gain_db: Decibel,
}

impl Default for IrsSettings {
    fn default() -> Self {
        Self {
            element_count: 50,
            phase_bits: 2,
            efficiency: 0.65,
            estimation_error_db: Decibel::new(3.0),
            coherence_gain_db: Decibel::new(6.0),
            jitter_std_db: 1.2,
            min_gain_db: Decibel::new(6.0),
            max_gain_db: Decibel::new(12.0),
        }
    }
}

impl ModelSettings for IrsSettings {
    fn validate(&self) -> Result<(), ModelError> {
        if self.element_count == 0 {
            return Err(ModelError::config("irs.element_count", "must be at least 1"));
        }
        if self.phase_bits == 0 {
            return Err(ModelError::config("irs.phase_bits", "must be at least 1"));
        }
        ensure_positive("irs.efficiency", self.efficiency)?;
        if self.efficiency > 1.0 {
            return Err(ModelError::config(
                "irs.efficiency",
                format!("must not exceed 1, got {}", self.efficiency),
            ));
        }
        if !(self.jitter_std_db.is_finite() && self.jitter_std_db >= 0.0) {
            return Err(ModelError::config(
                "irs.jitter_std_db",
                format!("must be non-negative, got {}", self.jitter_std_db),
            ));
        }
        if !(self.min_gain_db.as_f64().is_finite() && self.max_gain_db.as_f64().is_finite()) {
            return Err(ModelError::config("irs.min_gain_db", "gain bounds must be finite"));
        }
        if self.min_gain_db > self.max_gain_db {
            return Err(ModelError::config(
                "irs.min_gain_db",
                format!(
                    "gain interval [{}, {}] is empty",
                    self.min_gain_db, self.max_gain_db
                ),
            ));
        }
        Ok(())
    }
}

/// Passive reflecting surface in front of the roadside unit.
///
/// Every draw is clamped to `[min_gain_db, max_gain_db]`. When a decision serves several
/// vehicles, the reported gain is the mean of independent per-vehicle draws; nothing is
/// carried over from one decision to the next.
#[derive(Debug, Clone)]
pub struct Irs {
    settings: IrsSettings,
    nominal_gain: Decibel,
    jitter: RngSampler,
}

impl StochasticModel for Irs {
    type Settings = IrsSettings;

    fn with_settings(settings: &Self::Settings, seed: u64) -> Result<Self, ModelError> {
        settings.validate()?;
        let array_gain =
            Decibel::new(10.0 * (settings.element_count as f64 * settings.efficiency).log10());
        let nominal_gain = array_gain + settings.coherence_gain_db - settings.estimation_error_db;
        debug!(
            "Building IRS with {} elements, nominal gain {}",
            settings.element_count, nominal_gain
        );
        Ok(Self {
            settings: settings.clone(),
            nominal_gain,
            jitter: RngSampler::normal(0.0, settings.jitter_std_db, seed)?,
        })
    }
}

impl Irs {
    /// Gain before jitter and clamping.
    pub fn nominal_gain(&self) -> Decibel {
        self.nominal_gain
    }

    pub fn sample_gain(&mut self) -> Decibel {
        let jitter = Decibel::new(self.jitter.sample());
        (self.nominal_gain + jitter).clamp(self.settings.min_gain_db, self.settings.max_gain_db)
    }

    /// Mean of one independent draw per served vehicle. At least one draw is always taken,
    /// and the mean of clamped draws stays inside the gain interval.
    pub fn adaptive_gain(&mut self, served: usize) -> Decibel {
        let draws = served.max(1);
        let total: Decibel = (0..draws).map(|_| self.sample_gain()).sum();
        Decibel::new(total.as_f64() / draws as f64)
    }
}
