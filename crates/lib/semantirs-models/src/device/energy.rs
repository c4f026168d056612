use serde::Deserialize;

use semantirs_core::error::ModelError;
use semantirs_core::metrics::{Decibel, Metric, MilliJoules, Milliseconds};
use semantirs_core::model::{Model, ModelSettings};

use crate::offload::mode::Capabilities;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnergySettings {
    pub compression_energy: MilliJoules,
    pub irs_control_energy: MilliJoules,
}

impl Default for EnergySettings {
    fn default() -> Self {
        Self {
            compression_energy: MilliJoules::new(40.0),
            irs_control_energy: MilliJoules::new(1.5),
        }
    }
}

impl ModelSettings for EnergySettings {
    fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in [
            ("energy.compression_energy", self.compression_energy),
            ("energy.irs_control_energy", self.irs_control_energy),
        ] {
            if value.as_f64().is_nan() || value < MilliJoules::ZERO {
                return Err(ModelError::config(name, "must be non-negative"));
            }
        }
        Ok(())
    }
}

/// Per-transmission energy of the vehicle: radio energy proportional to airtime plus fixed
/// costs for the stages that the offload mode switches on.
#[derive(Copy, Clone, Debug)]
pub struct EnergyModel {
    compression_energy: MilliJoules,
    irs_control_energy: MilliJoules,
}

impl Model for EnergyModel {
    type Settings = EnergySettings;

    fn with_settings(settings: &Self::Settings) -> Result<Self, ModelError> {
        settings.validate()?;
        Ok(Self {
            compression_energy: settings.compression_energy,
            irs_control_energy: settings.irs_control_energy,
        })
    }
}

impl EnergyModel {
    /// Airtime in seconds times the linear transmit power in milliwatts.
    pub fn transmission_energy(&self, tx_delay: Milliseconds, tx_power: Decibel) -> MilliJoules {
        MilliJoules::new(tx_delay.as_f64() / 1000.0 * tx_power.to_linear())
    }

    pub fn measure(
        &self,
        tx_delay: Milliseconds,
        tx_power: Decibel,
        capabilities: Capabilities,
    ) -> MilliJoules {
        let mut energy = self.transmission_energy(tx_delay, tx_power);
        if capabilities.compression {
            energy += self.compression_energy;
        }
        if capabilities.beamforming {
            energy += self.irs_control_energy;
        }
        energy
    }
}
