use log::debug;
use serde::Deserialize;

use semantirs_core::error::{ensure_positive, ModelError};
use semantirs_core::metrics::{Decibel, Mbps, Meters, Metric};
use semantirs_core::model::{ModelSettings, StochasticModel};

use crate::net::fading::{FadingSettings, FadingType};

/// Free-space path loss constant for distance in metres and frequency in GHz.
const PATH_LOSS_CONSTANT_DB: f64 = 32.4;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ChannelSettings {
    pub frequency_ghz: f64,
    pub noise_floor_dbm: Decibel,
    pub bandwidth_mhz: f64,
    pub min_data_rate: Mbps,
    #[serde(default)]
    pub fading: FadingSettings,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            frequency_ghz: 5.9,
            noise_floor_dbm: Decibel::new(-95.0),
            bandwidth_mhz: 20.0,
            min_data_rate: Mbps::new(1.0),
            fading: FadingSettings::default(),
        }
    }
}

impl ModelSettings for ChannelSettings {
    fn validate(&self) -> Result<(), ModelError> {
        ensure_positive("channel.frequency_ghz", self.frequency_ghz)?;
        ensure_positive("channel.bandwidth_mhz", self.bandwidth_mhz)?;
        ensure_positive("channel.min_data_rate", self.min_data_rate.as_f64())?;
        if !self.noise_floor_dbm.as_f64().is_finite() {
            return Err(ModelError::config("channel.noise_floor_dbm", "must be finite"));
        }
        self.fading.validate()
    }
}

/// Log-distance path loss with small-scale fading and an optional beamforming gain.
///
/// The channel holds no link state. The only thing that changes between calls is the
/// position of the fading stream.
#[derive(Debug, Clone)]
pub struct Channel {
    settings: ChannelSettings,
    fading: FadingType,
}

impl StochasticModel for Channel {
    type Settings = ChannelSettings;

    fn with_settings(settings: &Self::Settings, seed: u64) -> Result<Self, ModelError> {
        settings.validate()?;
        debug!(
            "Building channel at {} GHz over {} MHz",
            settings.frequency_ghz, settings.bandwidth_mhz
        );
        Ok(Self {
            settings: settings.clone(),
            fading: FadingType::with_settings(&settings.fading, seed)?,
        })
    }
}

impl Channel {
    pub fn path_loss(&self, distance: Meters) -> Result<Decibel, ModelError> {
        let d = distance.as_f64();
        if !(d.is_finite() && d > 0.0) {
            return Err(ModelError::computation(
                "path_loss",
                format!("distance must be positive, got {}", d),
            ));
        }
        Ok(Decibel::new(
            PATH_LOSS_CONSTANT_DB + 20.0 * d.log10() + 20.0 * self.settings.frequency_ghz.log10(),
        ))
    }

    pub fn fading_sample(&mut self) -> Decibel {
        self.fading.sample()
    }

    /// Draws one fading sample and returns the received SNR.
    pub fn compute_snr(
        &mut self,
        tx_power: Decibel,
        distance: Meters,
        beamforming_gain: Decibel,
    ) -> Result<Decibel, ModelError> {
        let path_loss = self.path_loss(distance)?;
        let fading = self.fading_sample();
        let snr = self.received_snr(tx_power, path_loss, fading, beamforming_gain);
        if !snr.as_f64().is_finite() {
            return Err(ModelError::computation(
                "compute_snr",
                format!("non-finite snr at distance {}", distance),
            ));
        }
        Ok(snr)
    }

    pub fn received_snr(
        &self,
        tx_power: Decibel,
        path_loss: Decibel,
        fading: Decibel,
        beamforming_gain: Decibel,
    ) -> Decibel {
        tx_power - path_loss + fading + beamforming_gain - self.settings.noise_floor_dbm
    }

    /// Shannon capacity over the configured bandwidth.
    pub fn compute_data_rate(&self, snr: Decibel) -> Mbps {
        self.data_rate_over(snr, self.settings.bandwidth_mhz)
    }

    pub fn data_rate_over(&self, snr: Decibel, bandwidth_mhz: f64) -> Mbps {
        let capacity = bandwidth_mhz * (1.0 + snr.to_linear()).log2();
        Mbps::new(capacity).max(self.settings.min_data_rate)
    }

    pub fn settings(&self) -> &ChannelSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_at(frequency_ghz: f64) -> Channel {
        let settings = ChannelSettings {
            frequency_ghz,
            ..Default::default()
        };
        Channel::with_settings(&settings, 1).unwrap()
    }

    #[test]
    fn test_path_loss_monotonic_in_distance() {
        let channel = channel_at(5.9);
        let mut last = channel.path_loss(Meters::new(1.0)).unwrap();
        for d in [2.0, 10.0, 55.5, 100.0, 249.9, 250.0] {
            let loss = channel.path_loss(Meters::new(d)).unwrap();
            assert!(loss > last);
            last = loss;
        }
    }

    #[test]
    fn test_path_loss_monotonic_in_frequency() {
        let distance = Meters::new(100.0);
        let low = channel_at(2.4).path_loss(distance).unwrap();
        let mid = channel_at(5.9).path_loss(distance).unwrap();
        let high = channel_at(28.0).path_loss(distance).unwrap();
        assert!(low < mid && mid < high);
    }

    #[test]
    fn test_path_loss_rejects_zero_distance() {
        let err = channel_at(5.9).path_loss(Meters::ZERO).unwrap_err();
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_data_rate_floor_and_monotonicity() {
        let channel = channel_at(5.9);
        assert_eq!(channel.compute_data_rate(Decibel::new(-60.0)), Mbps::new(1.0));
        let mut last = Mbps::ZERO;
        for snr in (-20..60).map(|s| Decibel::new(s as f64)) {
            let rate = channel.compute_data_rate(snr);
            assert!(rate >= Mbps::new(1.0));
            assert!(rate >= last);
            last = rate;
        }
    }

    #[test]
    fn test_invalid_settings() {
        let settings = ChannelSettings {
            bandwidth_mhz: 0.0,
            ..Default::default()
        };
        assert!(Channel::with_settings(&settings, 1).unwrap_err().is_configuration());
    }
}
