use log::trace;
use serde::Deserialize;

use semantirs_core::error::{ensure_positive, ensure_probability, ModelError};
use semantirs_core::metrics::{Kilobytes, Mbps, Metric, Milliseconds};
use semantirs_core::model::{ModelSettings, StochasticModel};

use crate::dist::RngSampler;

/// Airtime of a payload at the given rate.
pub fn airtime(payload: Kilobytes, data_rate: Mbps) -> Milliseconds {
    Milliseconds::new(payload.as_bits() / (data_rate.as_f64() * 1000.0))
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MacSettings {
    pub contention_window: u32,
    pub slot_time: Milliseconds,
    pub difs: Milliseconds,
    pub collision_damping: f64,
    pub collision_penalty: f64,
}

impl Default for MacSettings {
    fn default() -> Self {
        Self {
            contention_window: 7,
            slot_time: Milliseconds::new(0.013),
            difs: Milliseconds::new(0.058),
            collision_damping: 0.3,
            collision_penalty: 1.5,
        }
    }
}

impl ModelSettings for MacSettings {
    fn validate(&self) -> Result<(), ModelError> {
        if self.contention_window == 0 {
            return Err(ModelError::config("mac.contention_window", "must be at least 1"));
        }
        let slot = self.slot_time.as_f64();
        if slot.is_nan() || slot < 0.0 {
            return Err(ModelError::config("mac.slot_time", "must be non-negative"));
        }
        ensure_positive("mac.difs", self.difs.as_f64())?;
        ensure_probability("mac.collision_damping", self.collision_damping)?;
        if !(self.collision_penalty.is_finite() && self.collision_penalty >= 1.0) {
            return Err(ModelError::config(
                "mac.collision_penalty",
                format!("must be at least 1, got {}", self.collision_penalty),
            ));
        }
        Ok(())
    }
}

/// Channel-access delay of a CSMA/CA style MAC under light contention.
///
/// Retransmissions are not modelled. With probability `collision_probability * damping` the
/// whole access delay is stretched by `collision_penalty`.
#[derive(Debug, Clone)]
pub struct Mac {
    settings: MacSettings,
    sampler: RngSampler,
}

impl StochasticModel for Mac {
    type Settings = MacSettings;

    fn with_settings(settings: &Self::Settings, seed: u64) -> Result<Self, ModelError> {
        settings.validate()?;
        Ok(Self {
            settings: settings.clone(),
            sampler: RngSampler::unit_uniform(seed),
        })
    }
}

impl Mac {
    pub fn collision_probability(&self, contending: u32) -> f64 {
        let window = self.settings.contention_window as f64;
        let exponent = i32::try_from(contending).unwrap_or(i32::MAX);
        1.0 - (1.0 - 1.0 / window).powi(exponent)
    }

    /// Draws a backoff slot count and a collision outcome, in that order.
    pub fn access_delay(
        &mut self,
        payload: Kilobytes,
        data_rate: Mbps,
        contending: u32,
    ) -> Milliseconds {
        let slots = self.sampler.below(self.settings.contention_window as usize);
        let backoff = self.settings.slot_time * slots as f64;
        let delay = self.settings.difs + backoff + airtime(payload, data_rate);

        let penalised = self
            .sampler
            .chance(self.collision_probability(contending) * self.settings.collision_damping);
        trace!("backoff slots {}, collision {}", slots, penalised);
        match penalised {
            true => delay * self.settings.collision_penalty,
            false => delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_mac() -> Mac {
        Mac::with_settings(&MacSettings::default(), 9).unwrap()
    }

    #[test]
    fn test_airtime() {
        let time = airtime(Kilobytes::new(100.0), Mbps::new(8.192));
        assert!((time.as_f64() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_collision_probability() {
        let mac = reference_mac();
        assert_eq!(mac.collision_probability(0), 0.0);
        let expected = 1.0 - (6.0f64 / 7.0).powi(3);
        assert!((mac.collision_probability(3) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_delay_bounds() {
        let mut mac = reference_mac();
        let payload = Kilobytes::new(100.0);
        let rate = Mbps::new(200.0);
        let base = airtime(payload, rate) + Milliseconds::new(0.058);
        let ceiling = (base + Milliseconds::new(0.013 * 6.0)) * 1.5;
        for _ in 0..2_000 {
            let delay = mac.access_delay(payload, rate, 3);
            assert!(delay.as_f64() >= base.as_f64() - 1e-9);
            assert!(delay.as_f64() <= ceiling.as_f64() + 1e-9);
        }
    }

    fn penalised_share(damping: f64, contending: u32, draws: usize) -> f64 {
        let settings = MacSettings {
            collision_damping: damping,
            ..Default::default()
        };
        let mut mac = Mac::with_settings(&settings, 21).unwrap();
        let payload = Kilobytes::new(100.0);
        let rate = Mbps::new(200.0);
        // Longest delay an access can take without the collision stretch.
        let unpenalised = airtime(payload, rate) + Milliseconds::new(0.058 + 0.013 * 6.0);
        let hits = (0..draws)
            .filter(|_| mac.access_delay(payload, rate, contending) > unpenalised)
            .count();
        hits as f64 / draws as f64
    }

    #[test]
    fn test_collision_penalty_follows_damped_probability() {
        assert_eq!(penalised_share(0.0, 1_000, 2_000), 0.0);
        assert!(penalised_share(1.0, 1_000, 2_000) > 0.99);

        let expected = 0.3 * (1.0 - (6.0f64 / 7.0).powi(3));
        let share = penalised_share(0.3, 3, 20_000);
        assert!((share - expected).abs() < 0.015, "penalised share {}", share);
    }

    #[test]
    fn test_positive_without_contenders() {
        let mut mac = reference_mac();
        for _ in 0..500 {
            let delay = mac.access_delay(Kilobytes::new(0.001), Mbps::new(1000.0), 0);
            assert!(delay > Milliseconds::ZERO);
        }
    }
}
