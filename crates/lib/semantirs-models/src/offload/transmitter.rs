use log::{debug, trace};
use serde::Deserialize;
use typed_builder::TypedBuilder;

use semantirs_core::error::{ensure_positive, ensure_probability, ModelError};
use semantirs_core::metrics::{Decibel, Feasibility, Meters, Metric, Milliseconds};
use semantirs_core::model::{Model, ModelSettings, StochasticModel};

use crate::device::compress::{Compressor, CompressorSettings};
use crate::device::energy::{EnergyModel, EnergySettings};
use crate::device::node::{Rsu, Vehicle};
use crate::dist::{RngSampler, StreamId};
use crate::net::access::AccessPoints;
use crate::net::channel::{Channel, ChannelSettings};
use crate::net::irs::{Irs, IrsSettings};
use crate::net::mac::{airtime, Mac, MacSettings};
use crate::offload::mode::OffloadMode;
use crate::offload::sample::TransmissionSample;

const SPEED_OF_LIGHT: f64 = 3.0e8;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TransmissionSettings {
    pub tx_power_dbm: Decibel,
    pub min_distance: Meters,
    pub max_distance: Meters,
    pub contending_nodes: u32,
    pub served_vehicles: usize,
    pub processing_delay: Milliseconds,
    pub handover_probability: f64,
    pub handover_penalty: Milliseconds,
    pub snr_threshold_db: Decibel,
}

impl Default for TransmissionSettings {
    fn default() -> Self {
        Self {
            tx_power_dbm: Decibel::new(23.0),
            min_distance: Meters::new(1.0),
            max_distance: Meters::new(250.0),
            contending_nodes: 3,
            served_vehicles: 1,
            processing_delay: Milliseconds::new(3.0),
            handover_probability: 0.05,
            handover_penalty: Milliseconds::new(50.0),
            snr_threshold_db: Decibel::new(3.0),
        }
    }
}

impl ModelSettings for TransmissionSettings {
    fn validate(&self) -> Result<(), ModelError> {
        if !self.tx_power_dbm.as_f64().is_finite() {
            return Err(ModelError::config("transmission.tx_power_dbm", "must be finite"));
        }
        ensure_positive("transmission.min_distance", self.min_distance.as_f64())?;
        ensure_positive("transmission.max_distance", self.max_distance.as_f64())?;
        if self.min_distance > self.max_distance {
            return Err(ModelError::config(
                "transmission.min_distance",
                "must not exceed max_distance",
            ));
        }
        if self.served_vehicles == 0 {
            return Err(ModelError::config(
                "transmission.served_vehicles",
                "must be at least 1",
            ));
        }
        ensure_probability(
            "transmission.handover_probability",
            self.handover_probability,
        )?;
        for (name, delay) in [
            ("transmission.processing_delay", self.processing_delay),
            ("transmission.handover_penalty", self.handover_penalty),
        ] {
            if delay.as_f64().is_nan() || delay < Milliseconds::ZERO {
                return Err(ModelError::config(name, "must be non-negative"));
            }
        }
        if !self.snr_threshold_db.as_f64().is_finite() {
            return Err(ModelError::config("transmission.snr_threshold_db", "must be finite"));
        }
        Ok(())
    }
}

/// Settings of every model taking part in a transmission.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct OffloadSettings {
    #[serde(default)]
    pub channel: ChannelSettings,
    #[serde(default)]
    pub irs: IrsSettings,
    #[serde(default)]
    pub compressor: CompressorSettings,
    #[serde(default)]
    pub mac: MacSettings,
    #[serde(default)]
    pub energy: EnergySettings,
    #[serde(default)]
    pub transmission: TransmissionSettings,
}

impl ModelSettings for OffloadSettings {
    fn validate(&self) -> Result<(), ModelError> {
        self.channel.validate()?;
        self.irs.validate()?;
        self.compressor.validate()?;
        self.mac.validate()?;
        self.energy.validate()?;
        self.transmission.validate()
    }
}

/// Composes the compression, channel, beamforming and MAC models into one synthetic
/// transmission record per call.
///
/// Stages run in a fixed order, and each stochastic model draws from its own stream:
/// beamforming jitter, then fading, then backoff and collision, then handover.
#[derive(TypedBuilder)]
pub struct Transmitter {
    settings: TransmissionSettings,
    access: AccessPoints,
    channel: Channel,
    irs: Irs,
    compressor: Compressor,
    mac: Mac,
    energy: EnergyModel,
    handover: RngSampler,
}

impl Transmitter {
    /// Builds every model from the settings, deriving one random stream per model from
    /// `seed`.
    pub fn with_settings(
        settings: &OffloadSettings,
        access: AccessPoints,
        seed: u64,
    ) -> Result<Self, ModelError> {
        settings.validate()?;
        debug!("Building transmitter over {} access points", access.len());
        Ok(Self::builder()
            .settings(settings.transmission.clone())
            .access(access)
            .channel(Channel::with_settings(
                &settings.channel,
                StreamId::Fading.seed_from(seed),
            )?)
            .irs(Irs::with_settings(
                &settings.irs,
                StreamId::Beamforming.seed_from(seed),
            )?)
            .compressor(Compressor::with_settings(&settings.compressor)?)
            .mac(Mac::with_settings(
                &settings.mac,
                StreamId::Access.seed_from(seed),
            )?)
            .energy(EnergyModel::with_settings(&settings.energy)?)
            .handover(RngSampler::unit_uniform(StreamId::Handover.seed_from(seed)))
            .build())
    }

    pub fn sample(
        &mut self,
        vehicle: &Vehicle,
        target: &Rsu,
        mode: OffloadMode,
    ) -> Result<TransmissionSample, ModelError> {
        let capabilities = mode.capabilities();
        let tx_power = self.settings.tx_power_dbm;

        let (payload, compression_time) = match capabilities.compression {
            true => {
                let compressed = self.compressor.compress(vehicle.payload);
                (compressed.size, compressed.delay)
            }
            false => (vehicle.payload, Milliseconds::ZERO),
        };

        let nearest = self.access.nearest(&vehicle.position);
        let distance = nearest
            .distance
            .clamp(self.settings.min_distance, self.settings.max_distance);

        let irs_gain = match capabilities.beamforming {
            true => self.irs.adaptive_gain(self.settings.served_vehicles),
            false => Decibel::ZERO,
        };

        let snr = self.channel.compute_snr(tx_power, distance, irs_gain)?;
        let data_rate = self.channel.compute_data_rate(snr);
        let mac_delay = self
            .mac
            .access_delay(payload, data_rate, self.settings.contending_nodes);
        let tx_delay = airtime(payload, data_rate);
        let prop_delay = Milliseconds::new(distance.as_f64() / SPEED_OF_LIGHT * 1000.0);
        let processing_delay = self.settings.processing_delay;
        let handover_delay = match self.handover.chance(self.settings.handover_probability) {
            true => self.settings.handover_penalty,
            false => Milliseconds::ZERO,
        };

        let total_latency: Milliseconds = [
            compression_time,
            mac_delay,
            tx_delay,
            prop_delay,
            processing_delay,
            handover_delay,
        ]
        .into_iter()
        .sum();
        let energy = self.energy.measure(tx_delay, tx_power, capabilities);
        let success = self.decide(snr).is_feasible();

        trace!(
            "vehicle {} -> rsu {} ({}): snr {}, latency {}",
            vehicle.id,
            nearest.rsu_id,
            mode,
            snr,
            total_latency
        );

        Ok(TransmissionSample::builder()
            .vehicle_id(vehicle.id)
            .target_id(target.id)
            .serving_id(nearest.rsu_id)
            .mode(mode)
            .raw_data(vehicle.payload)
            .compressed(payload)
            .compression_time(compression_time)
            .distance(distance)
            .irs_gain(irs_gain)
            .snr(snr)
            .data_rate(data_rate)
            .mac_delay(mac_delay)
            .tx_delay(tx_delay)
            .prop_delay(prop_delay)
            .processing_delay(processing_delay)
            .handover_delay(handover_delay)
            .total_latency(total_latency)
            .energy(energy)
            .success(success)
            .build())
    }

    /// A transmission succeeds when its SNR is strictly above the decision threshold.
    pub fn decide(&self, snr: Decibel) -> Feasibility<Decibel> {
        match snr > self.settings.snr_threshold_db {
            true => Feasibility::Feasible(snr),
            false => Feasibility::Infeasible(snr),
        }
    }
}

#[cfg(test)]
mod tests {
    use semantirs_core::agent::AgentId;
    use semantirs_core::metrics::Kilobytes;

    use super::*;
    use crate::device::node::Point2D;

    fn rsu(id: u64, x: f64, y: f64) -> Rsu {
        Rsu::builder()
            .id(AgentId::from(id))
            .position(Point2D::new(x, y))
            .coverage_radius(Meters::new(300.0))
            .build()
    }

    fn vehicle_at(x: f64, y: f64) -> Vehicle {
        Vehicle::builder()
            .id(AgentId::from(7u64))
            .position(Point2D::new(x, y))
            .speed(14.0)
            .payload(Kilobytes::new(1000.0))
            .build()
    }

    fn transmitter(rsus: &[Rsu]) -> Transmitter {
        let access = AccessPoints::new(rsus).unwrap();
        Transmitter::with_settings(&OffloadSettings::default(), access, 42).unwrap()
    }

    #[test]
    fn test_distance_is_clamped_and_uses_nearest() {
        let rsus = [rsu(0, 0.0, 0.0), rsu(1, 1000.0, 0.0)];
        let mut transmitter = transmitter(&rsus);
        let near = transmitter
            .sample(&vehicle_at(900.0, 0.0), &rsus[0], OffloadMode::Raw)
            .unwrap();
        assert!((near.distance.as_f64() - 100.0).abs() < 1e-9);
        assert_eq!(near.serving_id, AgentId::from(1u64));
        assert_eq!(near.target_id, AgentId::from(0u64));

        let far = transmitter
            .sample(&vehicle_at(500.0, 900.0), &rsus[0], OffloadMode::Raw)
            .unwrap();
        assert_eq!(far.distance, Meters::new(250.0));

        let on_top = transmitter
            .sample(&vehicle_at(0.0, 0.0), &rsus[0], OffloadMode::Raw)
            .unwrap();
        assert_eq!(on_top.distance, Meters::new(1.0));
    }

    #[test]
    fn test_decision_threshold_is_strict() {
        let transmitter = transmitter(&[rsu(0, 0.0, 0.0)]);
        assert!(!transmitter.decide(Decibel::new(3.0)).is_feasible());
        assert!(transmitter.decide(Decibel::new(3.01)).is_feasible());
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut settings = OffloadSettings::default();
        settings.transmission.handover_probability = 1.2;
        let access = AccessPoints::new(&[rsu(0, 0.0, 0.0)]).unwrap();
        let err = Transmitter::with_settings(&settings, access, 1).err().unwrap();
        assert!(err.is_configuration());
    }
}
