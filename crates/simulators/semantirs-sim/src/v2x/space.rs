use log::{debug, info};
use serde::Deserialize;

use semantirs_core::agent::AgentId;
use semantirs_core::error::{ensure_positive, ModelError};
use semantirs_core::metrics::{Kilobytes, Meters, Metric};
use semantirs_core::model::{ModelSettings, StochasticModel};
use semantirs_models::device::node::{Point2D, Rsu, Vehicle};
use semantirs_models::dist::RngSampler;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FieldSettings {
    pub width: f64,
    pub height: f64,
    pub vehicle_count: usize,
    pub rsu_count: usize,
    pub payload_kb: Kilobytes,
    pub min_speed: f64,
    pub max_speed: f64,
    pub coverage_radius: Meters,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 2000.0,
            vehicle_count: 50,
            rsu_count: 15,
            payload_kb: Kilobytes::new(1000.0),
            min_speed: 10.0,
            max_speed: 18.0,
            coverage_radius: Meters::new(300.0),
        }
    }
}

impl ModelSettings for FieldSettings {
    fn validate(&self) -> Result<(), ModelError> {
        ensure_positive("field_settings.width", self.width)?;
        ensure_positive("field_settings.height", self.height)?;
        ensure_positive("field_settings.payload_kb", self.payload_kb.as_f64())?;
        if self.vehicle_count == 0 {
            return Err(ModelError::config(
                "field_settings.vehicle_count",
                "the fleet must not be empty",
            ));
        }
        if self.rsu_count == 0 {
            return Err(ModelError::config(
                "field_settings.rsu_count",
                "at least one roadside unit is required",
            ));
        }
        if !(self.min_speed.is_finite() && self.max_speed.is_finite())
            || self.min_speed < 0.0
            || self.min_speed > self.max_speed
        {
            return Err(ModelError::config(
                "field_settings.min_speed",
                format!(
                    "speed range [{}, {}] is invalid",
                    self.min_speed, self.max_speed
                ),
            ));
        }
        Ok(())
    }
}

/// Vehicles and roadside units placed on the field. Positions are fixed for the run.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub vehicles: Vec<Vehicle>,
    pub rsus: Vec<Rsu>,
}

impl StochasticModel for Deployment {
    type Settings = FieldSettings;

    fn with_settings(settings: &Self::Settings, seed: u64) -> Result<Self, ModelError> {
        settings.validate()?;
        let mut sampler = RngSampler::unit_uniform(seed);
        let vehicles = (0..settings.vehicle_count)
            .map(|idx| {
                let x = sampler.sample() * settings.width;
                let y = sampler.sample() * settings.height;
                let speed = settings.min_speed
                    + sampler.sample() * (settings.max_speed - settings.min_speed);
                Vehicle::builder()
                    .id(AgentId::from(idx))
                    .position(Point2D::new(x, y))
                    .speed(speed)
                    .payload(settings.payload_kb)
                    .build()
            })
            .collect();
        let rsus = Self::rsu_grid(settings);
        info!(
            "Deployed {} vehicles and {} roadside units",
            settings.vehicle_count, settings.rsu_count
        );
        Ok(Self { vehicles, rsus })
    }
}

impl Deployment {
    /// Places the units at cell centres of a grid with `floor(sqrt(n))` columns. When `n` is
    /// not a perfect square the extra rows continue past the field height.
    pub fn rsu_grid(settings: &FieldSettings) -> Vec<Rsu> {
        let spacing = ((settings.rsu_count as f64).sqrt().floor() as usize).max(1);
        let cell_width = settings.width / spacing as f64;
        let cell_height = settings.height / spacing as f64;
        (0..settings.rsu_count)
            .map(|idx| {
                let column = (idx % spacing) as f64;
                let row = (idx / spacing) as f64;
                let position = Point2D::new(
                    column * cell_width + cell_width / 2.0,
                    row * cell_height + cell_height / 2.0,
                );
                debug!("RSU {} at ({:.1}, {:.1})", idx, position.x, position.y);
                Rsu::builder()
                    .id(AgentId::from(idx))
                    .position(position)
                    .coverage_radius(settings.coverage_radius)
                    .build()
            })
            .collect()
    }
}
