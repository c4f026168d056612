use std::path::PathBuf;

use itertools::Itertools;
use serde::Deserialize;

use semantirs_core::error::ModelError;
use semantirs_core::model::ModelSettings;
use semantirs_models::device::compress::CompressorSettings;
use semantirs_models::device::energy::EnergySettings;
use semantirs_models::net::channel::ChannelSettings;
use semantirs_models::net::irs::IrsSettings;
use semantirs_models::net::mac::MacSettings;
use semantirs_models::offload::mode::OffloadMode;
use semantirs_models::offload::transmitter::{OffloadSettings, TransmissionSettings};
use semantirs_output::logger::LogSettings;
use semantirs_output::report::ReportSettings;
use semantirs_output::result::OutputSettings;

use crate::v2x::space::FieldSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct BaseConfig {
    pub simulation_settings: SimSettings,
    #[serde(default)]
    pub field_settings: FieldSettings,
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
    pub log_settings: LogSettings,
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub report_settings: ReportSettings,
}

impl BaseConfig {
    pub fn offload_settings(&self) -> OffloadSettings {
        OffloadSettings {
            channel: self.channel.clone(),
            irs: self.irs.clone(),
            compressor: self.compressor.clone(),
            mac: self.mac.clone(),
            energy: self.energy.clone(),
            transmission: self.transmission.clone(),
        }
    }
}

fn default_modes() -> Vec<OffloadMode> {
    OffloadMode::ALL.to_vec()
}

fn default_progress_interval() -> usize {
    50
}

#[derive(Deserialize, Debug, Clone)]
pub struct SimSettings {
    pub scenario: String,
    pub samples_per_mode: usize,
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
    pub seed: u64,
    #[serde(default = "default_modes")]
    pub modes: Vec<OffloadMode>,
}

impl ModelSettings for SimSettings {
    fn validate(&self) -> Result<(), ModelError> {
        if self.samples_per_mode == 0 {
            return Err(ModelError::config(
                "simulation_settings.samples_per_mode",
                "must be at least 1",
            ));
        }
        if self.progress_interval == 0 {
            return Err(ModelError::config(
                "simulation_settings.progress_interval",
                "must be at least 1",
            ));
        }
        if self.modes.is_empty() {
            return Err(ModelError::config(
                "simulation_settings.modes",
                "at least one mode is required",
            ));
        }
        if !self.modes.iter().all_unique() {
            return Err(ModelError::config(
                "simulation_settings.modes",
                format!("modes must not repeat, got {:?}", self.modes),
            ));
        }
        Ok(())
    }
}

pub struct BaseConfigReader {
    file_path: PathBuf,
}

impl BaseConfigReader {
    pub fn new(file_name: &str) -> Self {
        let file_path = PathBuf::from(file_name);
        Self { file_path }
    }

    pub fn parse(&self) -> Result<BaseConfig, Box<dyn std::error::Error>> {
        let parsing_result = std::fs::read_to_string(&self.file_path)?;
        let config: BaseConfig = toml::from_str(&parsing_result)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use semantirs_core::metrics::{Decibel, Meters};
    use semantirs_output::result::OutputType;

    use super::*;

    const MINIMAL: &str = r#"
        [simulation_settings]
        scenario = "minimal"
        samples_per_mode = 10
        seed = 7

        [log_settings]
        log_path = "output"
        log_level = "debug"
        log_file_name = "minimal.log"
        log_overwrite = true

        [output_settings]
        output_path = "output"
        scenario_id = 2
        outputs = [{ output_type = "Summary", output_filename = "summary.csv" }]
    "#;

    #[test]
    fn test_minimal_config_uses_reference_models() {
        let config: BaseConfig = toml::from_str(MINIMAL).unwrap();
        config.simulation_settings.validate().unwrap();
        assert_eq!(config.simulation_settings.progress_interval, 50);
        assert_eq!(config.simulation_settings.modes, OffloadMode::ALL.to_vec());
        assert_eq!(config.field_settings.rsu_count, 15);
        let offload = config.offload_settings();
        offload.validate().unwrap();
        assert_eq!(offload.transmission.max_distance, Meters::new(250.0));
        assert_eq!(offload.irs.max_gain_db, Decibel::new(12.0));
        assert_eq!(config.report_settings.subject_mode, OffloadMode::SemanticIrs);
        assert_eq!(
            config.output_settings.outputs[0].output_type,
            OutputType::Summary
        );
    }

    #[test]
    fn test_shipped_config_parses() {
        let config: BaseConfig = toml::from_str(include_str!("../../configs/semantirs.toml")).unwrap();
        config.simulation_settings.validate().unwrap();
        config.field_settings.validate().unwrap();
        config.offload_settings().validate().unwrap();
        assert_eq!(config.simulation_settings.samples_per_mode, 150);
        assert_eq!(config.report_settings.claims.len(), 5);
    }

    #[test]
    fn test_repeated_modes_rejected() {
        let mut config: BaseConfig = toml::from_str(MINIMAL).unwrap();
        config.simulation_settings.modes = vec![OffloadMode::Raw, OffloadMode::Raw];
        assert!(config.simulation_settings.validate().is_err());
    }
}
