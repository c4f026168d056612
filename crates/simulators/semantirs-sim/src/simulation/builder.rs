use std::error::Error;
use std::path::{Path, PathBuf};

use log::info;

use semantirs_core::model::{ModelSettings, StochasticModel};
use semantirs_models::dist::{RngSampler, StreamId};
use semantirs_models::net::access::AccessPoints;
use semantirs_models::offload::transmitter::Transmitter;
use semantirs_output::logger::initiate_logger;
use semantirs_output::result::{OutputSettings, Results};

use crate::simulation::config::{BaseConfig, BaseConfigReader};
use crate::simulation::runner::Simulation;
use crate::simulation::scenario::Scenario;
use crate::v2x::space::Deployment;

pub struct SimulationBuilder {
    base_config: BaseConfig,
    config_path: PathBuf,
}

impl SimulationBuilder {
    pub(crate) fn new(base_config_file: &str) -> Result<Self, Box<dyn Error>> {
        if !Path::new(base_config_file).exists() {
            return Err(format!("configuration file {} is not found", base_config_file).into());
        }
        let config_path = Path::new(base_config_file)
            .parent()
            .ok_or("invalid directory for the configuration file")?
            .to_path_buf();

        let base_config = BaseConfigReader::new(base_config_file)
            .parse()
            .map_err(|e| format!("error while parsing the configuration file: {}", e))?;
        Ok(Self::with_config(base_config, config_path))
    }

    pub(crate) fn with_config(base_config: BaseConfig, config_path: PathBuf) -> Self {
        Self {
            base_config,
            config_path,
        }
    }

    /// Output settings with the output path resolved against the configuration directory.
    fn output_settings(&self) -> OutputSettings {
        let mut output_settings = self.base_config.output_settings.clone();
        output_settings.output_path = self
            .config_path
            .join(&output_settings.output_path)
            .to_string_lossy()
            .to_string();
        output_settings
    }

    pub(crate) fn build(&self) -> Result<Simulation, Box<dyn Error>> {
        initiate_logger(
            &self.config_path,
            &self.base_config.log_settings,
            Some(self.base_config.output_settings.scenario_id),
        )?;
        self.build_simulation()
    }

    /// Builds every component without touching the global logger.
    pub(crate) fn build_simulation(&self) -> Result<Simulation, Box<dyn Error>> {
        let sim_settings = &self.base_config.simulation_settings;
        sim_settings.validate()?;
        let seed = sim_settings.seed;

        info!("Deploying vehicles and roadside units...");
        let deployment = Deployment::with_settings(
            &self.base_config.field_settings,
            StreamId::Deployment.seed_from(seed),
        )?;

        info!("Building transmission models...");
        let access = AccessPoints::new(&deployment.rsus)?;
        let transmitter =
            Transmitter::with_settings(&self.base_config.offload_settings(), access, seed)?;

        let scenario = Scenario::builder()
            .modes(sim_settings.modes.clone())
            .samples_per_mode(sim_settings.samples_per_mode)
            .progress_interval(sim_settings.progress_interval)
            .deployment(deployment)
            .transmitter(transmitter)
            .picker(RngSampler::unit_uniform(StreamId::Scenario.seed_from(seed)))
            .build();

        let results = Results::new(&self.output_settings())?;
        Ok(Simulation::builder()
            .scenario_name(sim_settings.scenario.clone())
            .scenario(scenario)
            .results(results)
            .report_settings(self.base_config.report_settings.clone())
            .build())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use semantirs_output::report::Verdict;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let run = std::process::id();
        let dir = std::env::temp_dir().join(format!("semantirs-sim-{}-{}", run, name));
        if dir.exists() {
            fs::remove_dir_all(&dir).unwrap();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn shipped_config(samples: usize) -> BaseConfig {
        let mut config: BaseConfig =
            toml::from_str(include_str!("../../configs/semantirs.toml")).unwrap();
        config.simulation_settings.samples_per_mode = samples;
        for output in config.output_settings.outputs.iter_mut() {
            output.output_filename = output.output_filename.replace(".parquet", ".csv");
        }
        config
    }

    #[test]
    fn test_end_to_end_run() {
        let dir = scratch_dir("run");
        let builder = SimulationBuilder::with_config(shipped_config(30), dir.clone());
        let report = builder.build_simulation().unwrap().run().unwrap();
        assert_eq!(report.summaries.len(), 3);
        assert!(report
            .checks
            .iter()
            .all(|check| check.verdict != Verdict::Unavailable));

        let files = dir.join("output").join("1").join("files");
        let samples = fs::read_to_string(files.join("samples.csv")).unwrap();
        assert_eq!(samples.lines().count(), 91);
        assert!(files.join("summary.csv").exists());
        assert!(files.join("comparison.csv").exists());
        assert!(files.join("latency_cdf.csv").exists());
        assert!(files.join("report.txt").exists());
    }

    #[test]
    fn test_invalid_field_rejected() {
        let dir = scratch_dir("invalid");
        let mut config = shipped_config(10);
        config.field_settings.rsu_count = 0;
        let builder = SimulationBuilder::with_config(config, dir);
        assert!(builder.build_simulation().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        assert!(SimulationBuilder::new("/nonexistent/semantirs.toml").is_err());
    }
}
