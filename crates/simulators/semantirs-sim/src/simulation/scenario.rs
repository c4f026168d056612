use indexmap::IndexMap;
use log::info;
use typed_builder::TypedBuilder;

use semantirs_core::error::ModelError;
use semantirs_models::dist::RngSampler;
use semantirs_models::offload::mode::OffloadMode;
use semantirs_models::offload::transmitter::Transmitter;
use semantirs_output::stats::SampleSets;

use crate::v2x::space::Deployment;

/// Draws uniformly chosen (vehicle, target RSU) pairs and samples one transmission per pair,
/// mode after mode.
#[derive(TypedBuilder)]
pub struct Scenario {
    modes: Vec<OffloadMode>,
    samples_per_mode: usize,
    progress_interval: usize,
    deployment: Deployment,
    transmitter: Transmitter,
    picker: RngSampler,
}

impl Scenario {
    pub fn run(&mut self) -> Result<SampleSets, ModelError> {
        let mut sets: SampleSets = IndexMap::with_capacity(self.modes.len());
        for mode in self.modes.clone() {
            info!("Simulating mode {}", mode);
            let mut samples = Vec::with_capacity(self.samples_per_mode);
            for count in 1..=self.samples_per_mode {
                let vehicle = self.picker.below(self.deployment.vehicles.len());
                let target = self.picker.below(self.deployment.rsus.len());
                samples.push(self.transmitter.sample(
                    &self.deployment.vehicles[vehicle],
                    &self.deployment.rsus[target],
                    mode,
                )?);
                if count % self.progress_interval == 0 {
                    info!("Progress: {}/{}", count, self.samples_per_mode);
                }
            }
            sets.insert(mode, samples);
        }
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use semantirs_models::offload::transmitter::OffloadSettings;
    use semantirs_testutils::fleet::{diagonal_fleet, square_rsus};
    use semantirs_testutils::models::make_transmitter;

    use super::*;

    fn scenario(modes: Vec<OffloadMode>, seed: u64) -> Scenario {
        let rsus = square_rsus();
        let transmitter = make_transmitter(&OffloadSettings::default(), &rsus, seed).unwrap();
        Scenario::builder()
            .modes(modes)
            .samples_per_mode(25)
            .progress_interval(10)
            .deployment(Deployment {
                vehicles: diagonal_fleet(8),
                rsus,
            })
            .transmitter(transmitter)
            .picker(RngSampler::unit_uniform(seed))
            .build()
    }

    #[test]
    fn test_modes_in_configured_order() {
        let modes = vec![OffloadMode::SemanticIrs, OffloadMode::Raw];
        let sets = scenario(modes.clone(), 5).run().unwrap();
        assert_eq!(sets.keys().copied().collect::<Vec<_>>(), modes);
        for (mode, samples) in sets.iter() {
            assert_eq!(samples.len(), 25);
            assert!(samples.iter().all(|sample| sample.mode == *mode));
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let first = scenario(OffloadMode::ALL.to_vec(), 13).run().unwrap();
        let second = scenario(OffloadMode::ALL.to_vec(), 13).run().unwrap();
        assert_eq!(first, second);
    }
}
