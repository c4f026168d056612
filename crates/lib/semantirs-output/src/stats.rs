use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, warn};

use semantirs_core::metrics::Metric;
use semantirs_models::offload::mode::OffloadMode;
use semantirs_models::offload::sample::TransmissionSample;

use crate::error::OutputError;

/// Samples of a run grouped by mode, in the order the modes were simulated.
pub type SampleSets = IndexMap<OffloadMode, Vec<TransmissionSample>>;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation with one degree of freedom removed. Zero for fewer than two
/// values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let centre = mean(values);
    let squares: f64 = values.iter().map(|v| (v - centre).powi(2)).sum();
    (squares / (values.len() - 1) as f64).sqrt()
}

/// Quantile `q` in `[0, 1]` with linear interpolation between the closest ranks.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = values
        .iter()
        .copied()
        .sorted_by(|a, b| a.total_cmp(b))
        .collect_vec();
    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

pub fn median(values: &[f64]) -> f64 {
    percentile(values, 0.5)
}

/// Relative reduction of `value` against `baseline`, in percent. Negative when `value` is
/// larger than the baseline.
pub fn reduction_pct(baseline: f64, value: f64) -> Option<f64> {
    match baseline > 0.0 {
        true => Some((baseline - value) / baseline * 100.0),
        false => None,
    }
}

/// Aggregate view of the samples of one mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeSummary {
    pub mode: OffloadMode,
    pub samples: usize,
    pub mean_latency: f64,
    pub median_latency: f64,
    pub p95_latency: f64,
    pub std_latency: f64,
    pub mean_energy: f64,
    pub std_energy: f64,
    pub mean_snr: f64,
    pub std_snr: f64,
    pub mean_data_rate: f64,
    pub success_rate: f64,
    pub bandwidth_kb: f64,
    pub compression_pct: f64,
    pub irs_gain: f64,
    pub mean_distance: f64,
    pub latency_reduction: Option<f64>,
    pub energy_savings: Option<f64>,
}

impl ModeSummary {
    pub fn from_samples(
        mode: OffloadMode,
        samples: &[TransmissionSample],
    ) -> Result<Self, OutputError> {
        if samples.is_empty() {
            return Err(OutputError::NoSamples(mode.to_string()));
        }
        let column = |read: fn(&TransmissionSample) -> f64| -> Vec<f64> {
            samples.iter().map(read).collect_vec()
        };
        let latency = column(|s| s.total_latency.as_f64());
        let energy = column(|s| s.energy.as_f64());
        let snr = column(|s| s.snr.as_f64());
        let raw_kb = mean(&column(|s| s.raw_data.as_f64()));
        let bandwidth_kb = mean(&column(|s| s.compressed.as_f64()));
        let successes = samples.iter().filter(|s| s.success).count();

        Ok(Self {
            mode,
            samples: samples.len(),
            mean_latency: mean(&latency),
            median_latency: median(&latency),
            p95_latency: percentile(&latency, 0.95),
            std_latency: sample_std(&latency),
            mean_energy: mean(&energy),
            std_energy: sample_std(&energy),
            mean_snr: mean(&snr),
            std_snr: sample_std(&snr),
            mean_data_rate: mean(&column(|s| s.data_rate.as_f64())),
            success_rate: successes as f64 / samples.len() as f64 * 100.0,
            bandwidth_kb,
            compression_pct: reduction_pct(raw_kb, bandwidth_kb).unwrap_or(0.0),
            irs_gain: mean(&column(|s| s.irs_gain.as_f64())),
            mean_distance: mean(&column(|s| s.distance.as_f64())),
            latency_reduction: None,
            energy_savings: None,
        })
    }

    pub fn energy_increased(&self) -> bool {
        self.energy_savings.is_some_and(|savings| savings < 0.0)
    }
}

/// Summarises every mode and fills the improvements against the raw mode, when raw was
/// simulated.
pub fn summarize(sets: &SampleSets) -> Result<Vec<ModeSummary>, OutputError> {
    let mut summaries = sets
        .iter()
        .map(|(mode, samples)| ModeSummary::from_samples(*mode, samples))
        .collect::<Result<Vec<ModeSummary>, OutputError>>()?;

    let baseline = match summaries.iter().find(|s| s.mode == OffloadMode::Raw) {
        Some(raw) => *raw,
        None => {
            debug!("Raw mode not simulated, skipping improvements");
            return Ok(summaries);
        }
    };
    for summary in summaries.iter_mut() {
        summary.latency_reduction = reduction_pct(baseline.mean_latency, summary.mean_latency);
        summary.energy_savings = reduction_pct(baseline.mean_energy, summary.mean_energy);
        if summary.energy_increased() {
            warn!(
                "{} uses {:.1}% more energy than raw",
                summary.mode,
                -summary.energy_savings.unwrap_or_default()
            );
        }
    }
    Ok(summaries)
}

/// Sorted latencies of one mode paired with their empirical CDF value `(i + 1) / n`.
pub fn latency_cdf(samples: &[TransmissionSample]) -> Vec<(f64, f64)> {
    let count = samples.len() as f64;
    samples
        .iter()
        .map(|s| s.total_latency.as_f64())
        .sorted_by(|a, b| a.total_cmp(b))
        .enumerate()
        .map(|(idx, latency)| (latency, (idx + 1) as f64 / count))
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let values = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(median(&values), 3.0);
        assert!((percentile(&values, 0.95) - 4.8).abs() < 1e-12);
        assert_eq!(percentile(&[1.0, 2.0], 0.5), 1.5);
        assert_eq!(percentile(&[7.0], 0.95), 7.0);
    }

    #[test]
    fn test_sample_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((sample_std(&values) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std(&[3.0]), 0.0);
    }

    #[test]
    fn test_reduction() {
        assert_eq!(reduction_pct(200.0, 50.0), Some(75.0));
        assert_eq!(reduction_pct(100.0, 150.0), Some(-50.0));
        assert_eq!(reduction_pct(0.0, 1.0), None);
    }
}
