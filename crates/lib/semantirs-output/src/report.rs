use std::fmt;
use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use semantirs_models::offload::mode::OffloadMode;

use crate::error::OutputError;
use crate::stats::ModeSummary;
use crate::tables::comparison::ComparisonTable;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClaimMetric {
    LatencyReduction,
    MeanLatency,
    P95Latency,
    IrsGain,
    EnergySavings,
    BandwidthSavings,
    SuccessRate,
}

impl ClaimMetric {
    pub fn value(&self, summary: &ModeSummary) -> Option<f64> {
        match self {
            ClaimMetric::LatencyReduction => summary.latency_reduction,
            ClaimMetric::MeanLatency => Some(summary.mean_latency),
            ClaimMetric::P95Latency => Some(summary.p95_latency),
            ClaimMetric::IrsGain => Some(summary.irs_gain),
            ClaimMetric::EnergySavings => summary.energy_savings,
            ClaimMetric::BandwidthSavings => Some(summary.compression_pct),
            ClaimMetric::SuccessRate => Some(summary.success_rate),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ClaimMetric::MeanLatency | ClaimMetric::P95Latency => "ms",
            ClaimMetric::IrsGain => "dB",
            _ => "%",
        }
    }
}

/// A published figure to compare the run against. Missing bounds are open.
#[derive(Deserialize, Debug, Clone)]
pub struct Claim {
    pub name: String,
    pub metric: ClaimMetric,
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
}

impl Claim {
    fn new(name: &str, metric: ClaimMetric, lower: Option<f64>, upper: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            metric,
            lower,
            upper,
        }
    }

    pub fn check(&self, achieved: Option<f64>) -> Verdict {
        match achieved {
            None => Verdict::Unavailable,
            Some(v) if self.lower.is_some_and(|lower| v < lower) => Verdict::Below,
            Some(v) if self.upper.is_some_and(|upper| v > upper) => Verdict::Above,
            Some(_) => Verdict::Met,
        }
    }

    fn range(&self) -> String {
        let unit = self.metric.unit();
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) => format!("{:.1} to {:.1} {}", lower, upper, unit),
            (Some(lower), None) => format!("at least {:.1} {}", lower, unit),
            (None, Some(upper)) => format!("at most {:.1} {}", upper, unit),
            (None, None) => "any value".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReportSettings {
    pub subject_mode: OffloadMode,
    pub claims: Vec<Claim>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            subject_mode: OffloadMode::SemanticIrs,
            claims: vec![
                Claim::new(
                    "Latency reduction",
                    ClaimMetric::LatencyReduction,
                    Some(60.0),
                    Some(70.0),
                ),
                Claim::new("Target latency", ClaimMetric::MeanLatency, Some(50.0), Some(100.0)),
                Claim::new("IRS gain", ClaimMetric::IrsGain, Some(5.0), Some(10.0)),
                Claim::new("Energy savings", ClaimMetric::EnergySavings, Some(50.0), None),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Met,
    Below,
    Above,
    Unavailable,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Met => write!(f, "met"),
            Verdict::Below => write!(f, "not met (below range)"),
            Verdict::Above => write!(f, "not met (above range)"),
            Verdict::Unavailable => write!(f, "not available"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClaimCheck {
    pub claim: Claim,
    pub achieved: Option<f64>,
    pub verdict: Verdict,
}

/// Text summary of a run and of the configured claims, checked against one mode.
#[derive(Debug, Clone)]
pub struct Report {
    pub scenario: String,
    pub subject: OffloadMode,
    pub summaries: Vec<ModeSummary>,
    pub checks: Vec<ClaimCheck>,
}

impl Report {
    pub fn build(scenario: &str, summaries: &[ModeSummary], settings: &ReportSettings) -> Self {
        let subject = summaries
            .iter()
            .find(|summary| summary.mode == settings.subject_mode);
        let checks = settings
            .claims
            .iter()
            .map(|claim| {
                let achieved = subject.and_then(|summary| claim.metric.value(summary));
                ClaimCheck {
                    claim: claim.clone(),
                    achieved,
                    verdict: claim.check(achieved),
                }
            })
            .collect();
        Self {
            scenario: scenario.to_string(),
            subject: settings.subject_mode,
            summaries: summaries.to_vec(),
            checks,
        }
    }

    pub fn claims_met(&self) -> usize {
        self.checks
            .iter()
            .filter(|check| check.verdict == Verdict::Met)
            .count()
    }

    pub fn render(&self) -> String {
        let mut text = format!("Scenario: {}\n\n", self.scenario);

        text.push_str("Per-mode metrics\n");
        for summary in self.summaries.iter() {
            text.push_str(&format!(
                "  {} ({} samples)\n    latency   mean {:.1} ms, median {:.1} ms, p95 {:.1} ms, std {:.1} ms\n    energy    mean {:.1} mJ, std {:.1} mJ\n    channel   snr {:.1} dB, rate {:.1} Mbps, irs gain {:.1} dB, distance {:.1} m\n    delivery  success {:.1} %, bandwidth {:.0} KB, compression {:.1} %\n",
                summary.mode.label(),
                summary.samples,
                summary.mean_latency,
                summary.median_latency,
                summary.p95_latency,
                summary.std_latency,
                summary.mean_energy,
                summary.std_energy,
                summary.mean_snr,
                summary.mean_data_rate,
                summary.irs_gain,
                summary.mean_distance,
                summary.success_rate,
                summary.bandwidth_kb,
                summary.compression_pct,
            ));
            if let (Some(latency), Some(energy)) =
                (summary.latency_reduction, summary.energy_savings)
            {
                text.push_str(&format!(
                    "    vs raw    latency reduction {:.1} %, energy savings {:.1} %\n",
                    latency, energy
                ));
            }
            if summary.energy_increased() {
                text.push_str("    warning   energy consumption is higher than raw\n");
            }
        }

        text.push_str("\nDetailed comparison\n");
        text.push_str(&ComparisonTable::from_summaries(&self.summaries).render());

        text.push_str(&format!("\nClaims checked against {}\n", self.subject.label()));
        for check in self.checks.iter() {
            let achieved = check.achieved.map_or("n/a".to_string(), |v| {
                format!("{:.1} {}", v, check.claim.metric.unit())
            });
            text.push_str(&format!(
                "  {:<20} claim {:<22} achieved {:<12} {}\n",
                check.claim.name,
                check.claim.range(),
                achieved,
                check.verdict
            ));
        }
        text.push_str(&format!(
            "\n{} of {} claims met\n",
            self.claims_met(),
            self.checks.len()
        ));
        text
    }

    pub fn write_to(&self, file: &Path) -> Result<(), OutputError> {
        fs::write(file, self.render())?;
        info!("Report written to {}", file.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(lower: Option<f64>, upper: Option<f64>) -> Claim {
        Claim::new("probe", ClaimMetric::LatencyReduction, lower, upper)
    }

    #[test]
    fn test_verdicts() {
        let range = claim(Some(60.0), Some(70.0));
        assert_eq!(range.check(Some(65.0)), Verdict::Met);
        assert_eq!(range.check(Some(60.0)), Verdict::Met);
        assert_eq!(range.check(Some(82.6)), Verdict::Above);
        assert_eq!(range.check(Some(12.0)), Verdict::Below);
        assert_eq!(range.check(None), Verdict::Unavailable);
        assert_eq!(claim(Some(50.0), None).check(Some(500.0)), Verdict::Met);
    }

    #[test]
    fn test_missing_subject_reports_unavailable() {
        let report = Report::build("empty", &[], &ReportSettings::default());
        assert_eq!(report.checks.len(), 4);
        assert!(report
            .checks
            .iter()
            .all(|check| check.verdict == Verdict::Unavailable));
        assert!(report.render().contains("0 of 4 claims met"));
    }
}
