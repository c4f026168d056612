use std::error::Error;

use log::{info, warn};
use typed_builder::TypedBuilder;

use semantirs_output::report::{Report, ReportSettings};
use semantirs_output::result::Results;
use semantirs_output::stats::summarize;

use crate::simulation::scenario::Scenario;

/// A fully built run: the scenario to drive and the sinks its results go to.
#[derive(TypedBuilder)]
pub struct Simulation {
    scenario_name: String,
    scenario: Scenario,
    results: Results,
    report_settings: ReportSettings,
}

impl Simulation {
    pub fn run(mut self) -> Result<Report, Box<dyn Error>> {
        info!("Running scenario {}", self.scenario_name);
        let sets = self.scenario.run()?;

        info!("Aggregating results...");
        let summaries = summarize(&sets)?;
        for summary in summaries.iter() {
            info!(
                "{}: mean latency {:.1} ms, p95 {:.1} ms, energy {:.1} mJ, success {:.1} %",
                summary.mode.label(),
                summary.mean_latency,
                summary.p95_latency,
                summary.mean_energy,
                summary.success_rate
            );
        }
        let report = Report::build(&self.scenario_name, &summaries, &self.report_settings);
        if report.claims_met() < report.checks.len() {
            warn!(
                "{} of {} claims met",
                report.claims_met(),
                report.checks.len()
            );
        }

        self.results.add_samples(&sets)?;
        self.results.add_analysis(&summaries, &report)?;
        self.results.write_to_file()?;
        self.results.close_files()?;
        Ok(report)
    }
}
