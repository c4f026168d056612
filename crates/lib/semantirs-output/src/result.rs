use std::fs;
use std::path::{Path, PathBuf};

use arrow::datatypes::Schema;
use log::info;
use serde::Deserialize;

use crate::error::OutputError;
use crate::report::Report;
use crate::stats::{ModeSummary, SampleSets};
use crate::tables::cdf::CdfWriter;
use crate::tables::comparison::{ComparisonTable, ComparisonWriter};
use crate::tables::sample::SampleWriter;
use crate::tables::summary::SummaryWriter;

#[derive(Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputType {
    Samples,
    Summary,
    Comparison,
    LatencyCdf,
    Report,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OutputSettings {
    pub output_path: String,
    pub outputs: Vec<Outputs>,
    pub scenario_id: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Outputs {
    pub output_type: OutputType,
    pub output_filename: String,
}

impl OutputSettings {
    /// Directory that receives every output file of the scenario.
    pub fn files_dir(&self) -> PathBuf {
        Path::new(&self.output_path)
            .join(self.scenario_id.to_string())
            .join("files")
    }

    fn file_for(&self, output_type: OutputType) -> Option<PathBuf> {
        self.outputs
            .iter()
            .filter(|output| output.output_type == output_type)
            .last()
            .map(|output| self.files_dir().join(&output.output_filename))
    }
}

pub trait ResultWriter {
    fn schema() -> Schema;
    fn write_to_file(&mut self) -> Result<(), OutputError>;
    fn close_file(self) -> Result<(), OutputError>;
}

/// Writers of the configured outputs. Outputs not listed in the settings are skipped.
#[derive(Debug)]
pub struct Results {
    pub samples: Option<SampleWriter>,
    pub summary: Option<SummaryWriter>,
    pub comparison: Option<ComparisonWriter>,
    pub latency_cdf: Option<CdfWriter>,
    pub report: Option<PathBuf>,
}

impl Results {
    pub fn new(output_settings: &OutputSettings) -> Result<Self, OutputError> {
        let output_path = output_settings.files_dir();
        if !output_path.exists() {
            fs::create_dir_all(&output_path)?;
        }

        let samples = output_settings
            .file_for(OutputType::Samples)
            .map(|file| SampleWriter::new(&file))
            .transpose()?;
        let summary = output_settings
            .file_for(OutputType::Summary)
            .map(|file| SummaryWriter::new(&file))
            .transpose()?;
        let comparison = output_settings
            .file_for(OutputType::Comparison)
            .map(|file| ComparisonWriter::new(&file))
            .transpose()?;
        let latency_cdf = output_settings
            .file_for(OutputType::LatencyCdf)
            .map(|file| CdfWriter::new(&file))
            .transpose()?;
        Ok(Self {
            samples,
            summary,
            comparison,
            latency_cdf,
            report: output_settings.file_for(OutputType::Report),
        })
    }

    pub fn add_samples(&mut self, sets: &SampleSets) -> Result<(), OutputError> {
        for (mode, samples) in sets.iter() {
            if let Some(writer) = &mut self.samples {
                for sample in samples.iter() {
                    writer.add_data(sample)?;
                }
            }
            if let Some(writer) = &mut self.latency_cdf {
                writer.add_data(*mode, samples);
            }
        }
        Ok(())
    }

    pub fn add_analysis(
        &mut self,
        summaries: &[ModeSummary],
        report: &Report,
    ) -> Result<(), OutputError> {
        if let Some(writer) = &mut self.summary {
            summaries.iter().for_each(|summary| writer.add_data(summary));
        }
        if let Some(writer) = &mut self.comparison {
            writer.add_data(&ComparisonTable::from_summaries(summaries));
        }
        if let Some(file) = &self.report {
            report.write_to(file)?;
        }
        Ok(())
    }

    pub fn write_to_file(&mut self) -> Result<(), OutputError> {
        if let Some(writer) = &mut self.samples {
            writer.write_to_file()?;
        }
        if let Some(writer) = &mut self.summary {
            writer.write_to_file()?;
        }
        if let Some(writer) = &mut self.comparison {
            writer.write_to_file()?;
        }
        if let Some(writer) = &mut self.latency_cdf {
            writer.write_to_file()?;
        }
        Ok(())
    }

    pub fn close_files(self) -> Result<(), OutputError> {
        if let Some(writer) = self.samples {
            writer.close_file()?;
        }
        if let Some(writer) = self.summary {
            writer.close_file()?;
        }
        if let Some(writer) = self.comparison {
            writer.close_file()?;
        }
        if let Some(writer) = self.latency_cdf {
            writer.close_file()?;
        }
        info!("Output files closed");
        Ok(())
    }
}
