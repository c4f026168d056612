use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};

use semantirs_models::offload::mode::OffloadMode;

use crate::error::OutputError;
use crate::result::ResultWriter;
use crate::stats::ModeSummary;
use crate::writer::WriterType;

const NOT_APPLICABLE: &str = "N/A";
const NOT_SIMULATED: &str = "-";

fn percent_or_na(value: Option<f64>) -> String {
    value.map_or(NOT_APPLICABLE.to_string(), |v| format!("{:.1}", v))
}

fn savings_cell(summary: &ModeSummary) -> String {
    match summary.energy_savings {
        Some(v) if v < 0.0 => format!("{:.1} (increase)", v),
        other => percent_or_na(other),
    }
}

/// Formatted metric rows with one column per offload mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub rows: Vec<(&'static str, [String; 3])>,
}

impl ComparisonTable {
    pub fn from_summaries(summaries: &[ModeSummary]) -> Self {
        let metrics: [(&'static str, fn(&ModeSummary) -> String); 14] = [
            ("Mean Latency (ms)", |s| format!("{:.1}", s.mean_latency)),
            ("95th Percentile Latency (ms)", |s| {
                format!("{:.1}", s.p95_latency)
            }),
            ("Latency Std Dev (ms)", |s| format!("{:.1}", s.std_latency)),
            ("Latency Reduction (%)", |s| {
                percent_or_na(s.latency_reduction)
            }),
            ("Mean Energy (mJ)", |s| format!("{:.1}", s.mean_energy)),
            ("Energy Savings (%)", savings_cell),
            ("Mean SNR (dB)", |s| format!("{:.1}", s.mean_snr)),
            ("SNR with IRS (dB)", |s| {
                match s.mode.capabilities().beamforming {
                    true => format!("{:.1}", s.mean_snr),
                    false => NOT_APPLICABLE.to_string(),
                }
            }),
            ("IRS Gain (dB)", |s| format!("{:.1}", s.irs_gain)),
            ("Datarate (Mbps)", |s| format!("{:.1}", s.mean_data_rate)),
            ("Packet Success Rate (%)", |s| {
                format!("{:.0}", s.success_rate)
            }),
            ("Bandwidth Usage (KB)", |s| format!("{:.0}", s.bandwidth_kb)),
            ("Bandwidth Savings (%)", |s| {
                format!("{:.1}", s.compression_pct)
            }),
            ("Avg Distance (m)", |s| format!("{:.1}", s.mean_distance)),
        ];

        let rows = metrics
            .iter()
            .map(|(metric, cell)| {
                let mut values: [String; 3] = std::array::from_fn(|_| NOT_SIMULATED.to_string());
                for summary in summaries {
                    values[summary.mode as usize] = cell(summary);
                }
                (*metric, values)
            })
            .collect();
        Self { rows }
    }

    /// Plain text rendering with left aligned metric names.
    pub fn render(&self) -> String {
        let mut text = format!("{:<30}", "Metric");
        for mode in OffloadMode::ALL {
            text.push_str(&format!("{:>20}", mode.label()));
        }
        text.push('\n');
        for (metric, values) in self.rows.iter() {
            text.push_str(&format!("{:<30}", metric));
            for value in values {
                text.push_str(&format!("{:>20}", value));
            }
            text.push('\n');
        }
        text
    }
}

#[derive(Debug)]
pub struct ComparisonWriter {
    metric: Vec<&'static str>,
    values: [Vec<String>; 3],
    to_output: WriterType,
}

impl ComparisonWriter {
    pub fn new(output_file: &Path) -> Result<Self, OutputError> {
        Ok(Self {
            to_output: WriterType::new(output_file, Self::schema())?,
            metric: Vec::new(),
            values: Default::default(),
        })
    }

    pub fn add_data(&mut self, table: &ComparisonTable) {
        for (metric, values) in table.rows.iter() {
            self.metric.push(*metric);
            for (column, value) in self.values.iter_mut().zip(values.iter()) {
                column.push(value.clone());
            }
        }
    }
}

impl ResultWriter for ComparisonWriter {
    fn schema() -> Schema {
        let mut fields = vec![Field::new("Metric", DataType::Utf8, false)];
        fields.extend(
            OffloadMode::ALL
                .iter()
                .map(|mode| Field::new(mode.label(), DataType::Utf8, false)),
        );
        Schema::new(fields)
    }

    fn write_to_file(&mut self) -> Result<(), OutputError> {
        let mut arrays =
            vec![Arc::new(StringArray::from(std::mem::take(&mut self.metric))) as ArrayRef];
        arrays.extend(
            self.values
                .iter_mut()
                .map(|column| Arc::new(StringArray::from(std::mem::take(column))) as ArrayRef),
        );
        let record_batch = RecordBatch::try_new(Arc::new(Self::schema()), arrays)?;
        self.to_output.record_batch_to_file(&record_batch)
    }

    fn close_file(self) -> Result<(), OutputError> {
        self.to_output.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(mode: OffloadMode, latency: f64, savings: Option<f64>) -> ModeSummary {
        ModeSummary {
            mode,
            samples: 10,
            mean_latency: latency,
            median_latency: latency,
            p95_latency: latency,
            std_latency: 1.0,
            mean_energy: 50.0,
            std_energy: 1.0,
            mean_snr: 20.0,
            std_snr: 1.0,
            mean_data_rate: 100.0,
            success_rate: 100.0,
            bandwidth_kb: 100.0,
            compression_pct: 90.0,
            irs_gain: 0.0,
            mean_distance: 120.0,
            latency_reduction: Some(0.0),
            energy_savings: savings,
        }
    }

    #[test]
    fn test_missing_modes_and_flags() {
        let table = ComparisonTable::from_summaries(&[
            summary(OffloadMode::Raw, 100.0, Some(0.0)),
            summary(OffloadMode::SemanticIrs, 20.0, Some(-12.34)),
        ]);
        assert_eq!(table.rows.len(), 14);
        let (name, latency) = &table.rows[0];
        assert_eq!(*name, "Mean Latency (ms)");
        assert_eq!(latency[0], "100.0");
        assert_eq!(latency[1], "-");
        assert_eq!(latency[2], "20.0");

        let (_, savings) = &table.rows[5];
        assert_eq!(savings[2], "-12.3 (increase)");
        let (_, snr_with_irs) = &table.rows[7];
        assert_eq!(snr_with_irs[0], "N/A");
        assert_eq!(snr_with_irs[2], "20.0");
        assert!(table.render().contains("Semantic + IRS"));
    }
}
