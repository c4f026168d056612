use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};

use crate::error::OutputError;
use crate::result::ResultWriter;
use crate::stats::ModeSummary;
use crate::writer::WriterType;

const METRIC_COLUMNS: [&str; 14] = [
    "mean_latency_ms",
    "median_latency_ms",
    "p95_latency_ms",
    "std_latency_ms",
    "mean_energy_mj",
    "std_energy_mj",
    "mean_snr_db",
    "std_snr_db",
    "mean_datarate_mbps",
    "success_rate_pct",
    "bandwidth_kb",
    "compression_pct",
    "irs_gain_db",
    "mean_distance_m",
];

fn metric_values(summary: &ModeSummary) -> [f64; 14] {
    [
        summary.mean_latency,
        summary.median_latency,
        summary.p95_latency,
        summary.std_latency,
        summary.mean_energy,
        summary.std_energy,
        summary.mean_snr,
        summary.std_snr,
        summary.mean_data_rate,
        summary.success_rate,
        summary.bandwidth_kb,
        summary.compression_pct,
        summary.irs_gain,
        summary.mean_distance,
    ]
}

/// One row of aggregate metrics per mode. Improvements are null when raw was not simulated.
#[derive(Debug)]
pub struct SummaryWriter {
    mode: Vec<&'static str>,
    samples: Vec<u64>,
    metrics: Vec<Vec<f64>>,
    latency_reduction: Vec<Option<f64>>,
    energy_savings: Vec<Option<f64>>,
    to_output: WriterType,
}

impl SummaryWriter {
    pub fn new(output_file: &Path) -> Result<Self, OutputError> {
        Ok(Self {
            to_output: WriterType::new(output_file, Self::schema())?,
            mode: Vec::new(),
            samples: Vec::new(),
            metrics: vec![Vec::new(); METRIC_COLUMNS.len()],
            latency_reduction: Vec::new(),
            energy_savings: Vec::new(),
        })
    }

    pub fn add_data(&mut self, summary: &ModeSummary) {
        self.mode.push(summary.mode.as_str());
        self.samples.push(summary.samples as u64);
        for (column, value) in self.metrics.iter_mut().zip(metric_values(summary)) {
            column.push(value);
        }
        self.latency_reduction.push(summary.latency_reduction);
        self.energy_savings.push(summary.energy_savings);
    }
}

impl ResultWriter for SummaryWriter {
    fn schema() -> Schema {
        let mut fields = vec![
            Field::new("mode", DataType::Utf8, false),
            Field::new("samples", DataType::UInt64, false),
        ];
        fields.extend(
            METRIC_COLUMNS
                .iter()
                .map(|name| Field::new(*name, DataType::Float64, false)),
        );
        fields.push(Field::new("latency_reduction_pct", DataType::Float64, true));
        fields.push(Field::new("energy_savings_pct", DataType::Float64, true));
        Schema::new(fields)
    }

    fn write_to_file(&mut self) -> Result<(), OutputError> {
        let mut arrays = vec![
            Arc::new(StringArray::from(std::mem::take(&mut self.mode))) as ArrayRef,
            Arc::new(UInt64Array::from(std::mem::take(&mut self.samples))) as ArrayRef,
        ];
        arrays.extend(
            self.metrics
                .iter_mut()
                .map(|column| Arc::new(Float64Array::from(std::mem::take(column))) as ArrayRef),
        );
        arrays.push(
            Arc::new(Float64Array::from(std::mem::take(&mut self.latency_reduction))) as ArrayRef,
        );
        arrays.push(
            Arc::new(Float64Array::from(std::mem::take(&mut self.energy_savings))) as ArrayRef,
        );
        let record_batch = RecordBatch::try_new(Arc::new(Self::schema()), arrays)?;
        self.to_output.record_batch_to_file(&record_batch)
    }

    fn close_file(self) -> Result<(), OutputError> {
        self.to_output.close()
    }
}
