use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};

use semantirs_models::offload::mode::OffloadMode;
use semantirs_models::offload::sample::TransmissionSample;

use crate::error::OutputError;
use crate::result::ResultWriter;
use crate::stats::latency_cdf;
use crate::writer::WriterType;

/// Empirical latency distribution per mode, one row per sample.
#[derive(Debug)]
pub struct CdfWriter {
    mode: Vec<&'static str>,
    rank: Vec<u32>,
    latency_ms: Vec<f64>,
    cdf: Vec<f64>,
    to_output: WriterType,
}

impl CdfWriter {
    pub fn new(output_file: &Path) -> Result<Self, OutputError> {
        Ok(Self {
            to_output: WriterType::new(output_file, Self::schema())?,
            mode: Vec::new(),
            rank: Vec::new(),
            latency_ms: Vec::new(),
            cdf: Vec::new(),
        })
    }

    pub fn add_data(&mut self, mode: OffloadMode, samples: &[TransmissionSample]) {
        for (rank, (latency, cdf)) in latency_cdf(samples).into_iter().enumerate() {
            self.mode.push(mode.as_str());
            self.rank.push(rank as u32 + 1);
            self.latency_ms.push(latency);
            self.cdf.push(cdf);
        }
    }
}

impl ResultWriter for CdfWriter {
    fn schema() -> Schema {
        let mode = Field::new("mode", DataType::Utf8, false);
        let rank = Field::new("rank", DataType::UInt32, false);
        let latency = Field::new("latency_ms", DataType::Float64, false);
        let cdf = Field::new("cdf", DataType::Float64, false);
        Schema::new(vec![mode, rank, latency, cdf])
    }

    fn write_to_file(&mut self) -> Result<(), OutputError> {
        let record_batch = RecordBatch::try_new(
            Arc::new(Self::schema()),
            vec![
                Arc::new(StringArray::from(std::mem::take(&mut self.mode))) as ArrayRef,
                Arc::new(UInt32Array::from(std::mem::take(&mut self.rank))) as ArrayRef,
                Arc::new(Float64Array::from(std::mem::take(&mut self.latency_ms))) as ArrayRef,
                Arc::new(Float64Array::from(std::mem::take(&mut self.cdf))) as ArrayRef,
            ],
        )?;
        self.to_output.record_batch_to_file(&record_batch)
    }

    fn close_file(self) -> Result<(), OutputError> {
        self.to_output.close()
    }
}
