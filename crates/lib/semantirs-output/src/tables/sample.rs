use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, RecordBatch, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};

use semantirs_models::offload::sample::{FieldKind, FieldValue, TransmissionSample};

use crate::error::OutputError;
use crate::result::ResultWriter;
use crate::writer::WriterType;

#[derive(Debug)]
enum Column {
    Id(Vec<u64>),
    Text(Vec<&'static str>),
    Number(Vec<f64>),
    Flag(Vec<bool>),
}

impl Column {
    fn new(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Id => Column::Id(Vec::new()),
            FieldKind::Text => Column::Text(Vec::new()),
            FieldKind::Number => Column::Number(Vec::new()),
            FieldKind::Flag => Column::Flag(Vec::new()),
        }
    }

    fn data_type(kind: FieldKind) -> DataType {
        match kind {
            FieldKind::Id => DataType::UInt64,
            FieldKind::Text => DataType::Utf8,
            FieldKind::Number => DataType::Float64,
            FieldKind::Flag => DataType::Boolean,
        }
    }

    fn push(&mut self, name: &'static str, value: FieldValue) -> Result<(), OutputError> {
        match (self, value) {
            (Column::Id(col), FieldValue::Id(v)) => col.push(v),
            (Column::Text(col), FieldValue::Text(v)) => col.push(v),
            (Column::Number(col), FieldValue::Number(v)) => col.push(v),
            (Column::Flag(col), FieldValue::Flag(v)) => col.push(v),
            (_, value) => {
                return Err(OutputError::Schema {
                    column: name,
                    found: format!("{:?}", value.kind()),
                })
            }
        }
        Ok(())
    }

    fn take(&mut self) -> ArrayRef {
        match self {
            Column::Id(col) => Arc::new(UInt64Array::from(std::mem::take(col))) as ArrayRef,
            Column::Text(col) => Arc::new(StringArray::from(std::mem::take(col))) as ArrayRef,
            Column::Number(col) => Arc::new(Float64Array::from(std::mem::take(col))) as ArrayRef,
            Column::Flag(col) => Arc::new(BooleanArray::from(std::mem::take(col))) as ArrayRef,
        }
    }
}

/// Writes every transmission sample as one row, columns in record order.
#[derive(Debug)]
pub struct SampleWriter {
    columns: Vec<Column>,
    to_output: WriterType,
}

impl SampleWriter {
    pub fn new(output_file: &Path) -> Result<Self, OutputError> {
        Ok(Self {
            to_output: WriterType::new(output_file, Self::schema())?,
            columns: TransmissionSample::SCHEMA
                .iter()
                .map(|(_, kind)| Column::new(*kind))
                .collect(),
        })
    }

    pub fn add_data(&mut self, sample: &TransmissionSample) -> Result<(), OutputError> {
        for (column, (name, value)) in self.columns.iter_mut().zip(sample.fields()) {
            column.push(name, value)?;
        }
        Ok(())
    }
}

impl ResultWriter for SampleWriter {
    fn schema() -> Schema {
        let fields: Vec<Field> = TransmissionSample::SCHEMA
            .iter()
            .map(|(name, kind)| Field::new(*name, Column::data_type(*kind), false))
            .collect();
        Schema::new(fields)
    }

    fn write_to_file(&mut self) -> Result<(), OutputError> {
        let arrays: Vec<ArrayRef> = self.columns.iter_mut().map(Column::take).collect();
        let record_batch = RecordBatch::try_new(Arc::new(Self::schema()), arrays)?;
        self.to_output.record_batch_to_file(&record_batch)
    }

    fn close_file(self) -> Result<(), OutputError> {
        self.to_output.close()
    }
}
