use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("arrow failure: {0}")]
    Arrow(#[from] ArrowError),
    #[error("parquet failure: {0}")]
    Parquet(#[from] ParquetError),
    #[error("unsupported output file {0}, use a .csv or .parquet extension")]
    UnsupportedFormat(String),
    #[error("value of kind {found} does not fit column {column}")]
    Schema { column: &'static str, found: String },
    #[error("no samples recorded for mode {0}")]
    NoSamples(String),
    #[error("logger setup failed: {0}")]
    Logger(String),
}
