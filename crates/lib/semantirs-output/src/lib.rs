pub use arrow;

pub mod error;
pub mod logger;
pub mod report;
pub mod result;
pub mod stats;
pub mod writer;

pub mod tables {
    pub mod cdf;
    pub mod comparison;
    pub mod sample;
    pub mod summary;
}
