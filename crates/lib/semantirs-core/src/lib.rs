#![forbid(unsafe_code)]

pub mod agent;
pub mod error;
pub mod metrics;
pub mod model;
