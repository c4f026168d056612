pub mod fleet;
pub mod models;
