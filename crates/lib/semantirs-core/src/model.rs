use crate::error::ModelError;

/// A marker trait for model settings. Use this to define the settings for a model. These
/// settings should be readable from a config file and must be able to validate themselves
/// before a model is built from them.
pub trait ModelSettings: Clone {
    fn validate(&self) -> Result<(), ModelError>;
}

/// A deterministic model. Given the same settings and inputs, it always produces the same
/// outputs, so building it requires nothing but the settings.
pub trait Model: Sized {
    type Settings: ModelSettings;

    fn with_settings(settings: &Self::Settings) -> Result<Self, ModelError>;
}

/// A model that consumes randomness. Each instance owns its own random stream, seeded
/// explicitly at construction so that a run can be reproduced from the master seed.
pub trait StochasticModel: Sized {
    type Settings: ModelSettings;

    fn with_settings(settings: &Self::Settings, seed: u64) -> Result<Self, ModelError>;
}
