use thiserror::Error;

/// Errors raised by the models.
///
/// `Configuration` is returned while building a model from invalid settings. `Computation`
/// marks a numeric state that validated settings should never produce; treat it as a logic
/// fault and abort the run rather than retrying.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid configuration for {parameter}: {reason}")]
    Configuration {
        parameter: &'static str,
        reason: String,
    },
    #[error("numeric fault in {operation}: {reason}")]
    Computation {
        operation: &'static str,
        reason: String,
    },
}

impl ModelError {
    pub fn config(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            parameter,
            reason: reason.into(),
        }
    }

    pub fn computation(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Computation {
            operation,
            reason: reason.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Fails with a configuration error unless `value` is finite and strictly positive.
pub fn ensure_positive(parameter: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ModelError::config(
        parameter,
        format!("must be positive, got {}", value),
    ))
}

/// Fails with a configuration error unless `value` lies in the closed unit interval.
pub fn ensure_probability(parameter: &'static str, value: f64) -> Result<(), ModelError> {
    if (0.0..=1.0).contains(&value) {
        return Ok(());
    }
    Err(ModelError::config(
        parameter,
        format!("must be within [0, 1], got {}", value),
    ))
}
