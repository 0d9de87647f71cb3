//! Errors raised while validating generation parameters.

use thiserror::Error;

/// Malformed configuration, rejected before any geometry is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{group} count must be at least 1")]
    EmptyGroup { group: &'static str },

    #[error("ornament count must be at least 2 to fill both layers, got {0}")]
    OrnamentSplit(usize),

    #[error("the star group holds exactly one particle, got {0}")]
    StarCount(usize),

    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must be a finite number no less than zero, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("ribbon rebuild interval must be at least 1 frame")]
    RebuildInterval,

    #[error("palette weights are invalid: {0}")]
    Palette(String),
}

/// Check that `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

/// Check that `value` is finite and not negative.
pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
