//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Home municipality name must not be empty")]
    EmptyHomeMunicipality,

    #[error("Default REINF code must not be empty")]
    EmptyReinfCode,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("History cap must be at least 1")]
    InvalidHistoryCap,
}
