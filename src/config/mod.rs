//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `RETENCAO` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use retencao_fonte::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Withholding for {}", config.municipality.home_name);
//! ```

mod error;
mod extraction;
mod features;
mod history;
mod municipality;

pub use error::{ConfigError, ValidationError};
pub use extraction::{ExtractionConfig, ExtractionProvider};
pub use features::FeatureFlags;
pub use history::HistoryConfig;
pub use municipality::MunicipalityConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the withholding engine. Load
/// using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Extraction service configuration (Gemini API)
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Withholding municipality and reporting defaults
    #[serde(default)]
    pub municipality: MunicipalityConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,

    /// Record history storage
    #[serde(default)]
    pub history: HistoryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RETENCAO` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `RETENCAO__EXTRACTION__GEMINI_API_KEY=...` -> `extraction.gemini_api_key`
    /// - `RETENCAO__MUNICIPALITY__HOME_NAME=...` -> `municipality.home_name`
    /// - `RETENCAO__FEATURES__ENABLE_CSRF=true` -> `features.enable_csrf`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RETENCAO")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.extraction.validate()?;
        self.municipality.validate()?;
        self.history.validate()?;
        Ok(())
    }
}
