//! Extraction service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the document-to-facts extraction collaborator
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Extraction provider to use
    #[serde(default)]
    pub provider: ExtractionProvider,

    /// Model identifier sent to the service
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Extraction provider type
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionProvider {
    #[default]
    Gemini,
    /// Scripted mock, for tests and offline demos
    Mock,
}

impl ExtractionConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a usable Gemini key is present
    pub fn configured(&self) -> bool {
        self.gemini_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate extraction configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == ExtractionProvider::Gemini && !self.configured() {
            return Err(ValidationError::MissingRequired("GEMINI_API_KEY"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            provider: ExtractionProvider::default(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    60
}
