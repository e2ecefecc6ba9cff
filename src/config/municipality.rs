//! Municipality configuration

use serde::Deserialize;

use super::error::ValidationError;

/// The withholding municipality and its reporting defaults
#[derive(Debug, Clone, Deserialize)]
pub struct MunicipalityConfig {
    /// Name of the municipality withholding at the source
    #[serde(default = "default_home_name")]
    pub home_name: String,

    /// REINF classification code applied when a document carries none
    #[serde(default = "default_reinf_code")]
    pub default_reinf_code: String,
}

impl MunicipalityConfig {
    /// Validate municipality configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.home_name.trim().is_empty() {
            return Err(ValidationError::EmptyHomeMunicipality);
        }
        if self.default_reinf_code.trim().is_empty() {
            return Err(ValidationError::EmptyReinfCode);
        }
        Ok(())
    }
}

impl Default for MunicipalityConfig {
    fn default() -> Self {
        Self {
            home_name: default_home_name(),
            default_reinf_code: default_reinf_code(),
        }
    }
}

fn default_home_name() -> String {
    "Senador Canedo".to_string()
}

fn default_reinf_code() -> String {
    "17099".to_string()
}
