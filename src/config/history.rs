//! History storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Configuration for the session-scoped record history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of records retained
    #[serde(default = "default_cap")]
    pub cap: usize,

    /// File path for the file-backed store; in-memory when absent
    pub file_path: Option<PathBuf>,
}

impl HistoryConfig {
    /// Validate history configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cap == 0 {
            return Err(ValidationError::InvalidHistoryCap);
        }
        Ok(())
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            cap: default_cap(),
            file_path: None,
        }
    }
}

fn default_cap() -> usize {
    10
}
