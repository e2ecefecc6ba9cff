//! File-based History Store Adapter
//!
//! Persists the history as a single JSON file, for desktop deployments
//! where the session outlives the process. A corrupt file is removed on
//! read and the history restarts empty, mirroring the in-memory adapter.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::invoice::CalculatedRecord;
use crate::ports::{HistoryStore, HistoryStoreError, HISTORY_CAP};

/// File-backed storage for the record history.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
    cap: usize,
}

impl FileHistoryStore {
    /// Creates a store writing to the given file path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_cap(path, HISTORY_CAP)
    }

    /// Creates a store with a custom cap.
    pub fn with_cap<P: AsRef<Path>>(path: P, cap: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cap: cap.max(1),
        }
    }

    async fn read_records(&self) -> Result<Vec<CalculatedRecord>, HistoryStoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(HistoryStoreError::storage(err.to_string())),
        };

        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "history file corrupt; clearing"
                );
                self.remove_file().await?;
                Ok(Vec::new())
            }
        }
    }

    async fn remove_file(&self) -> Result<(), HistoryStoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(HistoryStoreError::storage(err.to_string())),
        }
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn load(&self) -> Result<Vec<CalculatedRecord>, HistoryStoreError> {
        self.read_records().await
    }

    async fn push(&self, record: &CalculatedRecord) -> Result<(), HistoryStoreError> {
        let mut records = self.read_records().await?;
        records.insert(0, record.clone());
        records.truncate(self.cap);

        let raw = serde_json::to_string_pretty(&records)
            .map_err(|e| HistoryStoreError::serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| HistoryStoreError::storage(e.to_string()))?;
        }
        fs::write(&self.path, raw)
            .await
            .map_err(|e| HistoryStoreError::storage(e.to_string()))
    }

    async fn clear(&self) -> Result<(), HistoryStoreError> {
        self.remove_file().await
    }
}
