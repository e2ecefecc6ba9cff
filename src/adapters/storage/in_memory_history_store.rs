//! In-Memory History Store Adapter
//!
//! Keeps the serialized history under the fixed session key, exactly as
//! the browser-storage deployment does, so the corrupt-payload recovery
//! path is the same one production exercises. Useful for testing and for
//! single-process sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::invoice::CalculatedRecord;
use crate::ports::{HistoryStore, HistoryStoreError, HISTORY_CAP};

/// Fixed session-scoped key the history lives under.
pub const SESSION_HISTORY_KEY: &str = "retencao-fonte.historico";

/// In-memory storage for the record history.
#[derive(Debug, Clone)]
pub struct InMemoryHistoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    cap: usize,
}

impl InMemoryHistoryStore {
    /// Creates a store with the standard cap.
    pub fn new() -> Self {
        Self::with_cap(HISTORY_CAP)
    }

    /// Creates a store with a custom cap.
    pub fn with_cap(cap: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            cap: cap.max(1),
        }
    }

    /// Overwrites the raw stored payload (useful to simulate corruption
    /// in tests).
    pub async fn seed_raw(&self, raw: impl Into<String>) {
        self.entries
            .write()
            .await
            .insert(SESSION_HISTORY_KEY.to_string(), raw.into());
    }

    /// True when nothing is stored under the session key.
    pub async fn is_empty(&self) -> bool {
        !self
            .entries
            .read()
            .await
            .contains_key(SESSION_HISTORY_KEY)
    }

    async fn read_records(&self) -> Vec<CalculatedRecord> {
        let raw = self
            .entries
            .read()
            .await
            .get(SESSION_HISTORY_KEY)
            .cloned();

        let Some(raw) = raw else {
            return Vec::new();
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(error = %err, "history payload corrupt; clearing");
                self.entries.write().await.remove(SESSION_HISTORY_KEY);
                Vec::new()
            }
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn load(&self) -> Result<Vec<CalculatedRecord>, HistoryStoreError> {
        Ok(self.read_records().await)
    }

    async fn push(&self, record: &CalculatedRecord) -> Result<(), HistoryStoreError> {
        let mut records = self.read_records().await;
        records.insert(0, record.clone());
        records.truncate(self.cap);

        let raw = serde_json::to_string(&records)
            .map_err(|e| HistoryStoreError::serialization(e.to_string()))?;
        self.entries
            .write()
            .await
            .insert(SESSION_HISTORY_KEY.to_string(), raw);
        Ok(())
    }

    async fn clear(&self) -> Result<(), HistoryStoreError> {
        self.entries.write().await.remove(SESSION_HISTORY_KEY);
        Ok(())
    }
}
