//! History Store Port - session-scoped storage for calculated records.
//!
//! The history is a newest-first list capped at [`HISTORY_CAP`] entries,
//! kept under a single fixed session-scoped key. Records enter it only
//! when they are created (single analysis, manual entry, or a batch
//! commit) - never on recalculation - and leave it only when the operator
//! clears the history or the session ends.

use async_trait::async_trait;

use crate::domain::invoice::CalculatedRecord;

/// Maximum number of records the history retains.
pub const HISTORY_CAP: usize = 10;

/// Port for the session-scoped record history.
///
/// Implementations own the cap and ordering: `push` prepends and
/// truncates, `load` returns newest first. A corrupt underlying payload
/// is not an error the caller sees - implementations clear the store and
/// return an empty history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Loads the full history, newest first.
    async fn load(&self) -> Result<Vec<CalculatedRecord>, HistoryStoreError>;

    /// Prepends a record, dropping the oldest entries beyond the cap.
    async fn push(&self, record: &CalculatedRecord) -> Result<(), HistoryStoreError>;

    /// Removes every stored record.
    async fn clear(&self) -> Result<(), HistoryStoreError>;
}

/// History storage errors.
#[derive(Debug, thiserror::Error)]
pub enum HistoryStoreError {
    /// A record could not be serialized for storage.
    #[error("failed to serialize history: {0}")]
    Serialization(String),

    /// The underlying storage failed.
    #[error("history storage error: {0}")]
    Storage(String),
}

impl HistoryStoreError {
    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}
