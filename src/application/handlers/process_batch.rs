//! ProcessBatchHandler - sequential batch pipeline over source documents.
//!
//! Documents are processed strictly one at a time: each extraction call
//! is awaited to completion before the next document is even requested,
//! because fail-fast semantics and the single active-result pointer
//! require deterministic ordering. The first extraction or validation
//! failure aborts the remainder of the batch - no retry of the failed
//! document, no skipping ahead.

use std::sync::Arc;

use crate::domain::foundation::ValidationError;
use crate::domain::invoice::CalculatedRecord;
use crate::domain::withholding::WithholdingEngine;
use crate::ports::{
    DocumentPayload, ExtractionError, HistoryStore, HistoryStoreError, InvoiceExtractor,
};

/// Command to process an ordered batch of documents.
#[derive(Debug, Clone)]
pub struct ProcessBatchCommand {
    /// Encoded source documents, in processing order.
    pub documents: Vec<DocumentPayload>,
}

/// Position report emitted before each document is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based index of the document about to be processed.
    pub current_index: usize,
    /// Total number of documents in the batch.
    pub total: usize,
}

/// Observer for batch progress - the pipeline's only side channel
/// besides its terminal result.
pub trait BatchObserver: Send + Sync {
    /// Called before each document is processed.
    fn on_document_started(&self, progress: BatchProgress);
}

impl<F> BatchObserver for F
where
    F: Fn(BatchProgress) + Send + Sync,
{
    fn on_document_started(&self, progress: BatchProgress) {
        self(progress)
    }
}

/// Observer that ignores every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {
    fn on_document_started(&self, _progress: BatchProgress) {}
}

/// Result of a fully successful batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// The committed records, in processing order.
    pub records: Vec<CalculatedRecord>,
}

impl BatchOutcome {
    /// The active result: the record committed last.
    pub fn active(&self) -> &CalculatedRecord {
        self.records
            .last()
            .expect("a successful batch commits at least one record")
    }
}

/// Error type for batch processing. Document-scoped failures identify
/// the triggering document by position and label.
#[derive(Debug)]
pub enum BatchError {
    /// The batch contained no documents.
    EmptyBatch,
    /// Extraction failed for a document.
    Extraction {
        index: usize,
        label: String,
        source: ExtractionError,
    },
    /// A document's extracted gross amount failed validation.
    InvalidDocument {
        index: usize,
        label: String,
        source: ValidationError,
    },
    /// The history store rejected a commit.
    History {
        index: usize,
        label: String,
        source: HistoryStoreError,
    },
}

impl BatchError {
    /// True when the failure is the credential rejection the key-reset
    /// flow reacts to.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            BatchError::Extraction { source, .. } if source.is_authentication()
        )
    }
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::EmptyBatch => write!(f, "no documents to process"),
            BatchError::Extraction { index, label, source } => {
                write!(f, "document {} ({}): {}", index, label, source)
            }
            BatchError::InvalidDocument { index, label, source } => {
                write!(f, "document {} ({}): {}", index, label, source)
            }
            BatchError::History { index, label, source } => {
                write!(f, "document {} ({}): {}", index, label, source)
            }
        }
    }
}

impl std::error::Error for BatchError {}

/// Handler driving the batch pipeline.
pub struct ProcessBatchHandler {
    extractor: Arc<dyn InvoiceExtractor>,
    history: Arc<dyn HistoryStore>,
    engine: WithholdingEngine,
    default_reinf: String,
}

impl ProcessBatchHandler {
    pub fn new(
        extractor: Arc<dyn InvoiceExtractor>,
        history: Arc<dyn HistoryStore>,
        engine: WithholdingEngine,
        default_reinf: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            history,
            engine,
            default_reinf: default_reinf.into(),
        }
    }

    /// Processes the batch, committing each successful record to the
    /// history. The last committed record is the active result.
    pub async fn handle(
        &self,
        cmd: ProcessBatchCommand,
        observer: &dyn BatchObserver,
    ) -> Result<BatchOutcome, BatchError> {
        if cmd.documents.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        let total = cmd.documents.len();
        let mut records = Vec::with_capacity(total);

        for (position, document) in cmd.documents.iter().enumerate() {
            let index = position + 1;
            observer.on_document_started(BatchProgress {
                current_index: index,
                total,
            });
            tracing::info!(index, total, label = %document.label, "processing document");

            // 1. Await extraction; a failure here aborts the whole batch.
            let extracted =
                self.extractor
                    .extract(document)
                    .await
                    .map_err(|source| BatchError::Extraction {
                        index,
                        label: document.label.clone(),
                        source,
                    })?;

            // 2. Validate the gross amount before the engine runs.
            let facts = extracted
                .to_invoice_facts(&self.default_reinf)
                .map_err(|source| BatchError::InvalidDocument {
                    index,
                    label: document.label.clone(),
                    source,
                })?;

            // 3. Compute and commit under a fresh identity.
            let assessment = self.engine.compute(&facts);
            let record = CalculatedRecord::create(&facts, assessment);

            self.history
                .push(&record)
                .await
                .map_err(|source| BatchError::History {
                    index,
                    label: document.label.clone(),
                    source,
                })?;

            tracing::info!(index, record_id = %record.id(), "record committed");
            records.push(record);
        }

        Ok(BatchOutcome { records })
    }
}
