//! ManualEntryHandler - operator-keyed invoices without extraction.
//!
//! The single-document flow for invoices the extraction service cannot
//! read (handwritten receipts, unsupported layouts): the operator keys
//! the raw facts, which then follow exactly the same validate, compute
//! and commit path a batch document takes.

use std::sync::Arc;

use crate::domain::foundation::ValidationError;
use crate::domain::invoice::CalculatedRecord;
use crate::domain::withholding::WithholdingEngine;
use crate::ports::{ExtractedFacts, HistoryStore, HistoryStoreError};

/// Command carrying the operator-keyed raw facts.
#[derive(Debug, Clone)]
pub struct ManualEntryCommand {
    pub facts: ExtractedFacts,
}

/// Errors for the manual entry flow.
#[derive(Debug, thiserror::Error)]
pub enum ManualEntryError {
    /// The keyed gross amount is missing, non-numeric or negative.
    #[error("invalid manual entry: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The history store rejected the commit.
    #[error("failed to commit manual entry: {0}")]
    History(#[from] HistoryStoreError),
}

/// Handler turning keyed facts into a committed record.
pub struct ManualEntryHandler {
    history: Arc<dyn HistoryStore>,
    engine: WithholdingEngine,
    default_reinf: String,
}

impl ManualEntryHandler {
    pub fn new(
        history: Arc<dyn HistoryStore>,
        engine: WithholdingEngine,
        default_reinf: impl Into<String>,
    ) -> Self {
        Self {
            history,
            engine,
            default_reinf: default_reinf.into(),
        }
    }

    /// Validates the keyed facts, computes the withholdings, commits the
    /// record to the history and returns it as the active result.
    pub async fn handle(
        &self,
        cmd: ManualEntryCommand,
    ) -> Result<CalculatedRecord, ManualEntryError> {
        let facts = cmd
            .facts
            .with_fallbacks()
            .to_invoice_facts(&self.default_reinf)?;

        let assessment = self.engine.compute(&facts);
        let record = CalculatedRecord::create(&facts, assessment);

        self.history.push(&record).await?;
        tracing::info!(record_id = %record.id(), numero_nf = %record.numero_nf(), "manual entry committed");

        Ok(record)
    }
}
