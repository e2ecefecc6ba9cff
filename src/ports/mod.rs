//! Ports - interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `InvoiceExtractor` - the asynchronous document-to-facts extraction
//!   collaborator
//! - `HistoryStore` - session-scoped storage for the capped record history

mod history_store;
mod invoice_extractor;

pub use history_store::{HistoryStore, HistoryStoreError, HISTORY_CAP};
pub use invoice_extractor::{
    DocumentPayload, ExtractedFacts, ExtractionError, ExtractorInfo, InvoiceExtractor, RawNumber,
    DEFAULT_REINF_CODE,
};
