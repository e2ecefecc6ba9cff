//! Mock Extractor for testing.
//!
//! Configurable implementation of the `InvoiceExtractor` port that
//! returns scripted results, so handler and pipeline tests run without
//! any real extraction service.
//!
//! # Example
//!
//! ```ignore
//! let extractor = MockExtractor::new()
//!     .with_facts(facts_for_document_one)
//!     .with_error(MockExtractionError::AuthenticationFailed);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    DocumentPayload, ExtractedFacts, ExtractionError, ExtractorInfo, InvoiceExtractor,
};

/// Scripted extraction outcome.
#[derive(Debug, Clone)]
enum MockExtraction {
    Success(ExtractedFacts),
    Error(MockExtractionError),
}

/// Mock error types for exercising failure handling.
#[derive(Debug, Clone)]
pub enum MockExtractionError {
    /// Simulate a rejected API key.
    AuthenticationFailed,
    /// Simulate a permission problem.
    PermissionDenied,
    /// Simulate an unavailable service.
    Unavailable { message: String },
    /// Simulate a network failure.
    Network { message: String },
    /// Simulate an unparseable answer.
    Parse { message: String },
    /// Simulate a timeout.
    Timeout { timeout_secs: u32 },
    /// Simulate an empty answer.
    EmptyResponse,
}

impl From<MockExtractionError> for ExtractionError {
    fn from(err: MockExtractionError) -> Self {
        match err {
            MockExtractionError::AuthenticationFailed => ExtractionError::AuthenticationFailed,
            MockExtractionError::PermissionDenied => ExtractionError::PermissionDenied,
            MockExtractionError::Unavailable { message } => ExtractionError::unavailable(message),
            MockExtractionError::Network { message } => ExtractionError::network(message),
            MockExtractionError::Parse { message } => ExtractionError::parse(message),
            MockExtractionError::Timeout { timeout_secs } => {
                ExtractionError::Timeout { timeout_secs }
            }
            MockExtractionError::EmptyResponse => ExtractionError::EmptyResponse,
        }
    }
}

/// Mock extraction adapter.
///
/// Results are consumed in order; an exhausted script fails the call.
/// Every received payload is recorded for verification.
#[derive(Debug, Clone, Default)]
pub struct MockExtractor {
    responses: Arc<Mutex<VecDeque<MockExtraction>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<DocumentPayload>>>,
}

impl MockExtractor {
    /// Creates a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful extraction.
    pub fn with_facts(self, facts: ExtractedFacts) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockExtraction::Success(facts));
        self
    }

    /// Queues an extraction failure.
    pub fn with_error(self, error: MockExtractionError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockExtraction::Error(error));
        self
    }

    /// Adds an artificial latency to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Payloads received so far, in call order.
    pub fn calls(&self) -> Vec<DocumentPayload> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of extraction calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl InvoiceExtractor for MockExtractor {
    async fn extract(
        &self,
        document: &DocumentPayload,
    ) -> Result<ExtractedFacts, ExtractionError> {
        self.calls.lock().unwrap().push(document.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(MockExtraction::Success(facts)) => Ok(facts),
            Some(MockExtraction::Error(err)) => Err(err.into()),
            None => Err(ExtractionError::unavailable(
                "no scripted extraction result",
            )),
        }
    }

    fn extractor_info(&self) -> ExtractorInfo {
        ExtractorInfo::new("mock", "scripted")
    }
}
