//! Extraction adapters - implementations of the `InvoiceExtractor` port.

mod gemini_extractor;
mod mock_extractor;

pub use gemini_extractor::{GeminiConfig, GeminiExtractor};
pub use mock_extractor::{MockExtractionError, MockExtractor};
