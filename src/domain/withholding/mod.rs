//! Withholding computation - the source-withholding rule engine.

mod assessment;
mod engine;
pub mod jurisdiction;

pub use assessment::{InssWithholding, WithholdingAssessment, WithholdingLine};
pub use engine::{WithholdingEngine, CSRF_COMBINED_RATE, DE_MINIMIS};
