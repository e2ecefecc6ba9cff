//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur while validating raw invoice input.
///
/// Raised before the withholding engine runs; the engine itself never
/// fails. Every variant identifies the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is missing")]
    MissingField { field: String },

    #[error("Field '{field}' is not a number: '{raw}'")]
    NotANumber { field: String, raw: String },

    #[error("Field '{field}' must not be negative, got {actual}")]
    NegativeAmount { field: String, actual: String },
}

impl ValidationError {
    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        ValidationError::MissingField {
            field: field.into(),
        }
    }

    /// Creates a non-numeric field error.
    pub fn not_a_number(field: impl Into<String>, raw: impl Into<String>) -> Self {
        ValidationError::NotANumber {
            field: field.into(),
            raw: raw.into(),
        }
    }

    /// Creates a negative amount error.
    pub fn negative_amount(field: impl Into<String>, actual: impl Into<String>) -> Self {
        ValidationError::NegativeAmount {
            field: field.into(),
            actual: actual.into(),
        }
    }

    /// Name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field } => field,
            ValidationError::NotANumber { field, .. } => field,
            ValidationError::NegativeAmount { field, .. } => field,
        }
    }
}
