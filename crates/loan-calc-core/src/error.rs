use thiserror::Error;

use crate::validation::ValidationResult;

#[derive(Debug, Error)]
pub enum LoanCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Validation failed: {}", .0.summary())]
    ValidationFailed(ValidationResult),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
