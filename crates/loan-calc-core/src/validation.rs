//! Raw-text validation shared by every loan product.
//!
//! Products receive the amount and period exactly as typed. Parsing never
//! fails loudly: every problem ends up as a [`FieldError`] inside a
//! [`ValidationResult`] keyed by the offending field.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::LoanCalcError;
use crate::types::{LoanInput, Money};
use crate::LoanCalcResult;

pub const AMOUNT_FIELD: &str = "amount";
pub const PERIOD_FIELD: &str = "period";
/// Key used by products that report a single combined failure.
pub const INPUT_FIELD: &str = "input";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Empty or absent required value.
    MissingField,
    /// Does not parse, or parses to a non-positive value.
    InvalidNumber,
    /// Parses fine but breaks a product rule.
    PolicyViolation,
    /// One generic rejection covering both fields.
    CombinedInputError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::MissingField, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::InvalidNumber, message)
    }

    pub fn policy(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::PolicyViolation, message)
    }
}

/// Outcome of validating one raw (amount, period) pair.
///
/// `valid` is true exactly when `field_errors` is empty, and only then is
/// `normalized_input` present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_input: Option<LoanInput>,
    pub field_errors: BTreeMap<String, FieldError>,
}

impl ValidationResult {
    pub fn accepted(input: LoanInput) -> Self {
        Self {
            valid: true,
            normalized_input: Some(input),
            field_errors: BTreeMap::new(),
        }
    }

    /// Merge independently validated fields into one result.
    pub fn from_fields(
        amount: Result<Money, FieldError>,
        period: Result<u32, FieldError>,
    ) -> Self {
        match (amount, period) {
            (Ok(amount), Ok(period)) => Self::accepted(LoanInput::new(amount, period)),
            (amount, period) => {
                let mut field_errors = BTreeMap::new();
                if let Err(e) = amount {
                    field_errors.insert(AMOUNT_FIELD.to_string(), e);
                }
                if let Err(e) = period {
                    field_errors.insert(PERIOD_FIELD.to_string(), e);
                }
                Self {
                    valid: false,
                    normalized_input: None,
                    field_errors,
                }
            }
        }
    }

    /// A single generic rejection under [`INPUT_FIELD`].
    pub fn combined(message: impl Into<String>) -> Self {
        let mut field_errors = BTreeMap::new();
        field_errors.insert(
            INPUT_FIELD.to_string(),
            FieldError::new(ValidationErrorKind::CombinedInputError, message),
        );
        Self {
            valid: false,
            normalized_input: None,
            field_errors,
        }
    }

    pub fn error(&self, field: &str) -> Option<&FieldError> {
        self.field_errors.get(field)
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.error(field).map(|e| e.message.as_str())
    }

    /// One-line description of every error, in field order.
    pub fn summary(&self) -> String {
        if self.field_errors.is_empty() {
            return "no errors".to_string();
        }
        self.field_errors
            .iter()
            .map(|(field, e)| format!("{field}: {}", e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// The normalized input, or the whole result as an error.
    pub fn into_input(self) -> LoanCalcResult<LoanInput> {
        match self.normalized_input {
            Some(input) if self.valid => Ok(input),
            _ => Err(LoanCalcError::ValidationFailed(self)),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw text parsing
// ---------------------------------------------------------------------------

/// What a raw text field turned out to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawNumber<T> {
    Missing,
    Unparseable,
    Parsed(T),
}

impl<T: Copy> RawNumber<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            RawNumber::Parsed(v) => Some(*v),
            _ => None,
        }
    }
}

pub fn read_decimal(raw: &str) -> RawNumber<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return RawNumber::Missing;
    }
    match Decimal::from_str(trimmed) {
        Ok(v) => RawNumber::Parsed(v),
        Err(_) => RawNumber::Unparseable,
    }
}

/// Period counts are whole numbers; "6.5" is unparseable rather than 6.
pub fn read_integer(raw: &str) -> RawNumber<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return RawNumber::Missing;
    }
    match trimmed.parse::<i64>() {
        Ok(v) => RawNumber::Parsed(v),
        Err(_) => RawNumber::Unparseable,
    }
}

/// Required amount that must be strictly positive.
pub fn positive_amount(raw: &str, missing: &str, invalid: &str) -> Result<Money, FieldError> {
    match read_decimal(raw) {
        RawNumber::Missing => Err(FieldError::missing(missing)),
        RawNumber::Parsed(v) if v > Decimal::ZERO => Ok(v),
        _ => Err(FieldError::invalid(invalid)),
    }
}

/// Required period that must be a strictly positive integer.
pub fn positive_period(raw: &str, missing: &str, invalid: &str) -> Result<u32, FieldError> {
    match read_integer(raw) {
        RawNumber::Missing => Err(FieldError::missing(missing)),
        RawNumber::Parsed(v) if v > 0 => {
            u32::try_from(v).map_err(|_| FieldError::invalid(invalid))
        }
        _ => Err(FieldError::invalid(invalid)),
    }
}

/// Both fields positive, or one generic failure that does not say which.
pub fn combined_positive(raw_amount: &str, raw_period: &str, message: &str) -> ValidationResult {
    match (
        positive_amount(raw_amount, message, message),
        positive_period(raw_period, message, message),
    ) {
        (Ok(amount), Ok(period)) => ValidationResult::accepted(LoanInput::new(amount, period)),
        _ => ValidationResult::combined(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_read_decimal_trims() {
        assert_eq!(read_decimal(" 10000.50 "), RawNumber::Parsed(dec!(10000.50)));
        assert_eq!(read_decimal("   "), RawNumber::Missing);
        assert_eq!(read_decimal("ten"), RawNumber::Unparseable);
    }

    #[test]
    fn test_read_integer_rejects_fraction() {
        assert_eq!(read_integer("18"), RawNumber::Parsed(18));
        assert_eq!(read_integer("6.5"), RawNumber::Unparseable);
    }

    #[test]
    fn test_positive_amount_kinds() {
        let missing = positive_amount("", "req", "bad").unwrap_err();
        assert_eq!(missing.kind, ValidationErrorKind::MissingField);
        let zero = positive_amount("0", "req", "bad").unwrap_err();
        assert_eq!(zero.kind, ValidationErrorKind::InvalidNumber);
        assert_eq!(zero.message, "bad");
    }

    #[test]
    fn test_positive_period_overflow_is_invalid() {
        let err = positive_period("99999999999", "req", "bad").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidNumber);
    }

    #[test]
    fn test_from_fields_keeps_both_errors() {
        let result = ValidationResult::from_fields(
            Err(FieldError::missing("amount missing")),
            Err(FieldError::invalid("period bad")),
        );
        assert!(!result.valid);
        assert_eq!(result.normalized_input, None);
        assert_eq!(result.message(AMOUNT_FIELD), Some("amount missing"));
        assert_eq!(result.message(PERIOD_FIELD), Some("period bad"));
        assert_eq!(result.summary(), "amount: amount missing; period: period bad");
    }

    #[test]
    fn test_combined_positive() {
        let ok = combined_positive("50000", "6", "bad input");
        assert!(ok.valid);
        assert_eq!(ok.normalized_input, Some(LoanInput::new(dec!(50000), 6)));

        let bad = combined_positive("50000", "0", "bad input");
        assert!(!bad.valid);
        assert_eq!(bad.field_errors.len(), 1);
        assert_eq!(bad.message(INPUT_FIELD), Some("bad input"));
        assert!(bad.error(PERIOD_FIELD).is_none());
    }

    #[test]
    fn test_into_input_on_failure_carries_result() {
        let result = ValidationResult::combined("nope");
        match result.into_input() {
            Err(LoanCalcError::ValidationFailed(r)) => {
                let err = r.error(INPUT_FIELD).unwrap();
                assert_eq!(err.kind, ValidationErrorKind::CombinedInputError);
            }
            other => panic!("Expected ValidationFailed, got {other:?}"),
        }
    }
}
