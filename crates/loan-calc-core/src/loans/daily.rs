use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::loans::{
    checked_add, checked_div, checked_mul, percent, require_period, LoanModel, LoanProduct,
};
use crate::rounding::round_to_nearest_ten;
use crate::types::*;
use crate::validation::{positive_amount, positive_period, ValidationResult};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MONTHLY_RATE: Rate = dec!(0.10);

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLoanOutput {
    pub loan_amount: Money,
    pub days: u32,
    pub monthly_interest_rate: Rate,
    /// Monthly rate spread over a 30-day month.
    pub daily_interest_rate: Rate,
    pub monthly_interest: Money,
    pub daily_interest: Money,
    pub total_interest: Money,
    /// (principal + total interest) / days, before rounding.
    pub daily_installment: Money,
    pub rounded_daily_installment: Money,
    pub total_amount: Money,
}

impl DailyLoanOutput {
    pub fn summary(&self) -> InstallmentSummary {
        InstallmentSummary {
            installment: self.daily_installment,
            rounded_installment: self.rounded_daily_installment,
            total_interest: self.total_interest,
            total_amount: self.total_amount,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Amount and days are checked independently; each reports its own message.
pub fn validate(raw_amount: &str, raw_days: &str) -> ValidationResult {
    ValidationResult::from_fields(
        positive_amount(
            raw_amount,
            "Loan amount is required",
            "Please enter a valid loan amount",
        ),
        positive_period(
            raw_days,
            "Number of days is required",
            "Please enter a valid number of days",
        ),
    )
}

pub fn calculate(input: &LoanInput) -> LoanCalcResult<ComputationOutput<DailyLoanOutput>> {
    let start = Instant::now();
    require_period(input, "daily loan installment")?;

    let amount = input.amount;
    let days = Decimal::from(input.period);

    let ctx = "daily loan installment";
    let monthly_interest = checked_mul(amount, MONTHLY_RATE, ctx)?;
    let daily_interest = checked_div(monthly_interest, DAYS_PER_MONTH, ctx)?;
    // Same as daily_interest * days, but exact for whole months.
    let interest_days = checked_mul(monthly_interest, days, ctx)?;
    let total_interest = checked_div(interest_days, DAYS_PER_MONTH, ctx)?;
    let total_amount = checked_add(amount, total_interest, ctx)?;
    let daily_installment = checked_div(total_amount, days, ctx)?;

    let output = DailyLoanOutput {
        loan_amount: amount,
        days: input.period,
        monthly_interest_rate: MONTHLY_RATE,
        daily_interest_rate: MONTHLY_RATE / DAYS_PER_MONTH,
        monthly_interest,
        daily_interest,
        total_interest,
        daily_installment,
        rounded_daily_installment: round_to_nearest_ten(daily_installment),
        total_amount,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": MONTHLY_RATE.to_string(),
        "days_per_month": DAYS_PER_MONTH.to_string(),
        "rounding": "nearest 10, half up",
    });

    Ok(with_metadata(
        &format!(
            "Daily Loan: {}% monthly interest prorated per day over a 30-day month",
            percent(MONTHLY_RATE)
        ),
        assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Daily Loan as a [`LoanModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyLoan;

impl LoanModel for DailyLoan {
    type Output = DailyLoanOutput;

    fn product(&self) -> LoanProduct {
        LoanProduct::Daily
    }

    fn monthly_rate(&self) -> Rate {
        MONTHLY_RATE
    }

    fn period_unit(&self) -> PeriodUnit {
        PeriodUnit::Days
    }

    fn validate(&self, raw_amount: &str, raw_period: &str) -> ValidationResult {
        validate(raw_amount, raw_period)
    }

    fn calculate(&self, input: &LoanInput) -> LoanCalcResult<ComputationOutput<DailyLoanOutput>> {
        calculate(input)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ValidationErrorKind, AMOUNT_FIELD, PERIOD_FIELD};
    use rust_decimal_macros::dec;

    #[test]
    fn test_thirty_day_scenario() {
        let out = calculate(&LoanInput::new(dec!(10000), 30)).unwrap().result;
        assert_eq!(out.monthly_interest, dec!(1000));
        assert_eq!(out.total_interest, dec!(1000));
        assert!((out.daily_interest - dec!(33.33)).abs() < dec!(0.01));
        assert!((out.daily_installment - dec!(366.67)).abs() < dec!(0.01));
        assert_eq!(out.rounded_daily_installment, dec!(370));
        assert_eq!(out.total_amount, dec!(11000));
    }

    #[test]
    fn test_short_term_prorates_interest() {
        // 15 days is half a month: interest 500, installment 10500 / 15 = 700
        let out = calculate(&LoanInput::new(dec!(10000), 15)).unwrap().result;
        assert_eq!(out.total_interest, dec!(500));
        assert_eq!(out.daily_installment, dec!(700));
        assert_eq!(out.rounded_daily_installment, dec!(700));
    }

    #[test]
    fn test_total_is_principal_plus_interest() {
        let out = calculate(&LoanInput::new(dec!(7350.50), 47)).unwrap().result;
        assert_eq!(out.total_amount, out.loan_amount + out.total_interest);
    }

    #[test]
    fn test_validate_accepts() {
        let result = validate("10000", "30");
        assert!(result.valid);
        assert_eq!(result.normalized_input, Some(LoanInput::new(dec!(10000), 30)));
    }

    #[test]
    fn test_validate_fields_independently() {
        let result = validate("", "30");
        assert!(!result.valid);
        assert_eq!(result.message(AMOUNT_FIELD), Some("Loan amount is required"));
        assert!(result.error(PERIOD_FIELD).is_none());

        let result = validate("-5", "0");
        assert_eq!(
            result.message(AMOUNT_FIELD),
            Some("Please enter a valid loan amount")
        );
        assert_eq!(
            result.error(PERIOD_FIELD).unwrap().kind,
            ValidationErrorKind::InvalidNumber
        );
        assert_eq!(
            result.message(PERIOD_FIELD),
            Some("Please enter a valid number of days")
        );
    }

    #[test]
    fn test_validate_missing_days() {
        let result = validate("5000", " ");
        assert_eq!(result.message(PERIOD_FIELD), Some("Number of days is required"));
        assert_eq!(
            result.error(PERIOD_FIELD).unwrap().kind,
            ValidationErrorKind::MissingField
        );
    }

    #[test]
    fn test_metadata_populated() {
        let out = calculate(&LoanInput::new(dec!(10000), 30)).unwrap();
        assert!(out.methodology.contains("10%"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_overflowing_input_is_an_error() {
        let result = validate("1000000000000000000000000000", "4000000000");
        assert!(result.valid);
        let input = result.normalized_input.unwrap();
        let err = calculate(&input).unwrap_err();
        assert!(matches!(err, crate::error::LoanCalcError::Overflow { .. }), "{err:?}");
    }
}
