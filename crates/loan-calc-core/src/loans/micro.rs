//! Micro Loan: weekly installments with tiered eligibility.
//!
//! Eligibility couples the two fields:
//!
//! | Amount (LKR)                   | Allowed weeks |
//! |--------------------------------|---------------|
//! | below 10,000                   | not eligible  |
//! | exactly 10,000                 | 18            |
//! | above 10,000, multiple of 5,000 | 18 or 26      |
//! | above 10,000, otherwise        | not eligible  |
//!
//! Interest is charged at 8% per month on the full principal, with a month
//! taken as exactly 4 weeks.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::loans::{
    checked_add, checked_div, checked_mul, percent, require_period, LoanModel, LoanProduct,
};
use crate::rounding::round_to_nearest_ten;
use crate::types::*;
use crate::validation::{read_decimal, read_integer, FieldError, RawNumber, ValidationResult};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MONTHLY_RATE: Rate = dec!(0.08);
pub const MINIMUM_AMOUNT: Money = dec!(10000);
pub const AMOUNT_STEP: Money = dec!(5000);
/// Period forced for the minimum amount and defaulted for larger ones.
pub const DEFAULT_WEEKS: u32 = 18;
pub const ALLOWED_WEEKS: [u32; 2] = [18, 26];

const CURRENCY: &str = "LKR";

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroLoanOutput {
    pub loan_amount: Money,
    pub weeks: u32,
    pub monthly_interest_rate: Rate,
    pub monthly_interest: Money,
    pub weekly_interest: Money,
    /// weeks / 4, may be fractional (26 weeks = 6.5 months).
    pub total_months: Decimal,
    pub total_interest: Money,
    pub weekly_installment: Money,
    pub rounded_weekly_installment: Money,
    pub total_amount: Money,
}

impl MicroLoanOutput {
    pub fn summary(&self) -> InstallmentSummary {
        InstallmentSummary {
            installment: self.weekly_installment,
            rounded_installment: self.rounded_weekly_installment,
            total_interest: self.total_interest,
            total_amount: self.total_amount,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate amount, then weeks against whatever number the amount parsed to.
///
/// An exact LKR 10,000 with no period selected is normalized to 18 weeks.
pub fn validate(raw_amount: &str, raw_weeks: &str) -> ValidationResult {
    let parsed_amount = read_decimal(raw_amount);
    ValidationResult::from_fields(
        check_amount(parsed_amount),
        check_weeks(raw_weeks, parsed_amount.value()),
    )
}

fn check_amount(parsed: RawNumber<Decimal>) -> Result<Money, FieldError> {
    let amount = match parsed {
        RawNumber::Missing => return Err(FieldError::missing("Loan amount is required")),
        RawNumber::Parsed(a) if a > Decimal::ZERO => a,
        _ => return Err(FieldError::invalid("Please enter a valid loan amount")),
    };

    if amount < MINIMUM_AMOUNT {
        return Err(FieldError::policy(format!(
            "Loan amount must be at least {}",
            format_currency(MINIMUM_AMOUNT)
        )));
    }
    if amount == MINIMUM_AMOUNT || is_step_multiple(amount) {
        return Ok(amount);
    }

    let lower = (amount / AMOUNT_STEP).floor() * AMOUNT_STEP;
    // The next step up does not exist for amounts near Decimal::MAX.
    let higher = (amount / AMOUNT_STEP).ceil().checked_mul(AMOUNT_STEP);
    let suggestion = match higher {
        Some(higher) if lower >= MINIMUM_AMOUNT => format!(
            "Try {} or {}",
            format_currency(lower),
            format_currency(higher)
        ),
        Some(higher) => format!("Try {}", format_currency(higher)),
        None => format!("Try {}", format_currency(lower)),
    };
    Err(FieldError::policy(format!(
        "Loan amount must be a multiple of {} ({suggestion})",
        format_currency(AMOUNT_STEP)
    )))
}

/// `amount` is the parsed number, valid or not; `None` skips the
/// amount-dependent rules.
fn check_weeks(raw_weeks: &str, amount: Option<Money>) -> Result<u32, FieldError> {
    let weeks = match read_integer(raw_weeks) {
        RawNumber::Missing if amount == Some(MINIMUM_AMOUNT) => return Ok(DEFAULT_WEEKS),
        RawNumber::Missing => return Err(FieldError::missing("Please select a loan period")),
        RawNumber::Parsed(w) if w > 0 => u32::try_from(w)
            .map_err(|_| FieldError::invalid("Please select a valid loan period"))?,
        _ => return Err(FieldError::invalid("Please select a valid loan period")),
    };

    match amount {
        Some(a) if a == MINIMUM_AMOUNT && weeks != DEFAULT_WEEKS => {
            Err(FieldError::policy(format!(
                "Loan amount of {} is fixed to {DEFAULT_WEEKS} weeks period",
                format_currency(MINIMUM_AMOUNT)
            )))
        }
        Some(a) if a > MINIMUM_AMOUNT && !ALLOWED_WEEKS.contains(&weeks) => Err(FieldError::policy(
            "Loan period must be either 18 or 26 weeks",
        )),
        _ => Ok(weeks),
    }
}

fn is_step_multiple(amount: Money) -> bool {
    (amount % AMOUNT_STEP).is_zero()
}

/// Period a form should show after the amount changes.
///
/// The minimum amount forces 18 weeks; an eligible larger amount keeps the
/// current choice or defaults to 18; anything else clears the choice.
pub fn suggest_period(amount: Money, current: Option<u32>) -> Option<u32> {
    if amount == MINIMUM_AMOUNT {
        Some(DEFAULT_WEEKS)
    } else if amount > MINIMUM_AMOUNT && is_step_multiple(amount) {
        current.or(Some(DEFAULT_WEEKS))
    } else {
        None
    }
}

/// Like [`suggest_period`], but text that is not a number leaves the current
/// choice untouched.
pub fn suggest_period_for_text(raw_amount: &str, current: Option<u32>) -> Option<u32> {
    match read_decimal(raw_amount) {
        RawNumber::Parsed(amount) => suggest_period(amount, current),
        _ => current,
    }
}

/// "LKR 15,000" style amount for messages.
fn format_currency(amount: Money) -> String {
    let amount = amount.normalize();
    let text = amount.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(f) = fraction {
        grouped.push('.');
        grouped.push_str(f);
    }
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    format!("{CURRENCY} {sign}{grouped}")
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

pub fn calculate(input: &LoanInput) -> LoanCalcResult<ComputationOutput<MicroLoanOutput>> {
    let start = Instant::now();
    require_period(input, "micro loan installment")?;

    let amount = input.amount;
    let weeks = Decimal::from(input.period);

    let ctx = "micro loan installment";
    let monthly_interest = checked_mul(amount, MONTHLY_RATE, ctx)?;
    let weekly_interest = checked_div(monthly_interest, WEEKS_PER_MONTH, ctx)?;
    let total_months = PeriodUnit::Weeks.months_equivalent(input.period);
    let total_interest = checked_mul(monthly_interest, total_months, ctx)?;
    let total_amount = checked_add(amount, total_interest, ctx)?;
    let weekly_installment = checked_div(total_amount, weeks, ctx)?;

    let output = MicroLoanOutput {
        loan_amount: amount,
        weeks: input.period,
        monthly_interest_rate: MONTHLY_RATE,
        monthly_interest,
        weekly_interest,
        total_months,
        total_interest,
        weekly_installment,
        rounded_weekly_installment: round_to_nearest_ten(weekly_installment),
        total_amount,
    };

    let mut warnings = Vec::new();
    if !ALLOWED_WEEKS.contains(&input.period) {
        warnings.push(format!(
            "{} weeks is outside the offered terms (18 or 26 weeks)",
            input.period
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": MONTHLY_RATE.to_string(),
        "weeks_per_month": WEEKS_PER_MONTH.to_string(),
        "rounding": "nearest 10, half up",
    });

    Ok(with_metadata(
        &format!(
            "Micro Loan: {}% monthly interest on full principal, 4-week months, weekly installments",
            percent(MONTHLY_RATE)
        ),
        assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Micro Loan as a [`LoanModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLoan;

impl LoanModel for MicroLoan {
    type Output = MicroLoanOutput;

    fn product(&self) -> LoanProduct {
        LoanProduct::Micro
    }

    fn monthly_rate(&self) -> Rate {
        MONTHLY_RATE
    }

    fn period_unit(&self) -> PeriodUnit {
        PeriodUnit::Weeks
    }

    fn validate(&self, raw_amount: &str, raw_period: &str) -> ValidationResult {
        validate(raw_amount, raw_period)
    }

    fn calculate(&self, input: &LoanInput) -> LoanCalcResult<ComputationOutput<MicroLoanOutput>> {
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
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_twenty_six_week_scenario() {
        let out = calculate(&LoanInput::new(dec!(20000), 26)).unwrap().result;
        assert_eq!(out.monthly_interest, dec!(1600));
        assert_eq!(out.weekly_interest, dec!(400));
        assert_eq!(out.total_months, dec!(6.5));
        assert_eq!(out.total_interest, dec!(10400));
        assert!((out.weekly_installment - dec!(1169.23)).abs() < dec!(0.01));
        assert_eq!(out.rounded_weekly_installment, dec!(1170));
        assert_eq!(out.total_amount, dec!(30400));
    }

    #[test]
    fn test_minimum_loan_eighteen_weeks() {
        // 10000 * 0.08 * 4.5 = 3600; 13600 / 18 = 755.55.. -> 760
        let out = calculate(&LoanInput::new(dec!(10000), 18)).unwrap();
        assert_eq!(out.result.total_interest, dec!(3600));
        assert_eq!(out.result.rounded_weekly_installment, dec!(760));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_off_menu_weeks_warns() {
        let out = calculate(&LoanInput::new(dec!(15000), 20)).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_below_minimum_rejected() {
        let result = validate("9999", "18");
        assert!(!result.valid);
        let err = result.error(AMOUNT_FIELD).unwrap();
        assert_eq!(err.kind, ValidationErrorKind::PolicyViolation);
        assert_eq!(err.message, "Loan amount must be at least LKR 10,000");
    }

    #[test]
    fn test_minimum_accepted() {
        let result = validate("10000", "18");
        assert!(result.valid);
        assert_eq!(result.normalized_input, Some(LoanInput::new(dec!(10000), 18)));
    }

    #[test]
    fn test_minimum_without_period_normalizes_to_eighteen() {
        let result = validate("10000", "");
        assert!(result.valid);
        assert_eq!(result.normalized_input.unwrap().period, 18);
    }

    #[test]
    fn test_minimum_fixed_to_eighteen() {
        let result = validate("10000", "26");
        assert!(!result.valid);
        assert!(result.error(AMOUNT_FIELD).is_none());
        assert_eq!(
            result.message(PERIOD_FIELD),
            Some("Loan amount of LKR 10,000 is fixed to 18 weeks period")
        );
    }

    #[test]
    fn test_non_multiple_suggests_both_neighbours() {
        let result = validate("12000", "18");
        let msg = result.message(AMOUNT_FIELD).unwrap();
        assert_eq!(
            msg,
            "Loan amount must be a multiple of LKR 5,000 (Try LKR 10,000 or LKR 15,000)"
        );
        assert!(msg.contains("10,000") && msg.contains("15,000"));
    }

    #[test]
    fn test_fractional_amount_suggestion() {
        let result = validate("10000.50", "18");
        assert_eq!(
            result.message(AMOUNT_FIELD),
            Some("Loan amount must be a multiple of LKR 5,000 (Try LKR 10,000 or LKR 15,000)")
        );
    }

    #[test]
    fn test_large_amount_grouping() {
        let result = validate("1234567", "26");
        assert_eq!(
            result.message(AMOUNT_FIELD),
            Some("Loan amount must be a multiple of LKR 5,000 (Try LKR 1,230,000 or LKR 1,235,000)")
        );
    }

    #[test]
    fn test_multiple_accepts_offered_periods_only() {
        assert!(validate("15000", "18").valid);
        assert!(validate("15000", "26").valid);
        let result = validate("15000", "20");
        assert!(!result.valid);
        assert_eq!(
            result.message(PERIOD_FIELD),
            Some("Loan period must be either 18 or 26 weeks")
        );
    }

    #[test]
    fn test_period_rule_still_applies_to_rejected_amount() {
        // 12000 is a number above the minimum, so the 18/26 rule applies
        let result = validate("12000", "20");
        assert!(result.error(AMOUNT_FIELD).is_some());
        assert_eq!(
            result.message(PERIOD_FIELD),
            Some("Loan period must be either 18 or 26 weeks")
        );
    }

    #[test]
    fn test_unparseable_amount_skips_period_rules() {
        let result = validate("lots", "20");
        assert_eq!(
            result.message(AMOUNT_FIELD),
            Some("Please enter a valid loan amount")
        );
        assert!(result.error(PERIOD_FIELD).is_none());
    }

    #[test]
    fn test_missing_fields() {
        let result = validate("", "");
        assert_eq!(result.message(AMOUNT_FIELD), Some("Loan amount is required"));
        assert_eq!(result.message(PERIOD_FIELD), Some("Please select a loan period"));
        let result = validate("15000", "");
        assert_eq!(
            result.error(PERIOD_FIELD).unwrap().kind,
            ValidationErrorKind::MissingField
        );
    }

    #[test]
    fn test_suggest_period() {
        assert_eq!(suggest_period(dec!(10000), None), Some(18));
        assert_eq!(suggest_period(dec!(10000), Some(26)), Some(18));
        assert_eq!(suggest_period(dec!(15000), None), Some(18));
        assert_eq!(suggest_period(dec!(15000), Some(26)), Some(26));
        assert_eq!(suggest_period(dec!(9999), Some(18)), None);
        assert_eq!(suggest_period(dec!(12000), Some(18)), None);
    }

    #[test]
    fn test_suggest_period_for_text() {
        assert_eq!(suggest_period_for_text("9999", Some(18)), None);
        assert_eq!(suggest_period_for_text("", Some(26)), Some(26));
        assert_eq!(suggest_period_for_text("abc", None), None);
        assert_eq!(suggest_period_for_text(" 20000 ", None), Some(18));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(5000)), "LKR 5,000");
        assert_eq!(format_currency(dec!(100)), "LKR 100");
        assert_eq!(format_currency(dec!(1234567.50)), "LKR 1,234,567.5");
    }

    #[test]
    fn test_overflowing_input_is_an_error() {
        let result = validate("79228162514264337593543950000", "26");
        assert!(result.valid);
        let err = calculate(&result.normalized_input.unwrap()).unwrap_err();
        assert!(matches!(err, crate::error::LoanCalcError::Overflow { .. }), "{err:?}");
    }

    #[test]
    fn test_largest_amount_gets_a_lower_suggestion_only() {
        let result = validate("79228162514264337593543950335", "18");
        let msg = result.message(AMOUNT_FIELD).unwrap();
        assert!(msg.starts_with("Loan amount must be a multiple of LKR 5,000"), "{msg}");
        assert!(msg.contains("(Try LKR 79,228,162,514,264,337,593,543,950,000)"), "{msg}");
    }
}
