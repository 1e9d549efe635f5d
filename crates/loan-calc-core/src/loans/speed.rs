//! Speed Loan: flat interest on configurable terms.
//!
//! The product's rate and period unit are not fixed business constants like
//! the other four; they come from [`SpeedLoanTerms`]. The arithmetic follows
//! the flat-rate family: interest for the whole term is charged on the full
//! principal and the total is spread evenly over the periods.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanCalcError;
use crate::loans::{
    checked_add, checked_div, checked_mul, percent, require_period, LoanModel, LoanProduct,
};
use crate::rounding::round_to_nearest_ten;
use crate::types::*;
use crate::validation::{positive_amount, positive_period, ValidationResult};
use crate::LoanCalcResult;

pub const DEFAULT_MONTHLY_RATE: Rate = dec!(0.10);

/// Configurable terms for the Speed Loan product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedLoanTerms {
    pub monthly_rate: Rate,
    pub period_unit: PeriodUnit,
}

impl Default for SpeedLoanTerms {
    fn default() -> Self {
        Self {
            monthly_rate: DEFAULT_MONTHLY_RATE,
            period_unit: PeriodUnit::Months,
        }
    }
}

impl SpeedLoanTerms {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Rates must be a positive fraction below 100% per month.
    pub fn check(&self) -> LoanCalcResult<()> {
        if self.monthly_rate <= Decimal::ZERO || self.monthly_rate >= Decimal::ONE {
            return Err(LoanCalcError::Configuration(format!(
                "speed.monthly_rate must be between 0 and 1 (exclusive), got {}",
                self.monthly_rate
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedLoanOutput {
    pub loan_amount: Money,
    pub period: u32,
    pub period_unit: PeriodUnit,
    pub monthly_interest_rate: Rate,
    /// Term length converted to months (30-day months, 4-week months).
    pub term_months: Decimal,
    pub total_interest: Money,
    pub principal_per_period: Money,
    pub interest_per_period: Money,
    pub installment: Money,
    pub rounded_installment: Money,
    pub total_amount: Money,
}

impl SpeedLoanOutput {
    pub fn summary(&self) -> InstallmentSummary {
        InstallmentSummary {
            installment: self.installment,
            rounded_installment: self.rounded_installment,
            total_interest: self.total_interest,
            total_amount: self.total_amount,
        }
    }
}

/// Speed Loan bound to a set of terms.
#[derive(Debug, Clone, Default)]
pub struct SpeedLoan {
    terms: SpeedLoanTerms,
}

impl SpeedLoan {
    pub fn new(terms: SpeedLoanTerms) -> Self {
        Self { terms }
    }

    /// Per-field messages, worded in the configured period unit.
    pub fn validate(&self, raw_amount: &str, raw_period: &str) -> ValidationResult {
        let unit = self.terms.period_unit;
        ValidationResult::from_fields(
            positive_amount(
                raw_amount,
                "Loan amount is required",
                "Please enter a valid loan amount",
            ),
            positive_period(
                raw_period,
                &format!("Number of {unit} is required"),
                &format!("Please enter a valid number of {unit}"),
            ),
        )
    }

    pub fn calculate(&self, input: &LoanInput) -> LoanCalcResult<ComputationOutput<SpeedLoanOutput>> {
        let start = Instant::now();
        require_period(input, "speed loan installment")?;

        let rate = self.terms.monthly_rate;
        let unit = self.terms.period_unit;
        let amount = input.amount;
        let periods = Decimal::from(input.period);

        let term_months = unit.months_equivalent(input.period);
        let ctx = "speed loan installment";
        let total_interest = checked_mul(checked_mul(amount, rate, ctx)?, term_months, ctx)?;
        let total_amount = checked_add(amount, total_interest, ctx)?;
        let installment = checked_div(total_amount, periods, ctx)?;

        let output = SpeedLoanOutput {
            loan_amount: amount,
            period: input.period,
            period_unit: unit,
            monthly_interest_rate: rate,
            term_months,
            total_interest,
            principal_per_period: checked_div(amount, periods, ctx)?,
            interest_per_period: checked_div(total_interest, periods, ctx)?,
            installment,
            rounded_installment: round_to_nearest_ten(installment),
            total_amount,
        };

        let mut warnings = Vec::new();
        if self.terms.is_default() {
            warnings.push(
                "Speed Loan terms are configuration defaults (10% monthly, monthly periods); \
                 confirm against the product sheet"
                    .to_string(),
            );
        }

        let elapsed = start.elapsed().as_micros() as u64;
        let assumptions = serde_json::json!({
            "monthly_rate": rate.to_string(),
            "period_unit": unit,
            "days_per_month": DAYS_PER_MONTH.to_string(),
            "weeks_per_month": WEEKS_PER_MONTH.to_string(),
            "rounding": "nearest 10, half up",
        });

        Ok(with_metadata(
            &format!(
                "Speed Loan: flat {}% monthly interest on full principal, spread over {} installments",
                percent(rate),
                unit.adjective()
            ),
            assumptions,
            warnings,
            elapsed,
            output,
        ))
    }
}

impl LoanModel for SpeedLoan {
    type Output = SpeedLoanOutput;

    fn product(&self) -> LoanProduct {
        LoanProduct::Speed
    }

    fn monthly_rate(&self) -> Rate {
        self.terms.monthly_rate
    }

    fn period_unit(&self) -> PeriodUnit {
        self.terms.period_unit
    }

    fn validate(&self, raw_amount: &str, raw_period: &str) -> ValidationResult {
        SpeedLoan::validate(self, raw_amount, raw_period)
    }

    fn calculate(&self, input: &LoanInput) -> LoanCalcResult<ComputationOutput<SpeedLoanOutput>> {
        SpeedLoan::calculate(self, input)
    }
}
