//! Poli Loan: interest-only installments, principal repaid at the end.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::loans::{checked_add, checked_mul, percent, require_period, LoanModel, LoanProduct};
use crate::rounding::round_to_nearest_ten;
use crate::types::*;
use crate::validation::{combined_positive, ValidationResult};
use crate::LoanCalcResult;

pub const MONTHLY_RATE: Rate = dec!(0.06);

pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid loan amount and number of months";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoliLoanOutput {
    pub loan_amount: Money,
    pub months: u32,
    pub monthly_interest_rate: Rate,
    /// One month's interest; independent of the term.
    pub monthly_installment: Money,
    pub rounded_monthly_installment: Money,
    pub total_interest: Money,
    pub total_amount: Money,
    /// Outstanding principal after the last installment (never amortized).
    pub principal_at_end: Money,
}

impl PoliLoanOutput {
    pub fn summary(&self) -> InstallmentSummary {
        InstallmentSummary {
            installment: self.monthly_installment,
            rounded_installment: self.rounded_monthly_installment,
            total_interest: self.total_interest,
            total_amount: self.total_amount,
        }
    }
}

pub fn validate(raw_amount: &str, raw_months: &str) -> ValidationResult {
    combined_positive(raw_amount, raw_months, INVALID_INPUT_MESSAGE)
}

pub fn calculate(input: &LoanInput) -> LoanCalcResult<ComputationOutput<PoliLoanOutput>> {
    let start = Instant::now();
    require_period(input, "poli loan installment")?;

    let amount = input.amount;
    let ctx = "poli loan installment";
    let monthly_installment = checked_mul(amount, MONTHLY_RATE, ctx)?;
    let total_interest = checked_mul(monthly_installment, Decimal::from(input.period), ctx)?;

    let output = PoliLoanOutput {
        loan_amount: amount,
        months: input.period,
        monthly_interest_rate: MONTHLY_RATE,
        monthly_installment,
        rounded_monthly_installment: round_to_nearest_ten(monthly_installment),
        total_interest,
        total_amount: checked_add(amount, total_interest, ctx)?,
        principal_at_end: amount,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": MONTHLY_RATE.to_string(),
        "principal_repayment": "bullet, outside the installments",
        "rounding": "nearest 10, half up",
    });

    Ok(with_metadata(
        &format!(
            "Poli Loan: interest-only, installment equals {}% of principal per month",
            percent(MONTHLY_RATE)
        ),
        assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PoliLoan;

impl LoanModel for PoliLoan {
    type Output = PoliLoanOutput;

    fn product(&self) -> LoanProduct {
        LoanProduct::Poli
    }

    fn monthly_rate(&self) -> Rate {
        MONTHLY_RATE
    }

    fn period_unit(&self) -> PeriodUnit {
        PeriodUnit::Months
    }

    fn validate(&self, raw_amount: &str, raw_period: &str) -> ValidationResult {
        validate(raw_amount, raw_period)
    }

    fn calculate(&self, input: &LoanInput) -> LoanCalcResult<ComputationOutput<PoliLoanOutput>> {
        calculate(input)
    }
}
