//! Finance Loan: flat interest computed up front, repaid in level months.
//!
//! Interest for the whole term is charged on the original principal and then
//! divided evenly across the months. The balance never diminishes for
//! interest purposes even though the installment is level.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::loans::{
    checked_add, checked_div, checked_mul, percent, require_period, LoanModel, LoanProduct,
};
use crate::rounding::round_to_nearest_ten;
use crate::types::*;
use crate::validation::{combined_positive, ValidationResult};
use crate::LoanCalcResult;

pub const MONTHLY_RATE: Rate = dec!(0.05);

pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid loan amount and number of months";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceLoanOutput {
    pub loan_amount: Money,
    pub months: u32,
    pub monthly_interest_rate: Rate,
    pub total_interest: Money,
    pub monthly_principal: Money,
    pub monthly_interest: Money,
    pub monthly_installment: Money,
    pub rounded_monthly_installment: Money,
    pub total_amount: Money,
}

impl FinanceLoanOutput {
    pub fn summary(&self) -> InstallmentSummary {
        InstallmentSummary {
            installment: self.monthly_installment,
            rounded_installment: self.rounded_monthly_installment,
            total_interest: self.total_interest,
            total_amount: self.total_amount,
        }
    }
}

/// Any problem with either field yields the same single message.
pub fn validate(raw_amount: &str, raw_months: &str) -> ValidationResult {
    combined_positive(raw_amount, raw_months, INVALID_INPUT_MESSAGE)
}

pub fn calculate(input: &LoanInput) -> LoanCalcResult<ComputationOutput<FinanceLoanOutput>> {
    let start = Instant::now();
    require_period(input, "finance loan installment")?;

    let amount = input.amount;
    let months = Decimal::from(input.period);

    let ctx = "finance loan installment";
    let total_interest = checked_mul(checked_mul(amount, MONTHLY_RATE, ctx)?, months, ctx)?;
    let total_amount = checked_add(amount, total_interest, ctx)?;
    let monthly_installment = checked_div(total_amount, months, ctx)?;

    let output = FinanceLoanOutput {
        loan_amount: amount,
        months: input.period,
        monthly_interest_rate: MONTHLY_RATE,
        total_interest,
        monthly_principal: checked_div(amount, months, ctx)?,
        monthly_interest: checked_div(total_interest, months, ctx)?,
        monthly_installment,
        rounded_monthly_installment: round_to_nearest_ten(monthly_installment),
        total_amount,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": MONTHLY_RATE.to_string(),
        "interest_basis": "flat on original principal",
        "rounding": "nearest 10, half up",
    });

    Ok(with_metadata(
        &format!(
            "Finance Loan: flat {}% monthly interest for the full term, spread evenly",
            percent(MONTHLY_RATE)
        ),
        assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FinanceLoan;

impl LoanModel for FinanceLoan {
    type Output = FinanceLoanOutput;

    fn product(&self) -> LoanProduct {
        LoanProduct::Finance
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

    fn calculate(&self, input: &LoanInput) -> LoanCalcResult<ComputationOutput<FinanceLoanOutput>> {
        calculate(input)
    }
}
