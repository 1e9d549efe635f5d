//! The five loan products and the capability they share.
//!
//! Every product is a pair of pure functions, `validate` over raw text and
//! `calculate` over an already validated [`LoanInput`]. [`LoanProduct`]
//! dispatches to them by name so callers never match on products themselves.

pub mod daily;
pub mod finance;
pub mod micro;
pub mod poli;
pub mod speed;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LoanCalcError;
use crate::types::{ComputationOutput, InstallmentSummary, LoanInput, PeriodUnit, Rate};
use crate::validation::ValidationResult;
use crate::LoanCalcResult;

use self::daily::{DailyLoan, DailyLoanOutput};
use self::finance::{FinanceLoan, FinanceLoanOutput};
use self::micro::{MicroLoan, MicroLoanOutput};
use self::poli::{PoliLoan, PoliLoanOutput};
use self::speed::{SpeedLoan, SpeedLoanOutput, SpeedLoanTerms};

/// Shared contract of every loan product.
pub trait LoanModel {
    type Output: Serialize;

    fn product(&self) -> LoanProduct;

    /// Nominal monthly rate the product charges.
    fn monthly_rate(&self) -> Rate;

    /// Unit the period count is expressed in.
    fn period_unit(&self) -> PeriodUnit;

    /// Parse and check raw amount / period text.
    fn validate(&self, raw_amount: &str, raw_period: &str) -> ValidationResult;

    /// Derive the installment breakdown. Expects input that passed `validate`;
    /// a zero period is still rejected rather than divided by.
    fn calculate(&self, input: &LoanInput) -> LoanCalcResult<ComputationOutput<Self::Output>>;
}

// ---------------------------------------------------------------------------
// Product catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanProduct {
    Daily,
    Speed,
    Micro,
    Finance,
    Poli,
}

/// Catalogue entry describing one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    pub product: LoanProduct,
    pub name: String,
    pub description: String,
    pub period_unit: PeriodUnit,
    pub monthly_rate: Rate,
}

impl LoanProduct {
    pub const ALL: [LoanProduct; 5] = [
        LoanProduct::Daily,
        LoanProduct::Speed,
        LoanProduct::Micro,
        LoanProduct::Finance,
        LoanProduct::Poli,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanProduct::Daily => "daily",
            LoanProduct::Speed => "speed",
            LoanProduct::Micro => "micro",
            LoanProduct::Finance => "finance",
            LoanProduct::Poli => "poli",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LoanProduct::Daily => "Daily Loan",
            LoanProduct::Speed => "Speed Loan",
            LoanProduct::Micro => "Micro Loan",
            LoanProduct::Finance => "Finance Loan",
            LoanProduct::Poli => "Poli Loan",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            LoanProduct::Daily => {
                "Daily installment; a monthly rate prorated over a 30-day month."
            }
            LoanProduct::Speed => "Quick flat-rate installment on configurable terms.",
            LoanProduct::Micro => {
                "Weekly installment; LKR 10,000 for 18 weeks, or multiples of \
                 LKR 5,000 above that for 18 or 26 weeks."
            }
            LoanProduct::Finance => {
                "Monthly installment; all interest is computed up front on the \
                 full principal and spread evenly."
            }
            LoanProduct::Poli => "Monthly installment equal to one month's interest.",
        }
    }

    pub fn info(&self, terms: &SpeedLoanTerms) -> ProductInfo {
        match self {
            LoanProduct::Daily => describe(&DailyLoan),
            LoanProduct::Speed => describe(&SpeedLoan::new(terms.clone())),
            LoanProduct::Micro => describe(&MicroLoan),
            LoanProduct::Finance => describe(&FinanceLoan),
            LoanProduct::Poli => describe(&PoliLoan),
        }
    }

    /// All products, in menu order.
    pub fn catalogue(terms: &SpeedLoanTerms) -> Vec<ProductInfo> {
        Self::ALL.iter().map(|p| p.info(terms)).collect()
    }
}

fn describe<M: LoanModel>(model: &M) -> ProductInfo {
    let product = model.product();
    ProductInfo {
        product,
        name: product.display_name().to_string(),
        description: product.description().to_string(),
        period_unit: model.period_unit(),
        monthly_rate: model.monthly_rate(),
    }
}

impl fmt::Display for LoanProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanProduct {
    type Err = LoanCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| LoanCalcError::InvalidInput {
                field: "product".into(),
                reason: format!("Unknown loan product '{s}' (expected daily, speed, micro, finance or poli)"),
            })
    }
}

// ---------------------------------------------------------------------------
// Product-agnostic results
// ---------------------------------------------------------------------------

/// Any product's calculation result, tagged by product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "product", rename_all = "snake_case")]
pub enum LoanBreakdown {
    Daily(DailyLoanOutput),
    Speed(SpeedLoanOutput),
    Micro(MicroLoanOutput),
    Finance(FinanceLoanOutput),
    Poli(PoliLoanOutput),
}

impl LoanBreakdown {
    pub fn product(&self) -> LoanProduct {
        match self {
            LoanBreakdown::Daily(_) => LoanProduct::Daily,
            LoanBreakdown::Speed(_) => LoanProduct::Speed,
            LoanBreakdown::Micro(_) => LoanProduct::Micro,
            LoanBreakdown::Finance(_) => LoanProduct::Finance,
            LoanBreakdown::Poli(_) => LoanProduct::Poli,
        }
    }

    pub fn summary(&self) -> InstallmentSummary {
        match self {
            LoanBreakdown::Daily(o) => o.summary(),
            LoanBreakdown::Speed(o) => o.summary(),
            LoanBreakdown::Micro(o) => o.summary(),
            LoanBreakdown::Finance(o) => o.summary(),
            LoanBreakdown::Poli(o) => o.summary(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn validate_product(
    product: LoanProduct,
    raw_amount: &str,
    raw_period: &str,
    terms: &SpeedLoanTerms,
) -> ValidationResult {
    let result = match product {
        LoanProduct::Daily => DailyLoan.validate(raw_amount, raw_period),
        LoanProduct::Speed => SpeedLoan::new(terms.clone()).validate(raw_amount, raw_period),
        LoanProduct::Micro => MicroLoan.validate(raw_amount, raw_period),
        LoanProduct::Finance => FinanceLoan.validate(raw_amount, raw_period),
        LoanProduct::Poli => PoliLoan.validate(raw_amount, raw_period),
    };
    if !result.valid {
        tracing::debug!(%product, errors = %result.summary(), "loan input rejected");
    }
    result
}

pub fn calculate_product(
    product: LoanProduct,
    input: &LoanInput,
    terms: &SpeedLoanTerms,
) -> LoanCalcResult<ComputationOutput<LoanBreakdown>> {
    let output = match product {
        LoanProduct::Daily => DailyLoan.calculate(input)?.map(LoanBreakdown::Daily),
        LoanProduct::Speed => SpeedLoan::new(terms.clone())
            .calculate(input)?
            .map(LoanBreakdown::Speed),
        LoanProduct::Micro => MicroLoan.calculate(input)?.map(LoanBreakdown::Micro),
        LoanProduct::Finance => FinanceLoan.calculate(input)?.map(LoanBreakdown::Finance),
        LoanProduct::Poli => PoliLoan.calculate(input)?.map(LoanBreakdown::Poli),
    };
    tracing::debug!(
        %product,
        amount = %input.amount,
        period = input.period,
        rounded_installment = %output.result.summary().rounded_installment,
        "installment calculated"
    );
    Ok(output)
}

/// Validate raw text and, if it passes, calculate.
pub fn quote(
    product: LoanProduct,
    raw_amount: &str,
    raw_period: &str,
    terms: &SpeedLoanTerms,
) -> LoanCalcResult<ComputationOutput<LoanBreakdown>> {
    let input = validate_product(product, raw_amount, raw_period, terms).into_input()?;
    calculate_product(product, &input, terms)
}

/// Run an already-parsed input back through the product's validation, then
/// calculate. Used where a [`LoanInput`] arrives from outside the crate.
pub fn quote_input(
    product: LoanProduct,
    input: &LoanInput,
    terms: &SpeedLoanTerms,
) -> LoanCalcResult<ComputationOutput<LoanBreakdown>> {
    quote(
        product,
        &input.amount.to_string(),
        &input.period.to_string(),
        terms,
    )
}

/// Reject a zero period before any per-period division.
pub(crate) fn require_period(input: &LoanInput, context: &str) -> LoanCalcResult<()> {
    if input.period == 0 {
        return Err(LoanCalcError::DivisionByZero {
            context: format!("{context}: period must be greater than zero"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Checked arithmetic
// ---------------------------------------------------------------------------
//
// Validation bounds neither amount nor period; overflow surfaces as
// `LoanCalcError::Overflow`.

pub(crate) fn checked_mul(a: Decimal, b: Decimal, context: &str) -> LoanCalcResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(context))
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, context: &str) -> LoanCalcResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(context))
}

pub(crate) fn checked_div(a: Decimal, b: Decimal, context: &str) -> LoanCalcResult<Decimal> {
    if b.is_zero() {
        return Err(LoanCalcError::DivisionByZero {
            context: context.to_string(),
        });
    }
    a.checked_div(b).ok_or_else(|| overflow(context))
}

fn overflow(context: &str) -> LoanCalcError {
    LoanCalcError::Overflow {
        context: context.to_string(),
    }
}

/// Rates are reported as decimals; this is only for methodology text.
pub(crate) fn percent(rate: Rate) -> String {
    (rate * dec!(100)).normalize().to_string()
}
