use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Calendar-month convention shared by the day-based products.
pub const DAYS_PER_MONTH: Decimal = dec!(30);

/// Week-to-month approximation (4, not 4.33).
pub const WEEKS_PER_MONTH: Decimal = dec!(4);

/// Unit in which a loan period is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodUnit {
    Days,
    Weeks,
    #[default]
    Months,
}

impl PeriodUnit {
    /// Convert a period count in this unit into (possibly fractional) months.
    pub fn months_equivalent(&self, period: u32) -> Decimal {
        let period = Decimal::from(period);
        match self {
            PeriodUnit::Days => period / DAYS_PER_MONTH,
            PeriodUnit::Weeks => period / WEEKS_PER_MONTH,
            PeriodUnit::Months => period,
        }
    }

    /// Installment frequency label ("daily", "weekly", "monthly").
    pub fn adjective(&self) -> &'static str {
        match self {
            PeriodUnit::Days => "daily",
            PeriodUnit::Weeks => "weekly",
            PeriodUnit::Months => "monthly",
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PeriodUnit::Days => "days",
            PeriodUnit::Weeks => "weeks",
            PeriodUnit::Months => "months",
        };
        f.write_str(s)
    }
}

/// A parsed, validated request: principal plus a period count whose unit is
/// decided by the product it is passed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanInput {
    pub amount: Money,
    pub period: u32,
}

impl LoanInput {
    pub fn new(amount: Money, period: u32) -> Self {
        Self { amount, period }
    }
}

/// Product-independent view of a calculation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentSummary {
    pub installment: Money,
    pub rounded_installment: Money,
    pub total_interest: Money,
    pub total_amount: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

impl<T: Serialize> ComputationOutput<T> {
    /// Re-wrap the result while keeping methodology, warnings and metadata.
    pub fn map<U: Serialize>(self, f: impl FnOnce(T) -> U) -> ComputationOutput<U> {
        ComputationOutput {
            result: f(self.result),
            methodology: self.methodology,
            assumptions: self.assumptions,
            warnings: self.warnings,
            metadata: self.metadata,
        }
    }
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: serde_json::Value,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions,
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
