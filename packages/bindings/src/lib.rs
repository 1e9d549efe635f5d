use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use loan_calc_core::loans::micro;
use loan_calc_core::loans::speed::SpeedLoanTerms;
use loan_calc_core::{LoanInput, LoanProduct};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_product(product: &str) -> NapiResult<LoanProduct> {
    LoanProduct::from_str(product).map_err(to_napi_error)
}

/// Speed Loan terms as JSON, e.g. `{"monthly_rate":"0.1","period_unit":"months"}`.
/// Absent terms mean the defaults.
fn parse_terms(terms_json: Option<String>) -> NapiResult<SpeedLoanTerms> {
    let terms = match terms_json {
        Some(json) => serde_json::from_str::<SpeedLoanTerms>(&json).map_err(to_napi_error)?,
        None => SpeedLoanTerms::default(),
    };
    terms.check().map_err(to_napi_error)?;
    Ok(terms)
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_products(speed_terms_json: Option<String>) -> NapiResult<String> {
    let terms = parse_terms(speed_terms_json)?;
    serde_json::to_string(&LoanProduct::catalogue(&terms)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Validation and calculation
// ---------------------------------------------------------------------------

/// Validation never throws; the JSON carries `valid` and `field_errors`.
#[napi]
pub fn validate_loan(
    product: String,
    raw_amount: String,
    raw_period: String,
    speed_terms_json: Option<String>,
) -> NapiResult<String> {
    let product = parse_product(&product)?;
    let terms = parse_terms(speed_terms_json)?;
    let result = loan_calc_core::validate_product(product, &raw_amount, &raw_period, &terms);
    serde_json::to_string(&result).map_err(to_napi_error)
}

/// `input_json` is a normalized input: `{"amount":"15000","period":26}`.
/// It is re-validated against the product's rules before calculating.
#[napi]
pub fn calculate_loan(
    product: String,
    input_json: String,
    speed_terms_json: Option<String>,
) -> NapiResult<String> {
    let product = parse_product(&product)?;
    let terms = parse_terms(speed_terms_json)?;
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_calc_core::quote_input(product, &input, &terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn quote_loan(
    product: String,
    raw_amount: String,
    raw_period: String,
    speed_terms_json: Option<String>,
) -> NapiResult<String> {
    let product = parse_product(&product)?;
    let terms = parse_terms(speed_terms_json)?;
    let output = loan_calc_core::quote(product, &raw_amount, &raw_period, &terms)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Helpers for form behaviour
// ---------------------------------------------------------------------------

/// Micro Loan week count to show after the amount field changes.
#[napi]
pub fn suggest_micro_period(raw_amount: String, current_period: Option<u32>) -> Option<u32> {
    micro::suggest_period_for_text(&raw_amount, current_period)
}

#[napi]
pub fn round_to_nearest_ten(value: String) -> NapiResult<String> {
    let value = Decimal::from_str(value.trim()).map_err(to_napi_error)?;
    Ok(loan_calc_core::round_to_nearest_ten(value).to_string())
}
