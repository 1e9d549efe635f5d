use clap::Args;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use loan_calc_core::loans::speed::SpeedLoanTerms;
use loan_calc_core::{quote, validate_product, LoanProduct};

use crate::input;

/// Arguments shared by every product subcommand
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file: {"amount": "...", "period": "..."}
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount, as typed (e.g. 15000)
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// Number of periods in the product's unit
    #[arg(long, allow_hyphen_values = true, visible_aliases = ["days", "weeks", "months"])]
    pub period: Option<String>,
}

/// Arguments for validation without calculation
#[derive(Args)]
pub struct ValidateArgs {
    /// Loan product: daily, speed, micro, finance or poli
    pub product: String,

    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Raw text request; numbers in JSON are accepted and treated as their text.
#[derive(Debug, Default, Deserialize)]
pub struct RawLoanRequest {
    #[serde(default, deserialize_with = "text_or_number")]
    pub amount: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub period: String,
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Flags win over stdin; a missing flag reaches validation as empty text.
fn read_raw(args: &LoanArgs) -> Result<RawLoanRequest, Box<dyn std::error::Error>> {
    if args.input.is_none() && (args.amount.is_some() || args.period.is_some()) {
        return Ok(RawLoanRequest {
            amount: args.amount.clone().unwrap_or_default(),
            period: args.period.clone().unwrap_or_default(),
        });
    }
    Ok(input::read_request(args.input.as_deref())?.unwrap_or_default())
}

pub fn run_quote(
    product: LoanProduct,
    args: LoanArgs,
    terms: &SpeedLoanTerms,
) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = read_raw(&args)?;
    let result = quote(product, &raw.amount, &raw.period, terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(
    args: ValidateArgs,
    terms: &SpeedLoanTerms,
) -> Result<Value, Box<dyn std::error::Error>> {
    let product: LoanProduct = args.product.parse()?;
    let raw = read_raw(&args.loan)?;
    let result = validate_product(product, &raw.amount, &raw.period, terms);
    Ok(serde_json::json!({ "product": product, "result": result }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(amount: Option<&str>, period: Option<&str>) -> LoanArgs {
        LoanArgs {
            input: None,
            amount: amount.map(str::to_string),
            period: period.map(str::to_string),
        }
    }

    #[test]
    fn test_raw_request_accepts_numbers() {
        let raw: RawLoanRequest =
            serde_json::from_str(r#"{"amount": 15000, "period": "26"}"#).unwrap();
        assert_eq!(raw.amount, "15000");
        assert_eq!(raw.period, "26");
    }

    #[test]
    fn test_raw_request_missing_fields_empty() {
        let raw: RawLoanRequest = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(raw.amount, "");
        assert_eq!(raw.period, "");
    }

    #[test]
    fn test_flags_quote_micro() {
        let value = run_quote(
            LoanProduct::Micro,
            args(Some("20000"), Some("26")),
            &SpeedLoanTerms::default(),
        )
        .unwrap();
        assert_eq!(value["result"]["rounded_weekly_installment"], "1170");
    }

    #[test]
    fn test_flags_quote_reports_validation_error() {
        let err = run_quote(
            LoanProduct::Micro,
            args(Some("12000"), Some("18")),
            &SpeedLoanTerms::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("multiple of LKR 5,000"));
    }

    #[test]
    fn test_validate_missing_period_flag() {
        let value = run_validate(
            ValidateArgs {
                product: "daily".into(),
                loan: args(Some("10000"), None),
            },
            &SpeedLoanTerms::default(),
        )
        .unwrap();
        assert_eq!(value["result"]["valid"], false);
        assert_eq!(
            value["result"]["field_errors"]["period"]["message"],
            "Number of days is required"
        );
    }
}
