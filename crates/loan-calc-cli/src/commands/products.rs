use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::loans::speed::SpeedLoanTerms;
use loan_calc_core::{round_to_nearest_ten, LoanProduct};

/// Arguments for rounding a value
#[derive(Args)]
pub struct RoundArgs {
    /// Value to round to the nearest 10
    #[arg(long)]
    pub value: Decimal,
}

pub fn run_products(terms: &SpeedLoanTerms) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(LoanProduct::catalogue(terms))?)
}

pub fn run_round(args: RoundArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.value < Decimal::ZERO {
        return Err("--value must not be negative".into());
    }
    Ok(serde_json::json!({
        "value": args.value,
        "rounded": round_to_nearest_ten(args.value),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_products_lists_five() {
        let value = run_products(&SpeedLoanTerms::default()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 5);
        assert_eq!(value[4]["product"], "poli");
    }

    #[test]
    fn test_round() {
        let value = run_round(RoundArgs { value: dec!(10833.33) }).unwrap();
        assert_eq!(value["rounded"], "10830");
    }

    #[test]
    fn test_round_rejects_negative() {
        assert!(run_round(RoundArgs { value: dec!(-1) }).is_err());
    }
}
