use clap::Args;
use serde_json::Value;

use loan_calc_core::loans::micro;

/// Arguments for Micro Loan period suggestion
#[derive(Args)]
pub struct SuggestPeriodArgs {
    /// Loan amount as typed
    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,

    /// Currently selected number of weeks, if any
    #[arg(long)]
    pub current: Option<u32>,
}

pub fn run_suggest_period(args: SuggestPeriodArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let suggested = micro::suggest_period_for_text(&args.amount, args.current);
    Ok(serde_json::json!({
        "amount": args.amount,
        "current_period": args.current,
        "suggested_period": suggested,
        "allowed_weeks": micro::ALLOWED_WEEKS,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clears_for_ineligible_amount() {
        let value = run_suggest_period(SuggestPeriodArgs {
            amount: "9999".into(),
            current: Some(18),
        })
        .unwrap();
        assert!(value["suggested_period"].is_null());
    }

    #[test]
    fn test_defaults_to_eighteen() {
        let value = run_suggest_period(SuggestPeriodArgs {
            amount: "15000".into(),
            current: None,
        })
        .unwrap();
        assert_eq!(value["suggested_period"], 18);
    }
}
