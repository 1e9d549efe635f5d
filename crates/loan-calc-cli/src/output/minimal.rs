use serde_json::Value;

use super::flatten::format_scalar;

/// Print just the key answer value from the output.
///
/// Looks for the rounded installment first, then the other single-answer
/// fields the non-loan commands produce, then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "rounded_daily_installment",
        "rounded_weekly_installment",
        "rounded_monthly_installment",
        "rounded_installment",
        "suggested_period",
        "rounded",
        "valid",
        "version",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                println!("{}", minimal_text(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, minimal_text(val));
            return;
        }
    }

    println!("{}", minimal_text(result_obj));
}

fn minimal_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => format_scalar(other),
    }
}
