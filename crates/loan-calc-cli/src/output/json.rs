use serde_json::Value;

/// Pretty-print the full envelope (result, methodology, warnings, metadata).
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => tracing::error!(error = %e, "failed to serialize output"),
    }
}
