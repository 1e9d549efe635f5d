use serde_json::Value;

/// Flatten nested objects into `(dotted.key, text)` rows, in key order.
///
/// Validation results nest errors two levels deep
/// (`field_errors.amount.message`); tables and CSV show them as plain rows.
pub fn flatten_rows(value: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    collect("", value, &mut rows);
    rows
}

fn collect(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect(&path, val, rows);
            }
        }
        other => rows.push((prefix.to_string(), format_scalar(other))),
    }
}

/// Text for a leaf value; arrays are comma-joined.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_scalar).collect::<Vec<_>>().join(", "),
        Value::Object(map) if map.is_empty() => String::new(),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
