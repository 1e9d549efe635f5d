use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::flatten::{flatten_rows, format_scalar};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => {
                print_field_table(result);
                print_envelope_notes(map);
            }
            None => print_field_table(value),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", format_scalar(value)),
    }
}

/// Two-column Field / Value table of every (flattened) leaf.
fn print_field_table(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_rows(value) {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// One row per element; columns come from the first element's leaves.
fn print_array_table(arr: &[Value]) {
    let Some(first) = arr.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = flatten_rows(first).into_iter().map(|(k, _)| k).collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for item in arr {
        let rows = flatten_rows(item);
        let row: Vec<String> = headers
            .iter()
            .map(|h| {
                rows.iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect();
        builder.push_record(row);
    }

    println!("{}", Table::from(builder));
}
