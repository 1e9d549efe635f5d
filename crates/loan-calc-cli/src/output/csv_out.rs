use serde_json::Value;
use std::io;

use super::flatten::flatten_rows;

/// Write output as CSV to stdout.
///
/// Single results become `field,value` rows; arrays (the product list)
/// become one record per element.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Array(arr) => write_records(&mut wtr, arr),
        Value::Object(map) => {
            let body = map.get("result").unwrap_or(value);
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flatten_rows(body) {
                let _ = wtr.write_record([key, val]);
            }
        }
        other => {
            for (_, val) in flatten_rows(other) {
                let _ = wtr.write_record([val]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(first) = arr.first() else {
        return;
    };

    let headers: Vec<String> = flatten_rows(first).into_iter().map(|(k, _)| k).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        let rows = flatten_rows(item);
        let record: Vec<String> = headers
            .iter()
            .map(|h| {
                rows.iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect();
        let _ = wtr.write_record(&record);
    }
}
