use serde_json::Value;
use std::io;

use super::{result_body, scalar_text, ROW_SECTIONS};

/// Write output as CSV to stdout. Results with installment (or comparison)
/// rows print one line per row; anything else prints field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let body = result_body(value);

    let rows = ROW_SECTIONS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array));

    match (rows, body) {
        (Some(rows), _) => write_array_csv(&mut wtr, rows),
        (None, Value::Array(arr)) => write_array_csv(&mut wtr, arr),
        (None, Value::Object(map)) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &scalar_text(val)]);
            }
        }
        (None, other) => {
            let _ = wtr.write_record([&scalar_text(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&scalar_text(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
