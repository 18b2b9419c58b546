use serde_json::Value;

use super::{result_body, scalar_text};

/// Fields that answer "what will this cost me", most telling first.
const PRIORITY_KEYS: [&str; 6] = [
    "grand_total",
    "net_present_value",
    "total_amount",
    "total_plans",
    "valid",
    "cost_value",
];

/// Print just the headline figure of a result. Looks in the result body and
/// then its `summary`, falling back to the first field.
pub fn print_minimal(value: &Value) {
    let body = result_body(value);
    let summary = body.get("summary");

    for key in PRIORITY_KEYS {
        let found = body
            .get(key)
            .or_else(|| summary.and_then(|s| s.get(key)))
            .filter(|v| !v.is_null());
        if let Some(val) = found {
            println!("{}", scalar_text(val));
            return;
        }
    }

    if let Value::Object(map) = body {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val));
            return;
        }
    }

    println!("{}", scalar_text(body));
}
