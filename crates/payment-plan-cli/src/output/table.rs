use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{result_body, scalar_text, ROW_SECTIONS};

/// Columns shown for installment rows; the full record is in JSON output.
const INSTALLMENT_COLUMNS: [&str; 9] = [
    "installment_number",
    "name",
    "months_from_booking",
    "percent_of_cost_value",
    "base_amount",
    "gst_amount",
    "interest_accrued_this_period",
    "interest_settled",
    "net_payment",
];

/// Format output as tables: row sections first, then scalar fields, then
/// the summary block.
pub fn print_table(value: &Value) {
    let body = result_body(value);

    match body {
        Value::Object(map) => print_result(map),
        Value::Array(arr) => print_rows(arr, None),
        other => println!("{}", scalar_text(other)),
    }

    if let Some(envelope) = value.as_object() {
        print_envelope_notes(envelope);
    }
}

fn print_result(map: &Map<String, Value>) {
    for key in ROW_SECTIONS {
        if let Some(Value::Array(rows)) = map.get(key) {
            if rows.is_empty() {
                continue;
            }
            println!("{}:", title(key));
            let columns = (key == "installments").then_some(&INSTALLMENT_COLUMNS[..]);
            print_rows(rows, columns);
            println!();
        }
    }

    let scalars: Vec<(&String, &Value)> = map
        .iter()
        .filter(|(k, v)| !ROW_SECTIONS.contains(&k.as_str()) && !v.is_object())
        .collect();
    if !scalars.is_empty() {
        print_fields(scalars);
    }

    print_sections(map);
}

/// Nested objects (summary, validation, present value) as their own tables.
fn print_sections(map: &Map<String, Value>) {
    for (key, val) in map {
        if let Value::Object(section) = val {
            println!("\n{}:", title(key));
            print_fields(section.iter().filter(|(_, v)| !v.is_object()).collect());
            print_sections(section);
        }
    }
}

fn print_fields(fields: Vec<(&String, &Value)>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(arr: &[Value], columns: Option<&[&str]>) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_value(item));
        }
        return;
    };

    let headers: Vec<&str> = match columns {
        Some(cols) => cols.to_vec(),
        None => first.keys().map(|k| k.as_str()).collect(),
    };
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn title(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        other => scalar_text(other),
    }
}
