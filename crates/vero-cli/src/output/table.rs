use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::display_field;

/// Format output as tables using the tabled crate.
///
/// Scalar fields of the result go into one Field/Value table; each array of
/// records (matches, warnings, depreciation details) gets its own table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result(result, map),
            None => print_object("", map),
        },
        Value::Array(arr) => print_array(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object("", res_map),
        Value::Array(arr) => print_array(arr),
        other => println!("{}", format_value(other)),
    }

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

fn print_object(title: &str, map: &Map<String, Value>) {
    if !title.is_empty() {
        println!("\n{}", title);
    }

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections: Vec<(&String, &Value)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(arr) if arr.iter().any(Value::is_object) => sections.push((key, val)),
            Value::Object(_) => sections.push((key, val)),
            _ => builder.push_record([key.clone(), cell(key, val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, val) in sections {
        match val {
            Value::Object(inner) => print_object(key, inner),
            Value::Array(arr) => {
                println!("\n{}", key);
                print_array(arr);
            }
            _ => {}
        }
    }
}

fn print_array(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(|v| cell(h, v)).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn cell(key: &str, value: &Value) -> String {
    display_field(key, value).unwrap_or_else(|| format_value(value))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
