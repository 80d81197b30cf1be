use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// A result holding a list of records (matches, warnings) is written as one
/// row per record; any other result is written as field/value pairs, with
/// nested sections flattened to dotted field names.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(arr) => write_records(&mut wtr, arr),
        Value::Object(_) => {
            let _ = wtr.write_record(["field", "value"]);
            let mut rows = Vec::new();
            flatten("", result, &mut rows);
            for (field, val) in rows {
                let _ = wtr.write_record([field, val]);
            }
        }
        other => {
            let _ = wtr.write_record([format_csv_value(other)]);
        }
    }

    let _ = wtr.flush();
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let field = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&field, val, rows);
            }
        }
        other => rows.push((prefix.to_string(), format_csv_value(other))),
    }
}

fn write_records(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([format_csv_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) if arr.iter().all(|v| !v.is_object()) => {
            arr.iter().map(format_csv_value).collect::<Vec<_>>().join("; ")
        }
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
