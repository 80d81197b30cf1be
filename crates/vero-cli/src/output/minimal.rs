use serde_json::Value;

use super::display_field;

/// Headline figure of each command, in priority order.
const PRIORITY_KEYS: [&str; 10] = [
    "total_tax_cents",
    "annual_contribution_cents",
    "status",
    "business_result_cents",
    "suggested_matches",
    "compliance_rate_pct",
    "valid",
    "found",
    "fiscal_year",
    "count",
];

/// Print just the key answer value from the output.
///
/// Looks one level into nested result sections, so `estimate.tax.total_tax_cents`
/// is found for the estimate command.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some((key, val)) = find_priority(result_obj) {
        println!("{}", display_field(key, val).unwrap_or_else(|| format_minimal(val)));
        return;
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn find_priority(value: &Value) -> Option<(&'static str, &Value)> {
    let map = value.as_object()?;
    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return Some((key, val));
        }
    }
    map.values().filter(|v| v.is_object()).find_map(find_priority)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
