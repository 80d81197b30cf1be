pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a `*_cents` field as euros for human-facing formats.
pub(crate) fn display_field(key: &str, value: &Value) -> Option<String> {
    if !key.ends_with("_cents") {
        return None;
    }
    value.as_i64().map(|cents| format!("{} €", Decimal::new(cents, 2)))
}
