pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Plain-text rendering of a JSON scalar or nested value.
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// The list of rows a result is best shown as: line items or county rows when
/// present, otherwise the first field holding a list of objects.
pub(crate) fn primary_rows(result: &serde_json::Map<String, Value>) -> Option<(&str, &[Value])> {
    ["line_items", "counties"]
        .iter()
        .find_map(|key| result.get_key_value(*key).and_then(as_rows))
        .or_else(|| result.iter().find_map(as_rows))
}

fn as_rows<'a>((key, val): (&'a String, &'a Value)) -> Option<(&'a str, &'a [Value])> {
    match val {
        Value::Array(rows) if matches!(rows.first(), Some(Value::Object(_))) => {
            Some((key.as_str(), rows.as_slice()))
        }
        _ => None,
    }
}
