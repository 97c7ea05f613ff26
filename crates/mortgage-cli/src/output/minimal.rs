use serde_json::Value;

use super::format_value;

/// Print just the headline figure.
///
/// Looks for well-known result fields in priority order, then falls back to the
/// first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_text(value));
}

fn minimal_text(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["formatted_total", "total_monthly_payment", "rate_percent", "default_rate_percent"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_value(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_value(val));
        }
    }

    format_value(result_obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefers_formatted_total() {
        let value = json!({"result": {"total_monthly_payment": "2890.49", "formatted_total": "$2,890.49"}});
        assert_eq!(minimal_text(&value), "$2,890.49");
    }

    #[test]
    fn test_county_lookup_prints_rate() {
        let value = json!({"result": {"county": "Orange County", "rate_percent": "1.2", "matched": true}});
        assert_eq!(minimal_text(&value), "1.2");
    }
}
