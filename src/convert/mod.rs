//! Per-entity converters from legacy seed text to output records.

mod employees;
mod milestones;
mod tile;

pub use employees::{convert_employees, EmployeeRecord, RangeSpec};
pub use milestones::{convert_milestones, MilestoneRecord, TriggerSpec};
pub use tile::{convert_tile, DrinkSource, PrintedStructure, TileRecord};

use serde_json::Value;

/// String field with the schema's empty-string default.
fn string_field(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Integer coercion matching the legacy data: numbers truncate, booleans
/// count as 0/1, numeric strings parse, everything else is 0.
fn int_field(entry: &Value, key: &str) -> i64 {
    match entry.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::Bool(b)) => i64::from(*b),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Truthiness of an optional value: null, false, zero, empty strings and
/// empty collections are all false.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(entries)) => !entries.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn int_field_coercions() {
        let entry = json!({
            "plain": 4,
            "float": 2.9,
            "numeric_string": "7",
            "junk": "seven",
            "flag": true,
            "nothing": null,
        });
        assert_eq!(int_field(&entry, "plain"), 4);
        assert_eq!(int_field(&entry, "float"), 2);
        assert_eq!(int_field(&entry, "numeric_string"), 7);
        assert_eq!(int_field(&entry, "junk"), 0);
        assert_eq!(int_field(&entry, "flag"), 1);
        assert_eq!(int_field(&entry, "nothing"), 0);
        assert_eq!(int_field(&entry, "absent"), 0);
    }

    #[test]
    fn truthiness_matches_the_legacy_data_conventions() {
        let entry = json!({
            "yes": true,
            "no": false,
            "zero": 0,
            "one": 1,
            "empty": "",
            "word": "x",
            "empty_list": [],
            "list": [1],
            "null": null,
        });
        assert!(truthy(entry.get("yes")));
        assert!(!truthy(entry.get("no")));
        assert!(!truthy(entry.get("zero")));
        assert!(truthy(entry.get("one")));
        assert!(!truthy(entry.get("empty")));
        assert!(truthy(entry.get("word")));
        assert!(!truthy(entry.get("empty_list")));
        assert!(truthy(entry.get("list")));
        assert!(!truthy(entry.get("null")));
        assert!(!truthy(entry.get("absent")));
    }
}
