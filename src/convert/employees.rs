//! Employee seed conversion.
//!
//! The legacy roster is a single `Array[Dictionary]` assignment. Every
//! entry is deep-remapped so that old role ids inside nested fields
//! (train_to, tags, effect payloads) land on their canonical spelling,
//! then reshaped into the fixed record schema below.

use serde::Serialize;
use serde_json::Value;

use crate::error::{MigrateError, Result};
use crate::extract::assignment_expr;
use crate::normalize::to_json_text;
use crate::remap::{is_mandatory, normalize_employee_id, remap_role_ids};

use super::{int_field, string_field, truthy};

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub salary: bool,
    pub unique: bool,
    pub manager_slots: i64,
    pub range: RangeSpec,
    pub train_to: Value,
    pub train_capacity: i64,
    pub tags: Value,
    pub usage_tags: Value,
    pub mandatory: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeSpec {
    #[serde(rename = "type")]
    pub kind: Value,
    pub value: i64,
}

/// Converts the full roster, sorted by canonical id. Entries that are not
/// dictionaries or have no usable id are skipped rather than rejected.
pub fn convert_employees(text: &str) -> Result<Vec<EmployeeRecord>> {
    let expr = assignment_expr(text, "employees")?
        .ok_or(MigrateError::MissingKey("employees"))?;
    let entries: Vec<Value> = serde_json::from_str(&to_json_text(expr))
        .map_err(|source| MigrateError::Parse {
            key: "employees",
            source,
        })?;

    let mut records = Vec::new();
    for entry in entries {
        if !entry.is_object() {
            continue;
        }
        let raw_id = match entry.get("id").and_then(Value::as_str) {
            Some(s) => s.trim().to_string(),
            None => continue,
        };
        if raw_id.is_empty() {
            continue;
        }

        let (id, aliases) = normalize_employee_id(&raw_id);
        let entry = remap_role_ids(entry);

        // unique_1x wins whenever the key is present, even holding null.
        let unique = truthy(entry.get("unique_1x").or_else(|| entry.get("unique")));
        let range = RangeSpec {
            kind: entry.get("range_type").cloned().unwrap_or(Value::Null),
            value: int_field(&entry, "range_value"),
        };
        let mandatory = is_mandatory(&id);

        records.push(EmployeeRecord {
            id,
            name: string_field(&entry, "name"),
            description: string_field(&entry, "description"),
            salary: truthy(entry.get("salary")),
            unique,
            manager_slots: int_field(&entry, "manager_slots"),
            range,
            train_to: list_field(&entry, "train_to"),
            train_capacity: int_field(&entry, "train_capacity"),
            tags: list_field(&entry, "tags"),
            usage_tags: list_field(&entry, "usage_tags"),
            mandatory,
            aliases,
        });
    }

    records.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(records)
}

fn list_field(entry: &Value, key: &str) -> Value {
    entry
        .get(key)
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()))
}
