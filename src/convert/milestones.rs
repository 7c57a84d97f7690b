//! Milestone seed conversion.
//!
//! Milestones are reshaped into a trigger/effects form. Only the effect
//! payloads are deep-remapped; trigger filters are structural data and
//! carry no role ids.

use serde::Serialize;
use serde_json::Value;

use crate::error::{MigrateError, Result};
use crate::extract::assignment_expr;
use crate::normalize::to_json_text;
use crate::remap::{normalize_milestone_id, remap_role_ids};

use super::string_field;

#[derive(Debug, Clone, Serialize)]
pub struct MilestoneRecord {
    pub id: String,
    pub name: String,
    pub trigger: TriggerSpec,
    pub effects: Value,
    pub exclusive_type: String,
    pub expires_at: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerSpec {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

/// Turn after which an early-game milestone leaves the board. Everything
/// else stays available for the whole match.
fn expiry_turn(id: &str) -> Option<u32> {
    match id {
        "first_burger_marketed" | "first_pizza_marketed" | "first_drink_marketed"
        | "first_train" => Some(2),
        "first_hire_3" => Some(3),
        _ => None,
    }
}

/// Converts the milestone list, sorted by canonical id. Entries without a
/// usable id are skipped.
pub fn convert_milestones(text: &str) -> Result<Vec<MilestoneRecord>> {
    let expr = assignment_expr(text, "milestones")?
        .ok_or(MigrateError::MissingKey("milestones"))?;
    let entries: Vec<Value> = serde_json::from_str(&to_json_text(expr))
        .map_err(|source| MigrateError::Parse {
            key: "milestones",
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

        let (id, _aliases) = normalize_milestone_id(&raw_id);
        let effects = remap_role_ids(
            entry
                .get("effects")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
        );
        let trigger = TriggerSpec {
            event: string_field(&entry, "trigger_event"),
            filter: entry
                .get("trigger_filter")
                .filter(|v| !v.is_null())
                .cloned(),
        };
        let expires_at = expiry_turn(&id);
        let exclusive_type = id.clone();

        records.push(MilestoneRecord {
            id,
            name: string_field(&entry, "name"),
            trigger,
            effects,
            exclusive_type,
            expires_at,
        });
    }

    records.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(records)
}
