//! Canonical identifier tables for legacy role and milestone ids.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde_json::Value;

/// Legacy role spellings mapped to their canonical identifiers.
pub static EMPLOYEE_ID_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("new_business_developer", "new_business_dev"),
        ("recruiting_girl", "recruiter"),
        ("marketing_trainee", "marketer"),
        ("vice_precident", "vice_president"),
        ("junior_vice_precident", "junior_vice_president"),
        ("senior_vice_precident", "senior_vice_president"),
        ("executive_vice_precident", "executive_vp"),
        ("recuriting_manager", "recruiting_manager"),
        ("zippelin_pilot", "zeppelin_pilot"),
        ("zeppeliner", "zeppelin_pilot"),
        ("CFO", "cfo"),
    ])
});

/// Legacy milestone ids mapped to their canonical identifiers. Identity
/// entries are deliberate and produce no alias.
pub static MILESTONE_ID_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("first_to_hire_3_people_in_1_turn", "first_hire_3"),
        ("first_throw_away_drink_or_food", "first_throw_away"),
        ("first_waitress_played", "first_waitress"),
        ("first_to_have_20", "first_have_20"),
        ("first_to_have_100", "first_have_100"),
        ("first_to_lower_price", "first_lower_prices"),
        ("first_to_train_someone", "first_train"),
        ("first_burger_produced", "first_burger_produced"),
        ("first_pizza_produced", "first_pizza_produced"),
        ("first_errand_boy_played", "first_errand_boy"),
        ("first_cart_operator_played", "first_cart_operator"),
        ("first_to_pay_20_or_more_in_salaries", "first_pay_20_salaries"),
        ("first_billboard_placed", "first_billboard"),
        ("first_burger_marketed", "first_burger_marketed"),
        ("first_pizza_marketed", "first_pizza_marketed"),
        ("first_drink_marketed", "first_drink_marketed"),
        ("first_airplane_campaign", "first_airplane"),
        ("first_radio_campaign", "first_radio"),
    ])
});

/// Roles always flagged as mandatory in the converted data.
pub static MANDATORY_EMPLOYEE_IDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "pricing_manager",
        "discount_manager",
        "luxury_manager",
        "cfo",
        "recruiting_manager",
        "hr_director",
        "waitress",
    ])
});

fn remap(table: &HashMap<&'static str, &'static str>, raw: &str) -> (String, Vec<String>) {
    match table.get(raw) {
        Some(mapped) if *mapped != raw => ((*mapped).to_string(), vec![raw.to_string()]),
        _ => (raw.to_string(), Vec::new()),
    }
}

/// Canonical role id plus the legacy alias when a remap occurred.
pub fn normalize_employee_id(raw: &str) -> (String, Vec<String>) {
    remap(&EMPLOYEE_ID_MAP, raw)
}

/// Canonical milestone id plus the legacy alias when a remap occurred.
pub fn normalize_milestone_id(raw: &str) -> (String, Vec<String>) {
    remap(&MILESTONE_ID_MAP, raw)
}

/// Whether a canonical role id belongs to the always-mandatory set.
pub fn is_mandatory(id: &str) -> bool {
    MANDATORY_EMPLOYEE_IDS.contains(id)
}

/// Replaces every string equal to a legacy role id anywhere inside
/// `value` with its canonical form. Sequence elements and mapping values
/// recurse; mapping keys and non-string scalars pass through.
pub fn remap_role_ids(value: Value) -> Value {
    match value {
        Value::String(s) => match EMPLOYEE_ID_MAP.get(s.as_str()) {
            Some(mapped) => Value::String((*mapped).to_string()),
            None => Value::String(s),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(remap_role_ids).collect()),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, item)| (key, remap_role_ids(item)))
                .collect(),
        ),
        other => other,
    }
}
