//! Strict schema validation and best-effort repair for plan documents.
//!
//! The extractor hands this module an arbitrary JSON value. [`repair`] fixes
//! one malformed-output shape seen in practice (meta fields emitted at the
//! top level), then [`validate_value`] deserializes into a typed
//! [`PlanDocument`] and enforces range bounds, week-key conventions, and
//! non-empty sessions. Out-of-range values are rejected, never clamped.

use log::info;
use serde_json::Value;

use crate::{
    error::{CoachError, Result},
    models::PlanDocument,
};

/// Meta fields the model sometimes emits at the top level instead of inside
/// a `meta` object.
const META_FIELDS: [&str; 4] = ["goal", "race_date", "phase", "weekly_km_target"];

/// Hoist stray top-level meta fields into a synthesized `meta` object.
///
/// Only runs when `meta` is absent; broader malformations are intentionally
/// left to fall through to validation failure.
pub fn repair(value: &mut Value) {
    let Some(map) = value.as_object_mut() else {
        return;
    };
    if map.contains_key("meta") {
        return;
    }
    let mut meta = serde_json::Map::new();
    for field in META_FIELDS {
        if let Some(v) = map.remove(field) {
            meta.insert(field.to_string(), v);
        }
    }
    if !meta.is_empty() {
        info!("Repaired plan shape: hoisted top-level meta fields into 'meta'");
        map.insert("meta".to_string(), Value::Object(meta));
    }
}

/// Non-throwing structural pre-check used by the extractor: `weeks` must be
/// a non-empty mapping and every entry a mapping with a `sessions` key.
pub fn weeks_look_valid(value: &Value) -> bool {
    let Some(weeks) = value.get("weeks").and_then(Value::as_object) else {
        return false;
    };
    if weeks.is_empty() {
        return false;
    }
    weeks
        .values()
        .all(|week| week.as_object().is_some_and(|w| w.contains_key("sessions")))
}

/// Attempt repair, then strictly validate `value` into a [`PlanDocument`].
pub fn validate_value(mut value: Value) -> Result<PlanDocument> {
    repair(&mut value);

    for key in ["meta", "weeks"] {
        if value.get(key).is_none() {
            return Err(CoachError::schema(key, "required key is missing"));
        }
    }

    let document: PlanDocument = serde_json::from_value(value)
        .map_err(|e| CoachError::schema("document", e.to_string()))?;
    validate_document(&document)?;
    Ok(document)
}

/// Enforce range bounds and structural invariants on a typed document.
pub fn validate_document(document: &PlanDocument) -> Result<()> {
    if let Some(target) = document.meta.weekly_km_target {
        if !(1.0..=200.0).contains(&target) {
            return Err(CoachError::schema(
                "meta.weekly_km_target",
                format!("{target} is outside the allowed range [1, 200]"),
            ));
        }
    }

    let constraints = &document.constraints;
    if !(5..=50).contains(&constraints.max_weekly_increase_pct) {
        return Err(CoachError::schema(
            "constraints.max_weekly_increase_pct",
            format!(
                "{} is outside the allowed range [5, 50]",
                constraints.max_weekly_increase_pct
            ),
        ));
    }
    if !(0..=3).contains(&constraints.min_rest_days) {
        return Err(CoachError::schema(
            "constraints.min_rest_days",
            format!(
                "{} is outside the allowed range [0, 3]",
                constraints.min_rest_days
            ),
        ));
    }

    if document.weeks.is_empty() {
        return Err(CoachError::schema("weeks", "plan must include at least one week"));
    }

    for (key, week) in &document.weeks {
        if !key.starts_with("week_") {
            return Err(CoachError::schema(
                "weeks",
                format!("week key must start with 'week_': {key}"),
            ));
        }
        if week.sessions.is_empty() {
            return Err(CoachError::schema(
                format!("weeks.{key}.sessions"),
                "each week must have at least one session",
            ));
        }
        for (idx, session) in week.sessions.iter().enumerate() {
            let field = |name: &str| format!("weeks.{key}.sessions[{idx}].{name}");
            if session.kind.is_empty() {
                return Err(CoachError::schema(field("type"), "must be non-empty"));
            }
            if let Some(km) = session.distance_km {
                if !(0.0..=100.0).contains(&km) {
                    return Err(CoachError::schema(
                        field("distance_km"),
                        format!("{km} is outside the allowed range [0, 100]"),
                    ));
                }
            }
            if let Some(minutes) = session.time_min {
                if !(0..=600).contains(&minutes) {
                    return Err(CoachError::schema(
                        field("time_min"),
                        format!("{minutes} is outside the allowed range [0, 600]"),
                    ));
                }
            }
            if let Some(rpe) = session.rpe {
                if !(1..=10).contains(&rpe) {
                    return Err(CoachError::schema(
                        field("rpe"),
                        format!("{rpe} is outside the allowed range [1, 10]"),
                    ));
                }
            }
        }
    }

    Ok(())
}
