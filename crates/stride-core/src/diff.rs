//! Comparison of plan documents to classify the nature of a change.
//!
//! The classification drives the versioning decision: only goal changes,
//! week-count changes, and session-count changes warrant a new version.
//! Constraint tweaks and key reordering alone do not, which keeps cosmetic
//! model variance from churning out versions. Session *content* is not
//! diffed, only session counts per shared week.

use std::collections::BTreeSet;

use crate::models::PlanDocument;

/// Classification of the differences between two plan documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanChanges {
    /// The meta goal token differs
    pub goal_changed: bool,
    /// Week entries were added or removed
    pub weeks_changed: bool,
    /// The number of week entries differs
    pub week_count_changed: bool,
    /// A shared week has a different session count
    pub sessions_modified: bool,
    /// The constraints sub-object differs by value
    pub constraints_changed: bool,
    /// Human-readable change descriptions, for diagnostics only
    pub summary: Vec<String>,
}

impl PlanChanges {
    /// Whether the change is material enough to commit a new version.
    ///
    /// Constraint changes alone deliberately do not qualify.
    pub fn requires_new_version(&self) -> bool {
        self.goal_changed || self.week_count_changed || self.sessions_modified
    }

    fn any(&self) -> bool {
        self.goal_changed
            || self.weeks_changed
            || self.sessions_modified
            || self.constraints_changed
    }
}

/// Compare two plans and summarize what changed.
///
/// With no prior plan the differ short-circuits and reports creation without
/// examining `new`.
pub fn compare_plans(old: Option<&PlanDocument>, new: &PlanDocument) -> PlanChanges {
    let mut changes = PlanChanges::default();

    let Some(old) = old else {
        changes
            .summary
            .push("Plan created or completely replaced".to_string());
        return changes;
    };

    if old.meta.goal != new.meta.goal {
        changes.goal_changed = true;
        changes.summary.push(format!(
            "Goal changed from {} to {}",
            old.meta.goal.as_deref().unwrap_or("none"),
            new.meta.goal.as_deref().unwrap_or("none")
        ));
    }

    if old.weeks.len() != new.weeks.len() {
        changes.week_count_changed = true;
        changes.weeks_changed = true;
        changes.summary.push(format!(
            "Plan length changed from {} to {} weeks",
            old.weeks.len(),
            new.weeks.len()
        ));
    }

    let week_keys: BTreeSet<&String> = old.weeks.keys().chain(new.weeks.keys()).collect();
    for week_key in week_keys {
        match (old.weeks.get(week_key), new.weeks.get(week_key)) {
            (None, Some(_)) => {
                changes.weeks_changed = true;
                changes.summary.push(format!("Added {week_key}"));
            }
            (Some(_), None) => {
                changes.weeks_changed = true;
                changes.summary.push(format!("Removed {week_key}"));
            }
            (Some(old_week), Some(new_week)) => {
                if old_week.sessions.len() != new_week.sessions.len() {
                    changes.sessions_modified = true;
                    changes
                        .summary
                        .push(format!("Session count changed in {week_key}"));
                }
            }
            (None, None) => {}
        }
    }

    if old.constraints != new.constraints {
        changes.constraints_changed = true;
        changes
            .summary
            .push("Training constraints modified".to_string());
    }

    if !changes.any() {
        changes
            .summary
            .push("No significant changes detected".to_string());
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlanConstraints, PlanMeta, Session, WeekPlan};

    fn session(kind: &str) -> Session {
        Session {
            date: None,
            kind: kind.to_string(),
            distance_km: None,
            time_min: None,
            intensity: None,
            rpe: None,
            structure: None,
            notes: None,
            day_of_week: None,
            is_rest_day: false,
        }
    }

    fn week(session_count: usize) -> WeekPlan {
        WeekPlan {
            mileage_target: None,
            sessions: (0..session_count).map(|_| session("Easy Run")).collect(),
        }
    }

    fn plan(goal: &str, weeks: &[(&str, usize)]) -> PlanDocument {
        PlanDocument {
            meta: PlanMeta {
                goal: Some(goal.to_string()),
                ..Default::default()
            },
            constraints: PlanConstraints::default(),
            weeks: weeks
                .iter()
                .map(|(key, count)| ((*key).to_string(), week(*count)))
                .collect(),
        }
    }

    #[test]
    fn absent_old_plan_reports_created() {
        let new = plan("5K", &[("week_01", 3)]);
        let changes = compare_plans(None, &new);
        assert!(!changes.goal_changed);
        assert!(!changes.week_count_changed);
        assert_eq!(changes.summary, vec!["Plan created or completely replaced"]);
    }

    #[test]
    fn identical_plans_report_no_changes() {
        let old = plan("5K", &[("week_01", 3), ("week_02", 4)]);
        let changes = compare_plans(Some(&old), &old.clone());
        assert_eq!(changes.summary, vec!["No significant changes detected"]);
        assert!(!changes.requires_new_version());
    }

    #[test]
    fn goal_change_is_detected() {
        let old = plan("5K", &[("week_01", 3)]);
        let new = plan("10K", &[("week_01", 3)]);
        let changes = compare_plans(Some(&old), &new);
        assert!(changes.goal_changed);
        assert!(changes.requires_new_version());
        assert!(changes.summary[0].contains("Goal changed from 5K to 10K"));
    }

    #[test]
    fn week_count_growth_is_detected() {
        let old = plan(
            "10K",
            &[
                ("week_01", 3),
                ("week_02", 3),
                ("week_03", 3),
                ("week_04", 3),
            ],
        );
        let new = plan(
            "10K",
            &[
                ("week_01", 3),
                ("week_02", 3),
                ("week_03", 3),
                ("week_04", 3),
                ("week_05", 3),
                ("week_06", 3),
            ],
        );
        let changes = compare_plans(Some(&old), &new);
        assert!(changes.week_count_changed);
        assert!(changes.weeks_changed);
        assert!(changes.requires_new_version());
    }

    #[test]
    fn renamed_week_keys_with_same_count() {
        let old = plan("10K", &[("week_01", 3), ("week_02", 3)]);
        let new = plan("10K", &[("week_01", 3), ("week_03", 3)]);
        let changes = compare_plans(Some(&old), &new);
        assert!(!changes.week_count_changed);
        assert!(changes.weeks_changed);
        assert!(changes.summary.contains(&"Added week_03".to_string()));
        assert!(changes.summary.contains(&"Removed week_02".to_string()));
        // Key churn alone is not material.
        assert!(!changes.requires_new_version());
    }

    #[test]
    fn session_count_change_in_shared_week() {
        let old = plan("10K", &[("week_01", 3), ("week_02", 3)]);
        let new = plan("10K", &[("week_01", 3), ("week_02", 5)]);
        let changes = compare_plans(Some(&old), &new);
        assert!(changes.sessions_modified);
        assert!(changes.requires_new_version());
        assert!(changes
            .summary
            .contains(&"Session count changed in week_02".to_string()));
    }

    #[test]
    fn constraints_only_change_is_not_material() {
        let old = plan("10K", &[("week_01", 3)]);
        let mut new = old.clone();
        new.constraints.min_rest_days = 2;
        let changes = compare_plans(Some(&old), &new);
        assert!(changes.constraints_changed);
        assert!(!changes.goal_changed);
        assert!(!changes.weeks_changed);
        assert!(!changes.week_count_changed);
        assert!(!changes.sessions_modified);
        assert!(!changes.requires_new_version());
    }
}
