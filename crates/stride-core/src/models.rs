//! Data models for training plans and conversation history.
//!
//! The central type is [`PlanDocument`], the authoritative structured output
//! of the coaching pipeline. A document is never stored directly; it is
//! wrapped in an immutable [`PlanVersion`] snapshot of which exactly one per
//! client is current at any time. Conversation turns are recorded as
//! append-only [`ConversationMessage`] rows.
//!
//! Models implement [`std::fmt::Display`] for direct markdown formatting so
//! the CLI can print them without a separate rendering layer.

use std::{collections::BTreeMap, fmt, str::FromStr};

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

/// Session intensity zones (Daniels-style letter codes).
///
/// Easy, Marathon, Threshold, Intervals, Reps, Hills, Strides, Cross.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Intensity {
    E,
    M,
    T,
    I,
    R,
    H,
    S,
    X,
}

/// Lowercase English weekday names, as emitted by the model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// A single training session within a week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Calendar date of the session, if the plan pins one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,

    /// Kind of session, e.g. "Easy Run", "Long Run", "Rest" (non-empty)
    #[serde(rename = "type")]
    pub kind: String,

    /// Distance in kilometers, bounded to [0, 100]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,

    /// Duration in minutes, bounded to [0, 600]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_min: Option<i64>,

    /// Intensity zone letter code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,

    /// Rate of perceived exertion, bounded to [1, 10]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<i64>,

    /// Workout structure, e.g. "3x10min @ T w/2min jog recovery"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<String>,

    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Scheduled weekday
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<Weekday>,

    /// Whether this entry is a rest day rather than a workout
    #[serde(default)]
    pub is_rest_day: bool,
}

/// One week of the plan: an optional mileage target and its sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeekPlan {
    /// Weekly mileage target in kilometers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage_target: Option<f64>,

    /// Sessions for the week (at least one required)
    pub sessions: Vec<Session>,
}

/// Plan metadata: goal, race date, phase, and weekly volume target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanMeta {
    /// Training goal such as "5K" or "Half Marathon" (arbitrary strings
    /// tolerated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,

    /// Target race date, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_date: Option<Date>,

    /// Training phase, defaults to "Base"
    #[serde(default = "PlanMeta::default_phase")]
    pub phase: String,

    /// Weekly kilometer target, bounded to [1, 200]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_km_target: Option<f64>,
}

impl PlanMeta {
    pub(crate) fn default_phase() -> String {
        "Base".to_string()
    }
}

impl Default for PlanMeta {
    fn default() -> Self {
        Self {
            goal: None,
            race_date: None,
            phase: Self::default_phase(),
            weekly_km_target: None,
        }
    }
}

/// Progression constraints applied across the plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanConstraints {
    /// Maximum week-over-week volume increase in percent, within [5, 50]
    #[serde(default = "PlanConstraints::default_max_weekly_increase_pct")]
    pub max_weekly_increase_pct: i64,

    /// Minimum rest days per week, within [0, 3]
    #[serde(default = "PlanConstraints::default_min_rest_days")]
    pub min_rest_days: i64,
}

impl PlanConstraints {
    fn default_max_weekly_increase_pct() -> i64 {
        15
    }

    fn default_min_rest_days() -> i64 {
        1
    }
}

impl Default for PlanConstraints {
    fn default() -> Self {
        Self {
            max_weekly_increase_pct: Self::default_max_weekly_increase_pct(),
            min_rest_days: Self::default_min_rest_days(),
        }
    }
}

/// The authoritative multi-week training plan.
///
/// Week keys follow the `week_NN` convention (zero-padded), so the
/// [`BTreeMap`] ordering matches the numeric week order for display and
/// diffing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanDocument {
    /// Plan metadata including goal and phase
    pub meta: PlanMeta,

    /// Progression constraints (defaults applied when absent)
    #[serde(default)]
    pub constraints: PlanConstraints,

    /// Weekly training structure keyed by `week_NN` (at least one week)
    pub weeks: BTreeMap<String, WeekPlan>,
}

impl PlanDocument {
    /// Total number of sessions across all weeks.
    pub fn total_sessions(&self) -> usize {
        self.weeks.values().map(|w| w.sessions.len()).sum()
    }

    /// Concise one-line summary for logging.
    pub fn summary(&self) -> String {
        let goal = self.meta.goal.as_deref().unwrap_or("Unknown");
        format!(
            "{} plan: {} weeks, {} total sessions, {} phase",
            goal,
            self.weeks.len(),
            self.total_sessions(),
            self.meta.phase
        )
    }
}

impl fmt::Display for PlanDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# {} Training Plan",
            self.meta.goal.as_deref().unwrap_or("Running")
        )?;
        writeln!(f)?;
        writeln!(f, "**Phase:** {}", self.meta.phase)?;
        if let Some(race_date) = self.meta.race_date {
            writeln!(f, "**Race date:** {race_date}")?;
        }
        if let Some(target) = self.meta.weekly_km_target {
            writeln!(f, "**Weekly target:** {target} km")?;
        }
        for (key, week) in &self.weeks {
            writeln!(f)?;
            match week.mileage_target {
                Some(target) => writeln!(f, "## {key} ({target} km)")?,
                None => writeln!(f, "## {key}")?,
            }
            for session in &week.sessions {
                let mut line = format!("- {}", session.kind);
                if let Some(day) = session.day_of_week {
                    line.push_str(&format!(" ({day:?})").to_lowercase());
                }
                if let Some(km) = session.distance_km {
                    line.push_str(&format!(": {km} km"));
                }
                if let Some(structure) = &session.structure {
                    line.push_str(&format!(" — {structure}"));
                }
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

/// Type-safe enumeration of conversation roles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One append-only conversation log entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationMessage {
    /// Unique identifier for the message
    pub id: u64,

    /// Client this message belongs to
    pub client_id: String,

    /// Who produced the message
    pub role: Role,

    /// Message text
    pub content: String,

    /// Timestamp when the message was recorded (UTC)
    pub created_at: Timestamp,
}

/// An immutable, persisted snapshot of a client's plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanVersion {
    /// Unique identifier for the version row
    pub id: u64,

    /// Client this version belongs to
    pub client_id: String,

    /// Monotonically increasing version number, 1-based per client
    pub version: u32,

    /// The plan document payload
    pub document: PlanDocument,

    /// Whether this is the client's current version
    pub is_current: bool,

    /// Timestamp when the version was committed (UTC)
    pub created_at: Timestamp,
}

/// Result of a chat turn returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatOutcome {
    /// The model's free-text explanation (or the raw reply as fallback)
    pub reply: String,

    /// Whether a new plan version was committed this turn
    pub plan_updated: bool,

    /// False when a validated document could not be persisted and is
    /// returned for display only
    pub persisted: bool,

    /// Best available plan document: the validated candidate from this turn
    /// (whether or not it was committed), otherwise the prior current one,
    /// otherwise absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanDocument>,
}

/// Counts of rows removed by a full session reset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResetSummary {
    pub messages_deleted: usize,
    pub plans_deleted: usize,
}
