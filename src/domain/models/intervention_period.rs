//! Intervention period domain model.
//!
//! A period is a time-boxed engagement between an owner and a health
//! intervention, with an associated set of tracked habit names. Periods
//! start `Active` and move exactly once to a terminal state; rows are
//! never deleted, so history stays permanently queryable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of an intervention period.
///
/// Transitions only leave `Active`: `Active -> Completed` (manual or
/// auto-completion) and `Active -> Abandoned` (reset). A terminal period
/// never re-enters `Active`, and `actual_end_date` is set if and only if
/// the status is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// Period is currently being tracked
    #[default]
    Active,
    /// Period finished (manually or by the auto-completion sweep)
    Completed,
    /// Period was superseded by a reset before finishing
    Abandoned,
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }

    /// Check if this status can transition to another status.
    pub fn can_transition_to(&self, new_status: Self) -> bool {
        matches!(
            (self, new_status),
            (Self::Active, Self::Completed) | (Self::Active, Self::Abandoned)
        )
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A time-boxed engagement with a health intervention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionPeriod {
    /// Unique identifier
    pub id: Uuid,
    /// Owner (already verified by the identity layer; the core trusts it)
    pub owner_id: String,
    /// Human-readable intervention name
    pub intervention_name: String,
    /// Optional reference into the intervention catalog
    pub intervention_ref: Option<String>,
    /// Habit names tracked during this period. Habit assignments are
    /// linked to the period only by name equality against this set.
    pub habit_names: Vec<String>,
    /// First day of the period (inclusive)
    pub start_date: NaiveDate,
    /// Planned last day of the period (inclusive)
    pub planned_end_date: NaiveDate,
    /// Set exactly when the period reaches a terminal state
    pub actual_end_date: Option<DateTime<Utc>>,
    /// Current lifecycle status
    pub status: PeriodStatus,
    /// Free-text notes, appended on completion/abandonment
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterventionPeriod {
    /// Create a new active period running `duration_days` from `start_date`.
    pub fn new(
        owner_id: impl Into<String>,
        intervention_name: impl Into<String>,
        habit_names: Vec<String>,
        start_date: NaiveDate,
        duration_days: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            intervention_name: intervention_name.into(),
            intervention_ref: None,
            habit_names,
            start_date,
            planned_end_date: start_date
                + chrono::Duration::days(i64::from(duration_days.saturating_sub(1))),
            actual_end_date: None,
            status: PeriodStatus::default(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_intervention_ref(mut self, intervention_ref: impl Into<String>) -> Self {
        self.intervention_ref = Some(intervention_ref.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Total planned length of the period in days (inclusive of both ends).
    pub fn planned_days(&self) -> i64 {
        (self.planned_end_date - self.start_date).num_days() + 1
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// True when the period is still active but its planned end date has
    /// passed; these are the periods the auto-completion sweep picks up.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.status.is_active() && self.planned_end_date <= today
    }

    /// Validate this period.
    pub fn validate(&self) -> Result<(), String> {
        if self.owner_id.is_empty() {
            return Err("Owner id cannot be empty".to_string());
        }
        if self.intervention_name.is_empty() {
            return Err("Intervention name cannot be empty".to_string());
        }
        if self.planned_end_date < self.start_date {
            return Err("Planned end date cannot precede start date".to_string());
        }
        Ok(())
    }
}
