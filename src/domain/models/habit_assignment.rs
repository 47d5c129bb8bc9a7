//! Habit assignment domain model.
//!
//! Assignments are created by the daily-tracking flow and deactivated,
//! never deleted, when their period completes or is abandoned. They are
//! linked to a period only by name equality against the period's habit
//! name set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a habit assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    #[default]
    Active,
    Completed,
}

impl HabitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// A per-owner tracked behavior instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitAssignment {
    pub id: Uuid,
    pub owner_id: String,
    pub habit_name: String,
    pub status: HabitStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HabitAssignment {
    pub fn new(owner_id: impl Into<String>, habit_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            habit_name: habit_name.into(),
            status: HabitStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == HabitStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assignment_is_active() {
        let assignment = HabitAssignment::new("owner-1", "meditate");
        assert!(assignment.is_active());
        assert_eq!(assignment.status.as_str(), "active");
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(HabitStatus::from_str("completed"), Some(HabitStatus::Completed));
        assert_eq!(HabitStatus::from_str("ACTIVE"), Some(HabitStatus::Active));
        assert_eq!(HabitStatus::from_str("deleted"), None);
    }
}
