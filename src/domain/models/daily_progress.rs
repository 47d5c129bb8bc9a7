//! Daily progress record domain model.
//!
//! One row per owner per tracked day, written by the daily-tracking flow.
//! The completion subsystem only reads these: progress reports, adherence
//! and mood analytics are all derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single day's habit tracking snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgressRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub date: NaiveDate,
    /// Habits scheduled for that day
    pub total_habits: u32,
    /// Habits actually completed that day
    pub completed_habits: u32,
    /// Self-reported mood on a 1-5 scale
    pub mood_score: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl DailyProgressRecord {
    pub fn new(
        owner_id: impl Into<String>,
        date: NaiveDate,
        total_habits: u32,
        completed_habits: u32,
        mood_score: Option<u8>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            date,
            total_habits,
            completed_habits,
            mood_score,
            created_at: Utc::now(),
        }
    }

    /// Per-day completion percentage (0-100). Days with nothing scheduled
    /// count as 0.
    pub fn completion_pct(&self) -> f64 {
        if self.total_habits == 0 {
            return 0.0;
        }
        (f64::from(self.completed_habits.min(self.total_habits)) / f64::from(self.total_habits))
            * 100.0
    }

    /// True when every scheduled habit was completed.
    pub fn is_fully_completed(&self) -> bool {
        self.total_habits > 0 && self.completed_habits >= self.total_habits
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(mood) = self.mood_score {
            if !(1..=5).contains(&mood) {
                return Err(format!("Mood score {mood} outside 1-5 scale"));
            }
        }
        if self.completed_habits > self.total_habits {
            return Err("Completed habits cannot exceed total habits".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_completion_pct() {
        let record = DailyProgressRecord::new("o", date("2025-01-05"), 4, 3, Some(4));
        assert!((record.completion_pct() - 75.0).abs() < f64::EPSILON);
        assert!(!record.is_fully_completed());

        let full = DailyProgressRecord::new("o", date("2025-01-06"), 4, 4, None);
        assert!(full.is_fully_completed());

        let empty = DailyProgressRecord::new("o", date("2025-01-07"), 0, 0, None);
        assert_eq!(empty.completion_pct(), 0.0);
        assert!(!empty.is_fully_completed());
    }

    #[test]
    fn test_validation() {
        let bad_mood = DailyProgressRecord::new("o", date("2025-01-05"), 2, 1, Some(6));
        assert!(bad_mood.validate().is_err());

        let over = DailyProgressRecord::new("o", date("2025-01-05"), 2, 3, Some(3));
        assert!(over.validate().is_err());

        let ok = DailyProgressRecord::new("o", date("2025-01-05"), 2, 2, Some(3));
        assert!(ok.validate().is_ok());
    }
}
