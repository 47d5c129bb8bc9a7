//! Completion summary domain model.
//!
//! Synthesized analytics written once per period when it completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of mood change across the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodTrend {
    Improved,
    Declined,
    Stable,
}

impl MoodTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improved => "improved",
            Self::Declined => "declined",
            Self::Stable => "stable",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "improved" => Some(Self::Improved),
            "declined" => Some(Self::Declined),
            "stable" => Some(Self::Stable),
            _ => None,
        }
    }
}

/// Adherence and mood analytics for a completed period. One per period:
/// `complete()` permits a single successful transition, so creation is
/// idempotent by construction (backed by a UNIQUE constraint on period_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub id: Uuid,
    pub owner_id: String,
    pub period_id: Uuid,
    /// Composite adherence score, always within [0, 100]
    pub adherence_rate: f64,
    /// Mean of recorded mood scores, if any were recorded
    pub average_mood: Option<f64>,
    pub mood_trend: MoodTrend,
    /// Free-form insight payload (streaks, tracked-day counts, ...)
    pub insights: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl CompletionSummary {
    pub fn new(
        owner_id: impl Into<String>,
        period_id: Uuid,
        adherence_rate: f64,
        average_mood: Option<f64>,
        mood_trend: MoodTrend,
        insights: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            period_id,
            adherence_rate: adherence_rate.clamp(0.0, 100.0),
            average_mood,
            mood_trend,
            insights,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adherence_clamped_on_construction() {
        let summary = CompletionSummary::new(
            "o",
            Uuid::new_v4(),
            120.0,
            None,
            MoodTrend::Stable,
            serde_json::json!({}),
        );
        assert_eq!(summary.adherence_rate, 100.0);

        let negative = CompletionSummary::new(
            "o",
            Uuid::new_v4(),
            -5.0,
            None,
            MoodTrend::Stable,
            serde_json::json!({}),
        );
        assert_eq!(negative.adherence_rate, 0.0);
    }
}
