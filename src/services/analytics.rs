//! Analytics synthesis on period completion.
//!
//! Computes adherence, mood trend, and completion streaks from the
//! period's daily progress records and persists one `CompletionSummary`.
//! Idempotent by construction: `complete()` permits a single successful
//! transition per period, so this listener fires at most once for it.

use std::sync::Arc;

use chrono::Duration;
use serde_json::json;

use crate::domain::errors::DomainResult;
use crate::domain::models::{CompletionSummary, DailyProgressRecord, MoodTrend};
use crate::domain::ports::{ProgressRepository, SummaryRepository};
use crate::services::event_bus::{CompletionEvent, CompletionListener};

/// Minimum mood samples before a trend is computed; below this the trend
/// is reported as stable.
const MIN_MOOD_SAMPLES: usize = 4;

/// Mean-difference threshold between the two halves of the mood sequence.
const MOOD_TREND_THRESHOLD: f64 = 0.3;

/// Adherence rate in [0, 100]: the fraction of planned days actually
/// tracked, weighted by the average per-day completion percentage across
/// tracked days. Zero tracked days (or a degenerate plan) yields 0.
pub fn adherence_rate(records: &[DailyProgressRecord], planned_days: i64) -> f64 {
    if records.is_empty() || planned_days <= 0 {
        return 0.0;
    }

    let tracked_ratio = records.len() as f64 / planned_days as f64;
    let avg_completion_pct =
        records.iter().map(DailyProgressRecord::completion_pct).sum::<f64>() / records.len() as f64;

    (tracked_ratio * avg_completion_pct).clamp(0.0, 100.0)
}

/// Mood trend over values in chronological entry order.
///
/// Fewer than [`MIN_MOOD_SAMPLES`] values is stable. Otherwise the
/// sequence is split at the integer-floor midpoint (second half one longer
/// on odd lengths) and the half means compared against the threshold.
/// This is a sequence-position split, not a calendar-time split.
pub fn mood_trend(moods: &[f64]) -> MoodTrend {
    if moods.len() < MIN_MOOD_SAMPLES {
        return MoodTrend::Stable;
    }

    let mid = moods.len() / 2;
    let first_mean = moods[..mid].iter().sum::<f64>() / mid as f64;
    let second_mean = moods[mid..].iter().sum::<f64>() / (moods.len() - mid) as f64;

    let delta = second_mean - first_mean;
    if delta > MOOD_TREND_THRESHOLD {
        MoodTrend::Improved
    } else if delta < -MOOD_TREND_THRESHOLD {
        MoodTrend::Declined
    } else {
        MoodTrend::Stable
    }
}

/// Longest and current (trailing) runs of consecutive calendar days with
/// 100% habit completion. Records must be in chronological order.
pub fn completion_streaks(records: &[DailyProgressRecord]) -> (u32, u32) {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev_date = None;

    for record in records {
        if record.is_fully_completed() {
            run = match prev_date {
                Some(prev) if record.date - prev == Duration::days(1) => run + 1,
                _ => 1,
            };
        } else {
            run = 0;
        }
        longest = longest.max(run);
        prev_date = Some(record.date);
    }

    // The trailing run only counts as "current" if the last tracked day
    // was itself fully completed.
    let current = match records.last() {
        Some(last) if last.is_fully_completed() => run,
        _ => 0,
    };

    (current, longest)
}

fn average_mood(moods: &[f64]) -> Option<f64> {
    if moods.is_empty() {
        None
    } else {
        Some(moods.iter().sum::<f64>() / moods.len() as f64)
    }
}

/// Listener that synthesizes and persists the completion summary.
pub struct AnalyticsSynthesizer {
    progress: Arc<dyn ProgressRepository>,
    summaries: Arc<dyn SummaryRepository>,
}

impl AnalyticsSynthesizer {
    pub fn new(
        progress: Arc<dyn ProgressRepository>,
        summaries: Arc<dyn SummaryRepository>,
    ) -> Self {
        Self { progress, summaries }
    }
}

#[async_trait::async_trait]
impl CompletionListener for AnalyticsSynthesizer {
    fn name(&self) -> &'static str {
        "analytics"
    }

    async fn handle(&self, event: &CompletionEvent) -> DomainResult<serde_json::Value> {
        // Records run through the actual end (a late sweep still counts
        // the final days), but the denominator is always the plan length.
        let records = self
            .progress
            .find_range(&event.owner_id, event.start_date, event.end_date)
            .await?;

        let planned_days = (event.planned_end_date - event.start_date).num_days() + 1;
        let adherence = adherence_rate(&records, planned_days);

        let moods: Vec<f64> = records
            .iter()
            .filter_map(|r| r.mood_score.map(f64::from))
            .collect();
        let trend = mood_trend(&moods);
        let avg_mood = average_mood(&moods);

        let (current_streak, longest_streak) = completion_streaks(&records);
        let fully_completed_days = records
            .iter()
            .filter(|r| r.is_fully_completed())
            .count();

        let insights = json!({
            "tracked_days": records.len(),
            "planned_days": planned_days,
            "fully_completed_days": fully_completed_days,
            "current_streak": current_streak,
            "longest_streak": longest_streak,
            "auto_completed": event.auto_completed,
        });

        let summary = CompletionSummary::new(
            event.owner_id.clone(),
            event.period_id,
            adherence,
            avg_mood,
            trend,
            insights,
        );
        self.summaries.create(&summary).await?;

        tracing::info!(
            period_id = %event.period_id,
            adherence = adherence,
            trend = trend.as_str(),
            "Synthesized completion summary"
        );

        Ok(json!({
            "summary_id": summary.id,
            "adherence_rate": summary.adherence_rate,
            "average_mood": summary.average_mood,
            "mood_trend": summary.mood_trend.as_str(),
        }))
    }
}
