//! Intervention period lifecycle orchestration.
//!
//! The only writer of period status. Manual completion, the scheduler's
//! auto-completion sweep, and resets all go through this service; on a
//! successful terminal transition it publishes one completion event and
//! returns the per-handler outcomes alongside the transition result.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::InterventionPeriod;
use crate::domain::ports::{HabitRepository, PeriodRepository, ProgressRepository};
use crate::services::event_bus::{
    CompletionEvent, EventBus, HandlerOutcome, INTERVENTION_COMPLETED,
};

/// Result of a successful completion: the transition succeeded; each side
/// effect reports its own outcome and may have degraded independently.
#[derive(Debug, Serialize)]
pub struct CompletionReceipt {
    pub period_id: Uuid,
    pub event_results: Vec<HandlerOutcome>,
}

/// Result of a successful reset.
#[derive(Debug, Serialize)]
pub struct ResetReceipt {
    pub period_id: Uuid,
    /// The period abandoned to make room, when one existed.
    pub abandoned_period_id: Option<Uuid>,
}

/// Read-only progress aggregation for a period.
#[derive(Debug, Serialize)]
pub struct ProgressReport {
    pub average_mood: Option<f64>,
    pub days_passed: i64,
    pub total_days: i64,
    pub fully_completed_days: usize,
    pub tracked_days: usize,
    /// Mean per-day completion percentage across tracked days (0-100).
    pub completion_rate: f64,
}

/// Parameters for starting or resetting an intervention period.
#[derive(Debug, Clone)]
pub struct PeriodRequest {
    pub owner_id: String,
    pub intervention_name: String,
    pub habit_names: Vec<String>,
    pub duration_days: u32,
    pub start_date: Option<NaiveDate>,
    pub cycle_phase: Option<String>,
    pub intake_ref: Option<String>,
}

pub struct LifecycleService {
    periods: Arc<dyn PeriodRepository>,
    habits: Arc<dyn HabitRepository>,
    progress: Arc<dyn ProgressRepository>,
    bus: Arc<EventBus>,
}

impl LifecycleService {
    pub fn new(
        periods: Arc<dyn PeriodRepository>,
        habits: Arc<dyn HabitRepository>,
        progress: Arc<dyn ProgressRepository>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            periods,
            habits,
            progress,
            bus,
        }
    }

    /// Complete a period and fan the event out to the subscribed handlers.
    ///
    /// The transition is a single conditional write keyed on
    /// `status = active`; a second call (duplicate client retry, or the
    /// scheduler racing a manual request) observes zero affected rows and
    /// fails with `AlreadyCompleted` without publishing anything.
    pub async fn complete(
        &self,
        period_id: Uuid,
        requester_id: &str,
        notes: Option<&str>,
        auto_completed: bool,
    ) -> DomainResult<CompletionReceipt> {
        let period = self
            .periods
            .get(period_id)
            .await?
            .ok_or(DomainError::PeriodNotFound(period_id))?;

        let ended_at = Utc::now();
        let transitioned = self
            .periods
            .complete_if_active(period_id, ended_at, notes)
            .await?;
        if !transitioned {
            return Err(DomainError::AlreadyCompleted(period_id));
        }

        tracing::info!(
            period_id = %period_id,
            requester = requester_id,
            auto_completed,
            "Intervention period completed"
        );

        let event = CompletionEvent {
            period_id,
            owner_id: period.owner_id.clone(),
            intervention_name: period.intervention_name.clone(),
            habit_names: period.habit_names.clone(),
            start_date: period.start_date,
            planned_end_date: period.planned_end_date,
            end_date: ended_at.date_naive(),
            auto_completed,
        };
        let event_results = self.bus.publish(INTERVENTION_COMPLETED, &event).await;

        Ok(CompletionReceipt {
            period_id,
            event_results,
        })
    }

    /// Start a fresh period for an owner with no active one.
    pub async fn start(&self, request: PeriodRequest) -> DomainResult<InterventionPeriod> {
        if let Some(existing) = self.periods.find_active_for_owner(&request.owner_id).await? {
            tracing::debug!(period_id = %existing.id, "Refusing start: active period exists");
            return Err(DomainError::ActivePeriodExists(request.owner_id));
        }
        self.create_period(request).await
    }

    /// Abandon the owner's current active period (if any), close its habit
    /// assignments, and start a new period with the given habit set. Both
    /// the abandoned and the new period remain permanently queryable.
    pub async fn reset(&self, request: PeriodRequest) -> DomainResult<ResetReceipt> {
        let mut abandoned_period_id = None;

        if let Some(current) = self.periods.find_active_for_owner(&request.owner_id).await? {
            let abandoned = self
                .periods
                .abandon_if_active(
                    current.id,
                    Utc::now(),
                    Some("reset: superseded by a new intervention period"),
                )
                .await?;

            if abandoned {
                abandoned_period_id = Some(current.id);
                let closed = self
                    .habits
                    .complete_matching(&current.owner_id, &current.habit_names)
                    .await?;
                tracing::info!(
                    period_id = %current.id,
                    habits_completed = closed,
                    "Abandoned active period during reset"
                );
            }
        }

        let period = self.create_period(request).await?;
        Ok(ResetReceipt {
            period_id: period.id,
            abandoned_period_id,
        })
    }

    /// Read-only progress aggregation over the period's date range.
    pub async fn get_progress(&self, period_id: Uuid) -> DomainResult<ProgressReport> {
        let period = self
            .periods
            .get(period_id)
            .await?
            .ok_or(DomainError::PeriodNotFound(period_id))?;

        let today = Utc::now().date_naive();
        let range_end = period
            .actual_end_date
            .map_or(today, |dt| dt.date_naive());

        let records = self
            .progress
            .find_range(&period.owner_id, period.start_date, range_end)
            .await?;

        let total_days = period.planned_days();
        let days_passed =
            ((range_end - period.start_date).num_days() + 1).clamp(0, total_days);

        let moods: Vec<f64> = records
            .iter()
            .filter_map(|r| r.mood_score.map(f64::from))
            .collect();
        let average_mood = if moods.is_empty() {
            None
        } else {
            Some(moods.iter().sum::<f64>() / moods.len() as f64)
        };

        let fully_completed_days = records.iter().filter(|r| r.is_fully_completed()).count();
        let completion_rate = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.completion_pct()).sum::<f64>() / records.len() as f64
        };

        Ok(ProgressReport {
            average_mood,
            days_passed,
            total_days,
            fully_completed_days,
            tracked_days: records.len(),
            completion_rate,
        })
    }

    async fn create_period(&self, request: PeriodRequest) -> DomainResult<InterventionPeriod> {
        if request.duration_days == 0 {
            return Err(DomainError::ValidationFailed(
                "Duration must be at least one day".to_string(),
            ));
        }

        // A future start would let a completion stamp an actual end date
        // before the period even began.
        let today = Utc::now().date_naive();
        let start_date = request.start_date.unwrap_or(today);
        if start_date > today {
            return Err(DomainError::ValidationFailed(
                "Start date cannot be in the future".to_string(),
            ));
        }

        let mut period = InterventionPeriod::new(
            request.owner_id.clone(),
            request.intervention_name,
            request.habit_names.clone(),
            start_date,
            request.duration_days,
        );
        if let Some(intake_ref) = request.intake_ref {
            period = period.with_intervention_ref(intake_ref);
        }
        if let Some(phase) = request.cycle_phase {
            period = period.with_notes(format!("cycle phase: {phase}"));
        }
        period
            .validate()
            .map_err(DomainError::ValidationFailed)?;

        self.periods.create(&period).await?;

        for name in &request.habit_names {
            self.habits
                .activate_or_create(&request.owner_id, name)
                .await?;
        }

        tracing::info!(
            period_id = %period.id,
            owner = %period.owner_id,
            habits = period.habit_names.len(),
            "Started intervention period"
        );
        Ok(period)
    }
}
