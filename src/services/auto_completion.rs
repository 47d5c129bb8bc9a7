//! Auto-completion sweep scheduler.
//!
//! Ticks on a short interval but fires its real work once per day at a
//! configured hour: it selects active periods whose planned end date has
//! passed and completes each one through the lifecycle service, so expired
//! periods are closed without any user action. One period's failure never
//! aborts the sweep over the rest.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Timelike, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::SchedulerSettings;
use crate::domain::ports::PeriodRepository;
use crate::services::lifecycle::LifecycleService;

/// Requester recorded on auto-completed periods.
pub const SYSTEM_ACTOR: &str = "system";

/// Note appended to periods closed by the sweep.
pub const AUTO_COMPLETION_NOTE: &str = "auto-completed: expired";

/// Aggregate result of one sweep.
#[derive(Debug, Default, Serialize)]
pub struct SweepOutcome {
    pub examined: usize,
    pub completed: usize,
    /// Periods that lost the race to a concurrent manual completion;
    /// harmless, counted separately from real failures.
    pub already_terminal: usize,
    pub failed: usize,
}

pub struct AutoCompletionScheduler {
    lifecycle: Arc<LifecycleService>,
    periods: Arc<dyn PeriodRepository>,
    settings: SchedulerSettings,
    running: Arc<AtomicBool>,
    last_sweep_date: Mutex<Option<NaiveDate>>,
}

impl AutoCompletionScheduler {
    pub fn new(
        lifecycle: Arc<LifecycleService>,
        periods: Arc<dyn PeriodRepository>,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            lifecycle,
            periods,
            settings,
            running: Arc::new(AtomicBool::new(false)),
            last_sweep_date: Mutex::new(None),
        }
    }

    /// Start the tick loop. Returns a JoinHandle.
    pub fn start(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);

        let scheduler = Arc::clone(self);
        let tick_interval = Duration::from_secs(self.settings.tick_interval_secs);

        tokio::spawn(async move {
            while scheduler.running.load(Ordering::SeqCst) {
                tokio::time::sleep(tick_interval).await;
                scheduler.tick().await;
            }
        })
    }

    /// Stop the scheduler.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// One tick: run the sweep when the daily fire hour has been reached
    /// and no sweep has run yet today. The day is only marked done after
    /// a sweep that managed to list its candidates, so a transient store
    /// failure is retried on the next tick rather than tomorrow.
    async fn tick(&self) {
        let now = Utc::now();
        if now.hour() < self.settings.sweep_hour {
            return;
        }

        let today = now.date_naive();
        if *self.last_sweep_date.lock().await == Some(today) {
            return;
        }

        match self.run_sweep(today).await {
            Ok(_) => *self.last_sweep_date.lock().await = Some(today),
            Err(e) => {
                tracing::error!("Auto-completion sweep could not list expired periods: {e}");
            }
        }
    }

    /// Sweep all expired active periods, completing each independently.
    /// Also callable one-shot (CLI `sweep`). Fails only when the expired
    /// set cannot be listed; per-period failures are counted, not raised.
    pub async fn run_sweep(&self, today: NaiveDate) -> DomainResult<SweepOutcome> {
        let expired = self.periods.list_expired_active(today).await?;

        let mut outcome = SweepOutcome {
            examined: expired.len(),
            ..SweepOutcome::default()
        };

        for period in expired {
            match self
                .lifecycle
                .complete(period.id, SYSTEM_ACTOR, Some(AUTO_COMPLETION_NOTE), true)
                .await
            {
                Ok(receipt) => {
                    outcome.completed += 1;
                    let degraded = receipt
                        .event_results
                        .iter()
                        .filter(|r| !r.success)
                        .count();
                    if degraded > 0 {
                        tracing::warn!(
                            period_id = %period.id,
                            degraded_handlers = degraded,
                            "Auto-completed with degraded side effects"
                        );
                    }
                }
                Err(DomainError::AlreadyCompleted(_)) => {
                    // Lost the race to a manual completion between the
                    // select and the conditional write.
                    outcome.already_terminal += 1;
                }
                Err(e) => {
                    outcome.failed += 1;
                    tracing::error!(period_id = %period.id, "Auto-completion failed: {e}");
                }
            }
        }

        tracing::info!(
            examined = outcome.examined,
            completed = outcome.completed,
            already_terminal = outcome.already_terminal,
            failed = outcome.failed,
            "Auto-completion sweep finished"
        );
        Ok(outcome)
    }
}
