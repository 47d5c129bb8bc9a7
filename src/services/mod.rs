//! Service layer: lifecycle orchestration, event fan-out, and the
//! auto-completion scheduler.

pub mod analytics;
pub mod auto_completion;
pub mod event_bus;
pub mod habit_completion;
pub mod lifecycle;
pub mod notifier;

pub use analytics::AnalyticsSynthesizer;
pub use auto_completion::{AutoCompletionScheduler, SweepOutcome, AUTO_COMPLETION_NOTE, SYSTEM_ACTOR};
pub use event_bus::{
    CompletionEvent, CompletionListener, EventBus, HandlerOutcome, INTERVENTION_COMPLETED,
};
pub use habit_completion::HabitCompletionHandler;
pub use lifecycle::{CompletionReceipt, LifecycleService, PeriodRequest, ProgressReport, ResetReceipt};
pub use notifier::NotificationDispatcher;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::adapters::sqlite::{
    SqliteHabitRepository, SqliteNotificationRepository, SqlitePeriodRepository,
    SqliteProgressRepository, SqliteSummaryRepository,
};
use crate::domain::ports::{
    HabitRepository, NotificationRepository, PeriodRepository, ProgressRepository,
    SummaryRepository,
};

/// Fully wired completion subsystem over a database pool.
pub struct CompletionStack {
    pub bus: Arc<EventBus>,
    pub lifecycle: Arc<LifecycleService>,
    pub periods: Arc<dyn PeriodRepository>,
    pub habits: Arc<dyn HabitRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub summaries: Arc<dyn SummaryRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

/// Build the repositories, event bus, and lifecycle service, subscribing
/// the three completion handlers in their fixed order: habit closure,
/// analytics synthesis, notification dispatch.
pub async fn build_completion_stack(pool: SqlitePool) -> CompletionStack {
    let periods: Arc<dyn PeriodRepository> = Arc::new(SqlitePeriodRepository::new(pool.clone()));
    let habits: Arc<dyn HabitRepository> = Arc::new(SqliteHabitRepository::new(pool.clone()));
    let progress: Arc<dyn ProgressRepository> =
        Arc::new(SqliteProgressRepository::new(pool.clone()));
    let summaries: Arc<dyn SummaryRepository> =
        Arc::new(SqliteSummaryRepository::new(pool.clone()));
    let notifications: Arc<dyn NotificationRepository> =
        Arc::new(SqliteNotificationRepository::new(pool));

    let bus = Arc::new(EventBus::new());
    bus.subscribe(
        INTERVENTION_COMPLETED,
        Arc::new(HabitCompletionHandler::new(habits.clone())),
    )
    .await;
    bus.subscribe(
        INTERVENTION_COMPLETED,
        Arc::new(AnalyticsSynthesizer::new(
            progress.clone(),
            summaries.clone(),
        )),
    )
    .await;
    bus.subscribe(
        INTERVENTION_COMPLETED,
        Arc::new(NotificationDispatcher::new(notifications.clone())),
    )
    .await;

    let lifecycle = Arc::new(LifecycleService::new(
        periods.clone(),
        habits.clone(),
        progress.clone(),
        bus.clone(),
    ));

    CompletionStack {
        bus,
        lifecycle,
        periods,
        habits,
        progress,
        summaries,
        notifications,
    }
}
