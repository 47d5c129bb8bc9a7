mod helpers;

use std::sync::Arc;

use chrono::NaiveDate;
use regimen::domain::models::{DailyProgressRecord, PeriodStatus, SchedulerSettings};
use regimen::services::{
    build_completion_stack, AutoCompletionScheduler, CompletionStack, PeriodRequest,
    AUTO_COMPLETION_NOTE,
};

use helpers::database::{setup_test_db, teardown_test_db};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn request(owner: &str, start: &str, duration: u32) -> PeriodRequest {
    PeriodRequest {
        owner_id: owner.to_string(),
        intervention_name: "Sleep Hygiene".to_string(),
        habit_names: vec!["no screens after 22:00".to_string()],
        duration_days: duration,
        start_date: Some(date(start)),
        cycle_phase: None,
        intake_ref: None,
    }
}

fn scheduler(stack: &CompletionStack) -> Arc<AutoCompletionScheduler> {
    Arc::new(AutoCompletionScheduler::new(
        stack.lifecycle.clone(),
        stack.periods.clone(),
        SchedulerSettings::default(),
    ))
}

#[tokio::test]
async fn test_sweep_closes_expired_period_with_full_fanout() {
    let pool = setup_test_db().await;
    let stack = build_completion_stack(pool.clone()).await;

    // 30 days from 2025-01-01 runs through 2025-01-30 inclusive
    let period = stack
        .lifecycle
        .start(request("owner-1", "2025-01-01", 30))
        .await
        .unwrap();
    // 15 of the 30 planned days tracked at full completion
    for offset in 0..15 {
        stack
            .progress
            .create(&DailyProgressRecord::new(
                "owner-1",
                date("2025-01-01") + chrono::Duration::days(offset),
                1,
                1,
                Some(4),
            ))
            .await
            .unwrap();
    }

    let sweeper = scheduler(&stack);

    // Not yet due on the day before the planned end
    let early = sweeper.run_sweep(date("2025-01-29")).await.unwrap();
    assert_eq!(early.examined, 0);
    assert_eq!(early.completed, 0);

    // Past the planned end the period is picked up and fully closed
    let outcome = sweeper.run_sweep(date("2025-02-01")).await.unwrap();
    assert_eq!(outcome.examined, 1);
    assert_eq!(outcome.completed, 1);
    assert_eq!(outcome.already_terminal, 0);
    assert_eq!(outcome.failed, 0);

    let stored = stack.periods.get(period.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PeriodStatus::Completed);
    assert!(stored.actual_end_date.is_some());
    assert!(stored.notes.contains(AUTO_COMPLETION_NOTE));

    // Full fan-out: habits closed, summary synthesized, notification sent
    assert!(stack
        .habits
        .find_active_by_name("owner-1", "no screens after 22:00")
        .await
        .unwrap()
        .is_none());
    let summary = stack
        .summaries
        .get_for_period(period.id)
        .await
        .unwrap()
        .expect("sweep must synthesize a summary");
    assert_eq!(summary.insights["auto_completed"], true);
    // Adherence is measured against the 30 planned days, even though the
    // sweep closed the period after the window: 15/30 tracked at 100%.
    assert!((summary.adherence_rate - 50.0).abs() < 1e-9);

    let notifications = stack
        .notifications
        .list_for_owner("owner-1", true)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].payload["auto_completed"], true);
    assert!(notifications[0].body.contains("planned end date"));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_sweep_fires_on_the_planned_end_date_itself() {
    let pool = setup_test_db().await;
    let stack = build_completion_stack(pool.clone()).await;

    let period = stack
        .lifecycle
        .start(request("owner-1", "2025-01-01", 30))
        .await
        .unwrap();

    let outcome = scheduler(&stack).run_sweep(date("2025-01-30")).await.unwrap();
    assert_eq!(outcome.completed, 1);

    let stored = stack.periods.get(period.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PeriodStatus::Completed);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_sweep_skips_terminal_and_unexpired_periods() {
    let pool = setup_test_db().await;
    let stack = build_completion_stack(pool.clone()).await;

    // Expired and active: should be swept
    let expired = stack
        .lifecycle
        .start(request("owner-1", "2025-01-01", 7))
        .await
        .unwrap();

    // Already completed manually: never re-examined
    let done = stack
        .lifecycle
        .start(request("owner-2", "2025-01-01", 7))
        .await
        .unwrap();
    stack
        .lifecycle
        .complete(done.id, "owner-2", None, false)
        .await
        .unwrap();

    // Abandoned: terminal, never swept
    let abandoned = stack
        .lifecycle
        .start(request("owner-3", "2025-01-01", 7))
        .await
        .unwrap();
    stack
        .lifecycle
        .reset(request("owner-3", "2025-02-01", 30))
        .await
        .unwrap();

    // Active but not yet past its planned end
    let running = stack
        .lifecycle
        .start(request("owner-4", "2025-02-01", 30))
        .await
        .unwrap();

    let outcome = scheduler(&stack).run_sweep(date("2025-02-10")).await.unwrap();
    assert_eq!(outcome.examined, 1);
    assert_eq!(outcome.completed, 1);

    assert_eq!(
        stack.periods.get(expired.id).await.unwrap().unwrap().status,
        PeriodStatus::Completed
    );
    assert_eq!(
        stack.periods.get(abandoned.id).await.unwrap().unwrap().status,
        PeriodStatus::Abandoned
    );
    assert_eq!(
        stack.periods.get(running.id).await.unwrap().unwrap().status,
        PeriodStatus::Active
    );

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_sweep_completes_each_period_independently() {
    let pool = setup_test_db().await;
    let stack = build_completion_stack(pool.clone()).await;

    for owner in ["owner-1", "owner-2", "owner-3"] {
        stack
            .lifecycle
            .start(request(owner, "2025-01-01", 7))
            .await
            .unwrap();
    }

    let outcome = scheduler(&stack).run_sweep(date("2025-03-01")).await.unwrap();
    assert_eq!(outcome.examined, 3);
    assert_eq!(outcome.completed, 3);
    assert_eq!(outcome.failed, 0);

    for owner in ["owner-1", "owner-2", "owner-3"] {
        let notifications = stack.notifications.list_for_owner(owner, false).await.unwrap();
        assert_eq!(notifications.len(), 1, "{owner} gets one notification");
    }

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_sweep_reports_listing_failure_for_retry() {
    let pool = setup_test_db().await;
    let stack = build_completion_stack(pool.clone()).await;

    // A broken period store must surface as an error, not as an empty
    // sweep, so the tick loop retries instead of skipping the day.
    sqlx::query("DROP TABLE intervention_periods")
        .execute(&pool)
        .await
        .unwrap();

    let result = scheduler(&stack).run_sweep(date("2025-02-01")).await;
    assert!(result.is_err());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_scheduler_start_and_stop() {
    let pool = setup_test_db().await;
    let stack = build_completion_stack(pool.clone()).await;

    let sweeper = scheduler(&stack);
    assert!(!sweeper.is_running());

    let handle = sweeper.start();
    assert!(sweeper.is_running());

    sweeper.stop();
    assert!(!sweeper.is_running());
    handle.abort();

    teardown_test_db(pool).await;
}
