mod helpers;

use chrono::{NaiveDate, Utc};
use regimen::domain::models::{DailyProgressRecord, PeriodStatus};
use regimen::services::{build_completion_stack, CompletionStack, PeriodRequest};
use regimen::DomainError;
use uuid::Uuid;

use helpers::database::{setup_test_db, teardown_test_db};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn request(owner: &str, habits: &[&str], start: &str, duration: u32) -> PeriodRequest {
    PeriodRequest {
        owner_id: owner.to_string(),
        intervention_name: "Sleep Hygiene".to_string(),
        habit_names: habits.iter().map(ToString::to_string).collect(),
        duration_days: duration,
        start_date: Some(date(start)),
        cycle_phase: None,
        intake_ref: None,
    }
}

async fn stack() -> (sqlx::SqlitePool, CompletionStack) {
    let pool = setup_test_db().await;
    let stack = build_completion_stack(pool.clone()).await;
    (pool, stack)
}

#[tokio::test]
async fn test_manual_completion_sets_terminal_state() {
    let (pool, stack) = stack().await;

    let period = stack
        .lifecycle
        .start(request("owner-1", &["meditate"], "2025-01-01", 30))
        .await
        .expect("failed to start period");

    let receipt = stack
        .lifecycle
        .complete(period.id, "owner-1", Some("felt great"), false)
        .await
        .expect("failed to complete period");
    assert_eq!(receipt.period_id, period.id);

    let stored = stack
        .periods
        .get(period.id)
        .await
        .expect("failed to fetch period")
        .expect("period missing");
    assert_eq!(stored.status, PeriodStatus::Completed);
    let ended = stored.actual_end_date.expect("terminal period has an end date");
    assert!(ended.date_naive() >= stored.start_date);
    assert!(stored.notes.contains("felt great"));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_future_start_date_is_rejected() {
    let (pool, stack) = stack().await;

    let mut future = request("owner-1", &["meditate"], "2025-01-01", 30);
    future.start_date = Some(Utc::now().date_naive() + chrono::Duration::days(7));

    let result = stack.lifecycle.start(future.clone()).await;
    assert!(matches!(result, Err(DomainError::ValidationFailed(_))));

    // The reset path runs the same guard
    let result = stack.lifecycle.reset(future).await;
    assert!(matches!(result, Err(DomainError::ValidationFailed(_))));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_completion_runs_handlers_in_fixed_order() {
    let (pool, stack) = stack().await;

    let period = stack
        .lifecycle
        .start(request("owner-1", &["meditate", "journal"], "2025-01-01", 7))
        .await
        .unwrap();

    let receipt = stack
        .lifecycle
        .complete(period.id, "owner-1", None, false)
        .await
        .unwrap();

    let names: Vec<&str> = receipt
        .event_results
        .iter()
        .map(|r| r.handler.as_str())
        .collect();
    assert_eq!(names, vec!["habit", "analytics", "notification"]);
    assert!(receipt.event_results.iter().all(|r| r.success));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_double_completion_is_rejected_without_side_effects() {
    let (pool, stack) = stack().await;

    let period = stack
        .lifecycle
        .start(request("owner-1", &["meditate"], "2025-01-01", 30))
        .await
        .unwrap();

    stack
        .lifecycle
        .complete(period.id, "owner-1", None, false)
        .await
        .expect("first completion must succeed");

    let second = stack
        .lifecycle
        .complete(period.id, "owner-1", None, false)
        .await;
    assert!(matches!(second, Err(DomainError::AlreadyCompleted(id)) if id == period.id));

    // No second notification, no second summary
    let notifications = stack
        .notifications
        .list_for_owner("owner-1", false)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(stack
        .summaries
        .get_for_period(period.id)
        .await
        .unwrap()
        .is_some());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_completing_unknown_period_is_not_found() {
    let (pool, stack) = stack().await;

    let missing = Uuid::new_v4();
    let result = stack.lifecycle.complete(missing, "owner-1", None, false).await;
    assert!(matches!(result, Err(DomainError::PeriodNotFound(id)) if id == missing));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_completion_closes_only_matching_habits() {
    let (pool, stack) = stack().await;

    let period = stack
        .lifecycle
        .start(request("owner-1", &["meditate", "journal"], "2025-01-01", 7))
        .await
        .unwrap();

    // An active assignment outside the period's habit set
    stack
        .habits
        .activate_or_create("owner-1", "run 5k")
        .await
        .unwrap();
    // Another owner's assignment with a matching name
    stack
        .habits
        .activate_or_create("owner-2", "meditate")
        .await
        .unwrap();

    stack
        .lifecycle
        .complete(period.id, "owner-1", None, false)
        .await
        .unwrap();

    for name in ["meditate", "journal"] {
        let assignment = stack
            .habits
            .find_active_by_name("owner-1", name)
            .await
            .unwrap();
        assert!(assignment.is_none(), "{name} should have been completed");
    }
    assert!(stack
        .habits
        .find_active_by_name("owner-1", "run 5k")
        .await
        .unwrap()
        .is_some());
    assert!(stack
        .habits
        .find_active_by_name("owner-2", "meditate")
        .await
        .unwrap()
        .is_some());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_analytics_summary_from_tracked_days() {
    let (pool, stack) = stack().await;

    let period = stack
        .lifecycle
        .start(request("owner-1", &["meditate", "journal"], "2025-01-01", 4))
        .await
        .unwrap();

    // All 4 planned days tracked at full completion
    for day in ["2025-01-01", "2025-01-02", "2025-01-03", "2025-01-04"] {
        stack
            .progress
            .create(&DailyProgressRecord::new("owner-1", date(day), 2, 2, Some(4)))
            .await
            .unwrap();
    }

    stack
        .lifecycle
        .complete(period.id, "owner-1", None, false)
        .await
        .unwrap();

    let summary = stack
        .summaries
        .get_for_period(period.id)
        .await
        .unwrap()
        .expect("summary must be synthesized");
    assert_eq!(summary.owner_id, "owner-1");
    assert!((summary.adherence_rate - 100.0).abs() < 1e-9);
    assert_eq!(summary.average_mood, Some(4.0));
    assert_eq!(summary.insights["tracked_days"], 4);
    assert_eq!(summary.insights["planned_days"], 4);
    assert_eq!(summary.insights["fully_completed_days"], 4);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_early_completion_keeps_planned_days_denominator() {
    let (pool, stack) = stack().await;

    // A 30-day plan completed after only 5 fully-tracked days
    let period = stack
        .lifecycle
        .start(request("owner-1", &["meditate"], "2025-01-01", 30))
        .await
        .unwrap();
    for day in 1..=5 {
        stack
            .progress
            .create(&DailyProgressRecord::new(
                "owner-1",
                date(&format!("2025-01-0{day}")),
                1,
                1,
                None,
            ))
            .await
            .unwrap();
    }

    stack
        .lifecycle
        .complete(period.id, "owner-1", None, false)
        .await
        .unwrap();

    let summary = stack
        .summaries
        .get_for_period(period.id)
        .await
        .unwrap()
        .unwrap();
    // 5 of 30 planned days, not 5 of the 5 elapsed
    assert!((summary.adherence_rate - 100.0 * 5.0 / 30.0).abs() < 1e-9);
    assert_eq!(summary.insights["planned_days"], 30);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_failing_notification_handler_degrades_independently() {
    let (pool, stack) = stack().await;

    let period = stack
        .lifecycle
        .start(request("owner-1", &["meditate"], "2025-01-01", 7))
        .await
        .unwrap();

    // Break only the notification store; the completion and the other
    // handlers must still succeed.
    sqlx::query("DROP TABLE notifications")
        .execute(&pool)
        .await
        .unwrap();

    let receipt = stack
        .lifecycle
        .complete(period.id, "owner-1", None, false)
        .await
        .expect("completion itself must not fail");

    assert!(receipt.event_results[0].success, "habit handler");
    assert!(receipt.event_results[1].success, "analytics handler");
    assert!(!receipt.event_results[2].success, "notification handler");
    assert!(receipt.event_results[2].error.is_some());

    let stored = stack.periods.get(period.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PeriodStatus::Completed);
    assert!(stack
        .summaries
        .get_for_period(period.id)
        .await
        .unwrap()
        .is_some());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_start_refuses_second_active_period() {
    let (pool, stack) = stack().await;

    stack
        .lifecycle
        .start(request("owner-1", &["meditate"], "2025-01-01", 30))
        .await
        .unwrap();

    let second = stack
        .lifecycle
        .start(request("owner-1", &["journal"], "2025-01-05", 30))
        .await;
    assert!(matches!(second, Err(DomainError::ActivePeriodExists(_))));

    // A different owner is unaffected
    stack
        .lifecycle
        .start(request("owner-2", &["meditate"], "2025-01-01", 30))
        .await
        .expect("other owners can start periods");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_reset_abandons_current_period_and_keeps_history() {
    let (pool, stack) = stack().await;

    let old = stack
        .lifecycle
        .start(request("owner-1", &["meditate"], "2025-01-01", 30))
        .await
        .unwrap();

    let receipt = stack
        .lifecycle
        .reset(request("owner-1", &["journal"], "2025-02-01", 14))
        .await
        .expect("reset must succeed");
    assert_eq!(receipt.abandoned_period_id, Some(old.id));

    let abandoned = stack.periods.get(old.id).await.unwrap().unwrap();
    assert_eq!(abandoned.status, PeriodStatus::Abandoned);
    assert!(abandoned.actual_end_date.is_some());
    assert!(abandoned.notes.contains("reset"));

    // Old habit set closed, new one active
    assert!(stack
        .habits
        .find_active_by_name("owner-1", "meditate")
        .await
        .unwrap()
        .is_none());
    assert!(stack
        .habits
        .find_active_by_name("owner-1", "journal")
        .await
        .unwrap()
        .is_some());

    // No completion event for an abandoned period
    assert!(stack
        .notifications
        .list_for_owner("owner-1", false)
        .await
        .unwrap()
        .is_empty());
    assert!(stack.summaries.get_for_period(old.id).await.unwrap().is_none());

    // Both periods remain queryable
    let history = stack.periods.list_for_owner("owner-1").await.unwrap();
    assert_eq!(history.len(), 2);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_reset_without_active_period_just_starts_one() {
    let (pool, stack) = stack().await;

    let receipt = stack
        .lifecycle
        .reset(request("owner-1", &["meditate"], "2025-01-01", 30))
        .await
        .unwrap();
    assert!(receipt.abandoned_period_id.is_none());

    let active = stack
        .periods
        .find_active_for_owner("owner-1")
        .await
        .unwrap();
    assert!(active.is_some());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_progress_report_aggregates_tracked_days() {
    let (pool, stack) = stack().await;

    let start = Utc::now().date_naive() - chrono::Duration::days(3);
    let period = stack
        .lifecycle
        .start(PeriodRequest {
            owner_id: "owner-1".to_string(),
            intervention_name: "Sleep Hygiene".to_string(),
            habit_names: vec!["meditate".to_string()],
            duration_days: 30,
            start_date: Some(start),
            cycle_phase: None,
            intake_ref: None,
        })
        .await
        .unwrap();

    stack
        .progress
        .create(&DailyProgressRecord::new("owner-1", start, 2, 2, Some(3)))
        .await
        .unwrap();
    stack
        .progress
        .create(&DailyProgressRecord::new(
            "owner-1",
            start + chrono::Duration::days(1),
            2,
            1,
            Some(5),
        ))
        .await
        .unwrap();

    let report = stack.lifecycle.get_progress(period.id).await.unwrap();
    assert_eq!(report.total_days, 30);
    assert_eq!(report.days_passed, 4);
    assert_eq!(report.tracked_days, 2);
    assert_eq!(report.fully_completed_days, 1);
    assert!((report.completion_rate - 75.0).abs() < 1e-9);
    assert_eq!(report.average_mood, Some(4.0));

    teardown_test_db(pool).await;
}
