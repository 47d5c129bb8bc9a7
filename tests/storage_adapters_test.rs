mod helpers;

use chrono::NaiveDate;
use regimen::adapters::sqlite::{
    SqliteHabitRepository, SqliteNotificationRepository, SqliteProgressRepository,
    SqliteSummaryRepository,
};
use regimen::domain::models::{
    CompletionSummary, DailyProgressRecord, HabitStatus, MoodTrend, Notification,
};
use regimen::domain::ports::{
    HabitRepository, NotificationRepository, ProgressRepository, SummaryRepository,
};
use uuid::Uuid;

use helpers::database::{setup_test_db, teardown_test_db};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_complete_matching_updates_only_named_active_habits() {
    let pool = setup_test_db().await;
    let repo = SqliteHabitRepository::new(pool.clone());

    repo.activate_or_create("owner-1", "meditate").await.unwrap();
    repo.activate_or_create("owner-1", "journal").await.unwrap();
    repo.activate_or_create("owner-1", "run 5k").await.unwrap();

    let updated = repo
        .complete_matching(
            "owner-1",
            &[
                "meditate".to_string(),
                "journal".to_string(),
                "does not exist".to_string(),
            ],
        )
        .await
        .unwrap();
    assert_eq!(updated, 2, "unknown names are skipped, not an error");

    let active = repo
        .list_for_owner("owner-1", Some(HabitStatus::Active))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].habit_name, "run 5k");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_activate_or_create_reuses_completed_assignment() {
    let pool = setup_test_db().await;
    let repo = SqliteHabitRepository::new(pool.clone());

    let original = repo.activate_or_create("owner-1", "meditate").await.unwrap();
    repo.complete_matching("owner-1", &["meditate".to_string()])
        .await
        .unwrap();

    let revived = repo.activate_or_create("owner-1", "meditate").await.unwrap();
    assert_eq!(revived.id, original.id, "existing row is reactivated");
    assert!(revived.is_active());

    let stored = repo.get(revived.id).await.unwrap().expect("assignment missing");
    assert!(stored.is_active());

    let all = repo.list_for_owner("owner-1", None).await.unwrap();
    assert_eq!(all.len(), 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_progress_find_range_is_inclusive_and_ordered() {
    let pool = setup_test_db().await;
    let repo = SqliteProgressRepository::new(pool.clone());

    for day in ["2025-01-03", "2025-01-01", "2025-01-05", "2025-01-02"] {
        repo.create(&DailyProgressRecord::new("owner-1", date(day), 2, 1, None))
            .await
            .unwrap();
    }
    // Outside the range, and another owner inside it
    repo.create(&DailyProgressRecord::new("owner-1", date("2025-01-06"), 2, 2, None))
        .await
        .unwrap();
    repo.create(&DailyProgressRecord::new("owner-2", date("2025-01-02"), 2, 2, None))
        .await
        .unwrap();

    let records = repo
        .find_range("owner-1", date("2025-01-01"), date("2025-01-05"))
        .await
        .unwrap();
    let dates: Vec<String> = records.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(
        dates,
        vec!["2025-01-01", "2025-01-02", "2025-01-03", "2025-01-05"]
    );

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_summary_round_trip_and_uniqueness_per_period() {
    let pool = setup_test_db().await;
    let repo = SqliteSummaryRepository::new(pool.clone());

    let period_id = Uuid::new_v4();
    let summary = CompletionSummary::new(
        "owner-1",
        period_id,
        87.5,
        Some(3.6),
        MoodTrend::Improved,
        serde_json::json!({ "tracked_days": 25, "longest_streak": 9 }),
    );
    repo.create(&summary).await.unwrap();

    let stored = repo
        .get_for_period(period_id)
        .await
        .unwrap()
        .expect("summary missing");
    assert_eq!(stored.id, summary.id);
    assert!((stored.adherence_rate - 87.5).abs() < 1e-9);
    assert_eq!(stored.mood_trend, MoodTrend::Improved);
    assert_eq!(stored.insights["longest_streak"], 9);

    // UNIQUE(period_id) rejects a second summary for the same period
    let duplicate = CompletionSummary::new(
        "owner-1",
        period_id,
        10.0,
        None,
        MoodTrend::Stable,
        serde_json::json!({}),
    );
    assert!(repo.create(&duplicate).await.is_err());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_notifications_list_and_mark_read() {
    let pool = setup_test_db().await;
    let repo = SqliteNotificationRepository::new(pool.clone());

    let first = Notification::new(
        "owner-1",
        "intervention_completed",
        "Sleep Hygiene completed",
        "You completed your Sleep Hygiene intervention after 30 days. Well done!",
        serde_json::json!({ "auto_completed": false }),
    );
    repo.create(&first).await.unwrap();
    repo.create(&Notification::new(
        "owner-2",
        "intervention_completed",
        "other owner",
        "body",
        serde_json::json!({}),
    ))
    .await
    .unwrap();

    let unread = repo.list_for_owner("owner-1", true).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].id, first.id);
    assert_eq!(unread[0].payload["auto_completed"], false);

    assert!(repo.mark_read(first.id).await.unwrap());
    assert!(repo.list_for_owner("owner-1", true).await.unwrap().is_empty());
    assert_eq!(repo.list_for_owner("owner-1", false).await.unwrap().len(), 1);

    // Unknown IDs report false instead of erroring
    assert!(!repo.mark_read(Uuid::new_v4()).await.unwrap());

    teardown_test_db(pool).await;
}
