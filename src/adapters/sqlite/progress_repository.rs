//! SQLite adapter for ProgressRepository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::adapters::sqlite::{parse_date, parse_datetime, parse_uuid};
use crate::domain::errors::DomainResult;
use crate::domain::models::DailyProgressRecord;
use crate::domain::ports::ProgressRepository;

#[derive(Clone)]
pub struct SqliteProgressRepository {
    pool: SqlitePool,
}

impl SqliteProgressRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProgressRow {
    id: String,
    owner_id: String,
    date: String,
    total_habits: i64,
    completed_habits: i64,
    mood_score: Option<i64>,
    created_at: String,
}

fn row_to_record(row: ProgressRow) -> DomainResult<DailyProgressRecord> {
    Ok(DailyProgressRecord {
        id: parse_uuid(&row.id)?,
        owner_id: row.owner_id,
        date: parse_date(&row.date)?,
        total_habits: row.total_habits.max(0) as u32,
        completed_habits: row.completed_habits.max(0) as u32,
        mood_score: row.mood_score.map(|m| m.clamp(1, 5) as u8),
        created_at: parse_datetime(&row.created_at)?,
    })
}

#[async_trait]
impl ProgressRepository for SqliteProgressRepository {
    async fn create(&self, record: &DailyProgressRecord) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO daily_progress
             (id, owner_id, date, total_habits, completed_habits, mood_score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(record.id.to_string())
        .bind(&record.owner_id)
        .bind(record.date.to_string())
        .bind(i64::from(record.total_habits))
        .bind(i64::from(record.completed_habits))
        .bind(record.mood_score.map(i64::from))
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_range(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<DailyProgressRecord>> {
        let rows: Vec<ProgressRow> = sqlx::query_as(
            "SELECT * FROM daily_progress
             WHERE owner_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date ASC, created_at ASC",
        )
        .bind(owner_id)
        .bind(from.to_string())
        .bind(to.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_record).collect()
    }
}
