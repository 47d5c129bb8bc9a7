//! SQLite adapter for SummaryRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CompletionSummary, MoodTrend};
use crate::domain::ports::SummaryRepository;

#[derive(Clone)]
pub struct SqliteSummaryRepository {
    pool: SqlitePool,
}

impl SqliteSummaryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: String,
    owner_id: String,
    period_id: String,
    adherence_rate: f64,
    average_mood: Option<f64>,
    mood_trend: String,
    insights: String,
    created_at: String,
}

fn row_to_summary(row: SummaryRow) -> DomainResult<CompletionSummary> {
    let insights: serde_json::Value = serde_json::from_str(&row.insights)
        .map_err(|e| DomainError::SerializationError(format!("insights: {e}")))?;

    Ok(CompletionSummary {
        id: parse_uuid(&row.id)?,
        owner_id: row.owner_id,
        period_id: parse_uuid(&row.period_id)?,
        adherence_rate: row.adherence_rate,
        average_mood: row.average_mood,
        mood_trend: MoodTrend::from_str(&row.mood_trend).unwrap_or(MoodTrend::Stable),
        insights,
        created_at: parse_datetime(&row.created_at)?,
    })
}

#[async_trait]
impl SummaryRepository for SqliteSummaryRepository {
    async fn create(&self, summary: &CompletionSummary) -> DomainResult<()> {
        let insights = serde_json::to_string(&summary.insights)?;

        sqlx::query(
            "INSERT INTO completion_summaries
             (id, owner_id, period_id, adherence_rate, average_mood, mood_trend,
              insights, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(summary.id.to_string())
        .bind(&summary.owner_id)
        .bind(summary.period_id.to_string())
        .bind(summary.adherence_rate)
        .bind(summary.average_mood)
        .bind(summary.mood_trend.as_str())
        .bind(&insights)
        .bind(summary.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_for_period(&self, period_id: Uuid) -> DomainResult<Option<CompletionSummary>> {
        let row: Option<SummaryRow> =
            sqlx::query_as("SELECT * FROM completion_summaries WHERE period_id = ?")
                .bind(period_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(row_to_summary).transpose()
    }
}
