//! SQLite adapter for PeriodRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_date, parse_datetime, parse_optional_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{InterventionPeriod, PeriodStatus};
use crate::domain::ports::PeriodRepository;

#[derive(Clone)]
pub struct SqlitePeriodRepository {
    pool: SqlitePool,
}

impl SqlitePeriodRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Terminal transition as a single conditional write: only rows still
    /// in `active` are touched, so two racing callers cannot both win.
    async fn terminate_if_active(
        &self,
        id: Uuid,
        new_status: PeriodStatus,
        ended_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE intervention_periods
             SET status = ?2,
                 actual_end_date = ?3,
                 updated_at = ?4,
                 notes = CASE
                     WHEN ?5 IS NULL THEN notes
                     WHEN notes = '' THEN ?5
                     ELSE notes || char(10) || ?5
                 END
             WHERE id = ?1 AND status = 'active'",
        )
        .bind(id.to_string())
        .bind(new_status.as_str())
        .bind(ended_at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(note)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct PeriodRow {
    id: String,
    owner_id: String,
    intervention_name: String,
    intervention_ref: Option<String>,
    habit_names: String,
    start_date: String,
    planned_end_date: String,
    actual_end_date: Option<String>,
    status: String,
    notes: String,
    created_at: String,
    updated_at: String,
}

fn row_to_period(row: PeriodRow) -> DomainResult<InterventionPeriod> {
    let habit_names: Vec<String> = serde_json::from_str(&row.habit_names)
        .map_err(|e| DomainError::SerializationError(format!("habit_names: {e}")))?;

    Ok(InterventionPeriod {
        id: parse_uuid(&row.id)?,
        owner_id: row.owner_id,
        intervention_name: row.intervention_name,
        intervention_ref: row.intervention_ref,
        habit_names,
        start_date: parse_date(&row.start_date)?,
        planned_end_date: parse_date(&row.planned_end_date)?,
        actual_end_date: parse_optional_datetime(row.actual_end_date)?,
        status: PeriodStatus::from_str(&row.status).unwrap_or(PeriodStatus::Active),
        notes: row.notes,
        created_at: parse_datetime(&row.created_at)?,
        updated_at: parse_datetime(&row.updated_at)?,
    })
}

#[async_trait]
impl PeriodRepository for SqlitePeriodRepository {
    async fn create(&self, period: &InterventionPeriod) -> DomainResult<()> {
        let habit_names = serde_json::to_string(&period.habit_names)?;
        let actual_end = period.actual_end_date.map(|dt| dt.to_rfc3339());

        sqlx::query(
            "INSERT INTO intervention_periods
             (id, owner_id, intervention_name, intervention_ref, habit_names,
              start_date, planned_end_date, actual_end_date, status, notes,
              created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(period.id.to_string())
        .bind(&period.owner_id)
        .bind(&period.intervention_name)
        .bind(&period.intervention_ref)
        .bind(&habit_names)
        .bind(period.start_date.to_string())
        .bind(period.planned_end_date.to_string())
        .bind(&actual_end)
        .bind(period.status.as_str())
        .bind(&period.notes)
        .bind(period.created_at.to_rfc3339())
        .bind(period.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<InterventionPeriod>> {
        let row: Option<PeriodRow> =
            sqlx::query_as("SELECT * FROM intervention_periods WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(row_to_period).transpose()
    }

    async fn find_active_for_owner(
        &self,
        owner_id: &str,
    ) -> DomainResult<Option<InterventionPeriod>> {
        let row: Option<PeriodRow> = sqlx::query_as(
            "SELECT * FROM intervention_periods
             WHERE owner_id = ? AND status = 'active'
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_period).transpose()
    }

    async fn list_for_owner(&self, owner_id: &str) -> DomainResult<Vec<InterventionPeriod>> {
        let rows: Vec<PeriodRow> = sqlx::query_as(
            "SELECT * FROM intervention_periods
             WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_period).collect()
    }

    async fn list_expired_active(
        &self,
        today: NaiveDate,
    ) -> DomainResult<Vec<InterventionPeriod>> {
        let rows: Vec<PeriodRow> = sqlx::query_as(
            "SELECT * FROM intervention_periods
             WHERE status = 'active' AND planned_end_date <= ?
             ORDER BY planned_end_date ASC",
        )
        .bind(today.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_period).collect()
    }

    async fn complete_if_active(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> DomainResult<bool> {
        self.terminate_if_active(id, PeriodStatus::Completed, ended_at, note)
            .await
    }

    async fn abandon_if_active(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> DomainResult<bool> {
        self.terminate_if_active(id, PeriodStatus::Abandoned, ended_at, note)
            .await
    }
}
