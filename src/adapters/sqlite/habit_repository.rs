//! SQLite adapter for HabitRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::DomainResult;
use crate::domain::models::{HabitAssignment, HabitStatus};
use crate::domain::ports::HabitRepository;

#[derive(Clone)]
pub struct SqliteHabitRepository {
    pool: SqlitePool,
}

impl SqliteHabitRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct HabitRow {
    id: String,
    owner_id: String,
    habit_name: String,
    status: String,
    created_at: String,
    updated_at: String,
}

fn row_to_assignment(row: HabitRow) -> DomainResult<HabitAssignment> {
    Ok(HabitAssignment {
        id: parse_uuid(&row.id)?,
        owner_id: row.owner_id,
        habit_name: row.habit_name,
        status: HabitStatus::from_str(&row.status).unwrap_or(HabitStatus::Active),
        created_at: parse_datetime(&row.created_at)?,
        updated_at: parse_datetime(&row.updated_at)?,
    })
}

#[async_trait]
impl HabitRepository for SqliteHabitRepository {
    async fn create(&self, assignment: &HabitAssignment) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO habit_assignments
             (id, owner_id, habit_name, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(assignment.id.to_string())
        .bind(&assignment.owner_id)
        .bind(&assignment.habit_name)
        .bind(assignment.status.as_str())
        .bind(assignment.created_at.to_rfc3339())
        .bind(assignment.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<HabitAssignment>> {
        let row: Option<HabitRow> = sqlx::query_as("SELECT * FROM habit_assignments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_assignment).transpose()
    }

    async fn find_active_by_name(
        &self,
        owner_id: &str,
        habit_name: &str,
    ) -> DomainResult<Option<HabitAssignment>> {
        let row: Option<HabitRow> = sqlx::query_as(
            "SELECT * FROM habit_assignments
             WHERE owner_id = ?1 AND habit_name = ?2 AND status = 'active'
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(owner_id)
        .bind(habit_name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_assignment).transpose()
    }

    async fn list_for_owner(
        &self,
        owner_id: &str,
        status: Option<HabitStatus>,
    ) -> DomainResult<Vec<HabitAssignment>> {
        let rows: Vec<HabitRow> = if let Some(status) = status {
            sqlx::query_as(
                "SELECT * FROM habit_assignments
                 WHERE owner_id = ?1 AND status = ?2 ORDER BY created_at DESC",
            )
            .bind(owner_id)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(
                "SELECT * FROM habit_assignments
                 WHERE owner_id = ? ORDER BY created_at DESC",
            )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?
        };

        rows.into_iter().map(row_to_assignment).collect()
    }

    async fn complete_matching(
        &self,
        owner_id: &str,
        habit_names: &[String],
    ) -> DomainResult<u64> {
        let mut updated = 0u64;
        let now = Utc::now().to_rfc3339();

        // One conditional update per name; a name with no matching active
        // assignment affects zero rows and is simply skipped.
        for name in habit_names {
            let result = sqlx::query(
                "UPDATE habit_assignments
                 SET status = 'completed', updated_at = ?3
                 WHERE owner_id = ?1 AND habit_name = ?2 AND status = 'active'",
            )
            .bind(owner_id)
            .bind(name)
            .bind(&now)
            .execute(&self.pool)
            .await?;

            updated += result.rows_affected();
        }

        Ok(updated)
    }

    async fn activate_or_create(
        &self,
        owner_id: &str,
        habit_name: &str,
    ) -> DomainResult<HabitAssignment> {
        if let Some(existing) = self.find_active_by_name(owner_id, habit_name).await? {
            return Ok(existing);
        }

        // Reactivate the most recent completed row with this name, if any
        let row: Option<HabitRow> = sqlx::query_as(
            "SELECT * FROM habit_assignments
             WHERE owner_id = ?1 AND habit_name = ?2
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(owner_id)
        .bind(habit_name)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let now = Utc::now();
            sqlx::query(
                "UPDATE habit_assignments SET status = 'active', updated_at = ?2 WHERE id = ?1",
            )
            .bind(&row.id)
            .bind(now.to_rfc3339())
            .execute(&self.pool)
            .await?;

            let mut assignment = row_to_assignment(row)?;
            assignment.status = HabitStatus::Active;
            assignment.updated_at = now;
            return Ok(assignment);
        }

        let assignment = HabitAssignment::new(owner_id, habit_name);
        self.create(&assignment).await?;
        Ok(assignment)
    }
}
