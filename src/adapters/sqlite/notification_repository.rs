//! SQLite adapter for NotificationRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Notification;
use crate::domain::ports::NotificationRepository;

#[derive(Clone)]
pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: String,
    owner_id: String,
    kind: String,
    title: String,
    body: String,
    payload: String,
    read: i64,
    created_at: String,
}

fn row_to_notification(row: NotificationRow) -> DomainResult<Notification> {
    let payload: serde_json::Value = serde_json::from_str(&row.payload)
        .map_err(|e| DomainError::SerializationError(format!("payload: {e}")))?;

    Ok(Notification {
        id: parse_uuid(&row.id)?,
        owner_id: row.owner_id,
        kind: row.kind,
        title: row.title,
        body: row.body,
        payload,
        read: row.read != 0,
        created_at: parse_datetime(&row.created_at)?,
    })
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn create(&self, notification: &Notification) -> DomainResult<()> {
        let payload = serde_json::to_string(&notification.payload)?;

        sqlx::query(
            "INSERT INTO notifications
             (id, owner_id, kind, title, body, payload, read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(notification.id.to_string())
        .bind(&notification.owner_id)
        .bind(&notification.kind)
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&payload)
        .bind(i64::from(notification.read))
        .bind(notification.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner_id: &str,
        unread_only: bool,
    ) -> DomainResult<Vec<Notification>> {
        let rows: Vec<NotificationRow> = if unread_only {
            sqlx::query_as(
                "SELECT * FROM notifications
                 WHERE owner_id = ? AND read = 0 ORDER BY created_at DESC",
            )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(
                "SELECT * FROM notifications
                 WHERE owner_id = ? ORDER BY created_at DESC",
            )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?
        };

        rows.into_iter().map(row_to_notification).collect()
    }

    async fn mark_read(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
