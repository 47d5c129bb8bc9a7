//! SQLite database adapters for the regimen system.

pub mod connection;
pub mod habit_repository;
pub mod migrations;
pub mod notification_repository;
pub mod period_repository;
pub mod progress_repository;
pub mod summary_repository;

pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError};
pub use habit_repository::SqliteHabitRepository;
pub use migrations::{embedded_migrations, Migration, MigrationError, Migrator};
pub use notification_repository::SqliteNotificationRepository;
pub use period_repository::SqlitePeriodRepository;
pub use progress_repository::SqliteProgressRepository;
pub use summary_repository::SqliteSummaryRepository;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Parse a UUID string from a SQLite row field.
pub fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse a calendar date (`YYYY-MM-DD`) from a SQLite row field.
pub fn parse_date(s: &str) -> DomainResult<NaiveDate> {
    s.parse::<NaiveDate>()
        .map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse an RFC3339 datetime string from a SQLite row field.
pub fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse an optional RFC3339 datetime string from a SQLite row field.
pub fn parse_optional_datetime(s: Option<String>) -> DomainResult<Option<DateTime<Utc>>> {
    s.map(|s| {
        chrono::DateTime::parse_from_rfc3339(&s).map(|d| d.with_timezone(&Utc))
    })
    .transpose()
    .map_err(|e| DomainError::SerializationError(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Open the database and bring its schema up to date.
pub async fn initialize_database(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(database_url, max_connections).await?;
    Migrator::new(pool.clone())
        .run_pending(embedded_migrations())
        .await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    Migrator::new(pool.clone())
        .run_pending(embedded_migrations())
        .await?;
    Ok(pool)
}
