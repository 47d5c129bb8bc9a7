//! Domain errors for the regimen system.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the regimen system.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Intervention period not found: {0}")]
    PeriodNotFound(Uuid),

    /// Idempotency signal: the period already reached a terminal state.
    /// Expected on retried requests; well-behaved callers do not treat it
    /// as a failure.
    #[error("Intervention period {0} is already completed or abandoned")]
    AlreadyCompleted(Uuid),

    #[error("Owner {0} already has an active intervention period")]
    ActivePeriodExists(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
