//! Intervention period repository port.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::InterventionPeriod;

/// Repository interface for `InterventionPeriod` persistence.
///
/// The terminal transitions are single conditional writes: they update the
/// row only while its current status is `active` and report whether a row
/// was affected. That is the concurrency contract that makes `complete()`
/// safe against the manual-call-vs-scheduler race without external locking.
#[async_trait]
pub trait PeriodRepository: Send + Sync {
    /// Create a new period.
    async fn create(&self, period: &InterventionPeriod) -> DomainResult<()>;

    /// Get a period by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<InterventionPeriod>>;

    /// Find the owner's currently active period, if any.
    async fn find_active_for_owner(&self, owner_id: &str)
        -> DomainResult<Option<InterventionPeriod>>;

    /// List all of an owner's periods, newest first. Periods are never
    /// deleted, so this is the full history.
    async fn list_for_owner(&self, owner_id: &str) -> DomainResult<Vec<InterventionPeriod>>;

    /// List active periods whose planned end date is on or before `today`.
    async fn list_expired_active(&self, today: NaiveDate)
        -> DomainResult<Vec<InterventionPeriod>>;

    /// Atomically mark the period completed if it is still active, setting
    /// `actual_end_date` and appending `note` to its notes. Returns false
    /// when no row was affected (the period was already terminal).
    async fn complete_if_active(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> DomainResult<bool>;

    /// Atomically mark the period abandoned if it is still active. Same
    /// contract as [`Self::complete_if_active`].
    async fn abandon_if_active(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> DomainResult<bool>;
}
