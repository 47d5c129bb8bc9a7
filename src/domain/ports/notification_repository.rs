//! Notification repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::Notification;

/// Repository interface for `Notification` persistence.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert a notification.
    async fn create(&self, notification: &Notification) -> DomainResult<()>;

    /// List an owner's notifications, newest first. `unread_only` filters
    /// to notifications not yet marked read.
    async fn list_for_owner(
        &self,
        owner_id: &str,
        unread_only: bool,
    ) -> DomainResult<Vec<Notification>>;

    /// Mark a notification read. Returns false when the ID is unknown.
    async fn mark_read(&self, id: Uuid) -> DomainResult<bool>;
}
