//! Notification creation on period completion.

use std::sync::Arc;

use serde_json::json;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Notification, KIND_INTERVENTION_COMPLETED};
use crate::domain::ports::NotificationRepository;
use crate::services::event_bus::{CompletionEvent, CompletionListener};

/// Listener that records one user-facing notification per completion.
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationDispatcher {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }
}

#[async_trait::async_trait]
impl CompletionListener for NotificationDispatcher {
    fn name(&self) -> &'static str {
        "notification"
    }

    async fn handle(&self, event: &CompletionEvent) -> DomainResult<serde_json::Value> {
        let body = if event.auto_completed {
            let days = (event.planned_end_date - event.start_date).num_days() + 1;
            format!(
                "Your {} intervention reached its planned end date and was completed after {days} days.",
                event.intervention_name
            )
        } else {
            let days = (event.end_date - event.start_date).num_days() + 1;
            format!(
                "You completed your {} intervention after {days} days. Well done!",
                event.intervention_name
            )
        };

        let notification = Notification::new(
            event.owner_id.clone(),
            KIND_INTERVENTION_COMPLETED,
            format!("{} completed", event.intervention_name),
            body,
            serde_json::to_value(event)?,
        );
        self.notifications.create(&notification).await?;

        Ok(json!({ "notification_id": notification.id }))
    }
}
