//! Notification domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification kind emitted when a period completes.
pub const KIND_INTERVENTION_COMPLETED: &str = "intervention_completed";

/// A user-facing notification record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub owner_id: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    /// Structured payload attached to the notification (the triggering
    /// event, serialized)
    pub payload: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        owner_id: impl Into<String>,
        kind: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            kind: kind.into(),
            title: title.into(),
            body: body.into(),
            payload,
            read: false,
            created_at: Utc::now(),
        }
    }
}
