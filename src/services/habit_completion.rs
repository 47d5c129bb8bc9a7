//! Habit closure on period completion.

use std::sync::Arc;

use serde_json::json;

use crate::domain::errors::DomainResult;
use crate::domain::ports::HabitRepository;
use crate::services::event_bus::{CompletionEvent, CompletionListener};

/// Listener that marks the completed period's habit assignments done.
///
/// Assignments are matched by owner and habit name against the event's
/// habit set; a name with no matching active assignment is a no-op, not
/// an error.
pub struct HabitCompletionHandler {
    habits: Arc<dyn HabitRepository>,
}

impl HabitCompletionHandler {
    pub fn new(habits: Arc<dyn HabitRepository>) -> Self {
        Self { habits }
    }
}

#[async_trait::async_trait]
impl CompletionListener for HabitCompletionHandler {
    fn name(&self) -> &'static str {
        "habit"
    }

    async fn handle(&self, event: &CompletionEvent) -> DomainResult<serde_json::Value> {
        let updated = self
            .habits
            .complete_matching(&event.owner_id, &event.habit_names)
            .await?;

        tracing::debug!(
            period_id = %event.period_id,
            habits_completed = updated,
            "Closed habit assignments"
        );

        Ok(json!({ "habits_completed": updated }))
    }
}
