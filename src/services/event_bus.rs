//! In-process event bus for completion fan-out.
//!
//! Listeners subscribe to a named event; `publish` invokes them in
//! registration order, synchronously, within the caller's task. Each
//! invocation is wrapped individually: a listener error is captured as a
//! failed outcome and never stops subsequent listeners. There is no
//! persistence, no retry, and no delivery guarantee beyond at-most-once
//! per publish call.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::DomainResult;

/// Event name published when an intervention period completes.
pub const INTERVENTION_COMPLETED: &str = "intervention.completed";

/// Payload published on period completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub period_id: Uuid,
    pub owner_id: String,
    pub intervention_name: String,
    pub habit_names: Vec<String>,
    pub start_date: NaiveDate,
    /// Planned last day of the period; analytics denominators are sized
    /// by the plan, not by when completion actually happened.
    pub planned_end_date: NaiveDate,
    /// The day the period actually reached its terminal state.
    pub end_date: NaiveDate,
    pub auto_completed: bool,
}

/// Per-listener result of a publish call, in registration order.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerOutcome {
    pub handler: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A side-effect handler subscribed to completion events.
#[async_trait]
pub trait CompletionListener: Send + Sync {
    /// Stable name reported in handler outcomes.
    fn name(&self) -> &'static str;

    /// React to the event. The returned value is surfaced to the caller
    /// inside the outcome list; an `Err` is captured, never escalated.
    async fn handle(&self, event: &CompletionEvent) -> DomainResult<serde_json::Value>;
}

/// Ordered publish/subscribe dispatcher keyed by event name.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<HashMap<String, Vec<Arc<dyn CompletionListener>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener to the ordered list for `event_name`.
    pub async fn subscribe(
        &self,
        event_name: impl Into<String>,
        listener: Arc<dyn CompletionListener>,
    ) {
        let mut listeners = self.listeners.write().await;
        listeners.entry(event_name.into()).or_default().push(listener);
    }

    /// Invoke every listener subscribed to `event_name`, in registration
    /// order, capturing one outcome per listener. A failing listener is
    /// logged and recorded; the remaining listeners still run.
    pub async fn publish(&self, event_name: &str, event: &CompletionEvent) -> Vec<HandlerOutcome> {
        let subscribed: Vec<Arc<dyn CompletionListener>> = {
            let listeners = self.listeners.read().await;
            listeners.get(event_name).cloned().unwrap_or_default()
        };

        let mut outcomes = Vec::with_capacity(subscribed.len());
        for listener in subscribed {
            let outcome = match listener.handle(event).await {
                Ok(result) => HandlerOutcome {
                    handler: listener.name().to_string(),
                    success: true,
                    result: Some(result),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(
                        handler = listener.name(),
                        event = event_name,
                        period_id = %event.period_id,
                        "Listener failed: {e}"
                    );
                    HandlerOutcome {
                        handler: listener.name().to_string(),
                        success: false,
                        result: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Number of listeners subscribed to `event_name`.
    pub async fn listener_count(&self, event_name: &str) -> usize {
        self.listeners
            .read()
            .await
            .get(event_name)
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Recorder {
        name: &'static str,
        order: Arc<AtomicUsize>,
        seen_at: AtomicUsize,
        fail: bool,
    }

    impl Recorder {
        fn new(name: &'static str, order: Arc<AtomicUsize>, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                order,
                seen_at: AtomicUsize::new(usize::MAX),
                fail,
            })
        }
    }

    #[async_trait]
    impl CompletionListener for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn handle(&self, _event: &CompletionEvent) -> DomainResult<serde_json::Value> {
            let position = self.order.fetch_add(1, Ordering::SeqCst);
            self.seen_at.store(position, Ordering::SeqCst);
            if self.fail {
                return Err(DomainError::DatabaseError("store offline".to_string()));
            }
            Ok(serde_json::json!({ "position": position }))
        }
    }

    fn sample_event() -> CompletionEvent {
        CompletionEvent {
            period_id: Uuid::new_v4(),
            owner_id: "owner-1".to_string(),
            intervention_name: "Sleep Hygiene".to_string(),
            habit_names: vec!["meditate".to_string()],
            start_date: "2025-01-01".parse().unwrap(),
            planned_end_date: "2025-01-30".parse().unwrap(),
            end_date: "2025-01-30".parse().unwrap(),
            auto_completed: false,
        }
    }

    #[tokio::test]
    async fn test_publish_invokes_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(AtomicUsize::new(0));

        let first = Recorder::new("first", order.clone(), false);
        let second = Recorder::new("second", order.clone(), false);
        bus.subscribe(INTERVENTION_COMPLETED, first.clone()).await;
        bus.subscribe(INTERVENTION_COMPLETED, second.clone()).await;

        let outcomes = bus.publish(INTERVENTION_COMPLETED, &sample_event()).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].handler, "first");
        assert_eq!(outcomes[1].handler, "second");
        assert_eq!(first.seen_at.load(Ordering::SeqCst), 0);
        assert_eq!(second.seen_at.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_listener_does_not_stop_the_rest() {
        let bus = EventBus::new();
        let order = Arc::new(AtomicUsize::new(0));

        bus.subscribe(INTERVENTION_COMPLETED, Recorder::new("ok", order.clone(), false))
            .await;
        bus.subscribe(INTERVENTION_COMPLETED, Recorder::new("broken", order.clone(), true))
            .await;
        let last = Recorder::new("after-broken", order.clone(), false);
        bus.subscribe(INTERVENTION_COMPLETED, last.clone()).await;

        let outcomes = bus.publish(INTERVENTION_COMPLETED, &sample_event()).await;

        assert!(outcomes[0].success);
        assert!(!outcomes[1].success);
        assert!(outcomes[1].error.as_deref().unwrap().contains("store offline"));
        assert!(outcomes[2].success);
        assert_eq!(last.seen_at.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_empty() {
        let bus = EventBus::new();
        let outcomes = bus.publish("unknown.event", &sample_event()).await;
        assert!(outcomes.is_empty());
        assert_eq!(bus.listener_count("unknown.event").await, 0);
    }
}
