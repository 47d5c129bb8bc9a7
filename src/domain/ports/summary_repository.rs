//! Completion summary repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::CompletionSummary;

/// Repository interface for `CompletionSummary` persistence.
#[async_trait]
pub trait SummaryRepository: Send + Sync {
    /// Insert a summary. At most one summary exists per period.
    async fn create(&self, summary: &CompletionSummary) -> DomainResult<()>;

    /// Get the summary for a period, if one was synthesized.
    async fn get_for_period(&self, period_id: Uuid) -> DomainResult<Option<CompletionSummary>>;
}
