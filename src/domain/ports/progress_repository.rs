//! Daily progress repository port.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::errors::DomainResult;
use crate::domain::models::DailyProgressRecord;

/// Repository interface for `DailyProgressRecord` persistence.
///
/// The completion subsystem only reads these records; the single write is
/// the thin storage insert the daily-tracking flow performs.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Insert a daily progress record.
    async fn create(&self, record: &DailyProgressRecord) -> DomainResult<()>;

    /// Fetch an owner's records with `from <= date <= to`, in chronological
    /// entry order (date, then insertion time).
    async fn find_range(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<DailyProgressRecord>>;
}
