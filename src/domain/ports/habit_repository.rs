//! Habit assignment repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{HabitAssignment, HabitStatus};

/// Repository interface for `HabitAssignment` persistence.
///
/// Assignments are deactivated by status change, never deleted.
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// Create a new assignment.
    async fn create(&self, assignment: &HabitAssignment) -> DomainResult<()>;

    /// Get an assignment by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<HabitAssignment>>;

    /// Find the owner's active assignment with the given habit name.
    async fn find_active_by_name(
        &self,
        owner_id: &str,
        habit_name: &str,
    ) -> DomainResult<Option<HabitAssignment>>;

    /// List an owner's assignments, optionally filtered by status.
    async fn list_for_owner(
        &self,
        owner_id: &str,
        status: Option<HabitStatus>,
    ) -> DomainResult<Vec<HabitAssignment>>;

    /// Mark the owner's active assignments matching any of `habit_names`
    /// as completed. Names with no matching active assignment are skipped,
    /// not an error. Returns the number of assignments updated.
    async fn complete_matching(&self, owner_id: &str, habit_names: &[String])
        -> DomainResult<u64>;

    /// Reactivate the owner's existing assignment with this name, or create
    /// a fresh active one when none exists. Returns the resulting row.
    async fn activate_or_create(
        &self,
        owner_id: &str,
        habit_name: &str,
    ) -> DomainResult<HabitAssignment>;
}
