//! Port interfaces (traits) for the regimen system.
//!
//! These define the boundaries between the domain and the adapters.

pub mod habit_repository;
pub mod notification_repository;
pub mod period_repository;
pub mod progress_repository;
pub mod summary_repository;

pub use habit_repository::HabitRepository;
pub use notification_repository::NotificationRepository;
pub use period_repository::PeriodRepository;
pub use progress_repository::ProgressRepository;
pub use summary_repository::SummaryRepository;
