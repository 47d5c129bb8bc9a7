//! Domain models for the regimen system.

pub mod completion_summary;
pub mod config;
pub mod daily_progress;
pub mod habit_assignment;
pub mod intervention_period;
pub mod notification;

pub use completion_summary::{CompletionSummary, MoodTrend};
pub use config::{Config, DatabaseConfig, LoggingConfig, SchedulerSettings};
pub use daily_progress::DailyProgressRecord;
pub use habit_assignment::{HabitAssignment, HabitStatus};
pub use intervention_period::{InterventionPeriod, PeriodStatus};
pub use notification::{Notification, KIND_INTERVENTION_COMPLETED};
