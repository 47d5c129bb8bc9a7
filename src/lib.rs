//! Regimen - Intervention Period Tracker
//!
//! Regimen manages intervention periods: fixed-length runs of habit
//! tracking that end in a completion event. Completing a period fans an
//! event out to isolated handlers that close its habits, synthesize an
//! analytics summary, and dispatch a notification; a background scheduler
//! sweeps expired periods closed once per day.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business logic and domain models
//! - **Adapters Layer** (`adapters`): SQLite persistence
//! - **Service Layer** (`services`): Lifecycle orchestration, event bus, scheduler
//! - **Infrastructure Layer** (`infrastructure`): Configuration loading
//! - **CLI Layer** (`cli`): Command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    CompletionSummary, Config, DailyProgressRecord, DatabaseConfig, HabitAssignment,
    InterventionPeriod, LoggingConfig, MoodTrend, Notification, PeriodStatus, SchedulerSettings,
};
pub use domain::ports::{
    HabitRepository, NotificationRepository, PeriodRepository, ProgressRepository,
    SummaryRepository,
};
pub use infrastructure::config::ConfigLoader;
pub use services::{
    build_completion_stack, AutoCompletionScheduler, CompletionEvent, CompletionListener,
    CompletionStack, EventBus, HandlerOutcome, LifecycleService,
};
