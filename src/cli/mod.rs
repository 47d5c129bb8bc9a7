//! Command-line interface for regimen.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::adapters::sqlite::initialize_database;
use crate::domain::errors::DomainError;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{build_completion_stack, CompletionStack};

#[derive(Parser)]
#[command(name = "regimen")]
#[command(about = "Regimen - intervention period tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize regimen configuration and database
    Init(commands::init::InitArgs),

    /// Intervention period commands
    Period(commands::period::PeriodArgs),

    /// Record daily habit/mood progress
    Track(commands::track::TrackArgs),

    /// Run the auto-completion sweep once, or as a daemon
    Sweep(commands::sweep::SweepArgs),

    /// Notification commands
    Notifications(commands::notifications::NotificationArgs),
}

/// Load config and build the wired completion stack over its database.
pub(crate) async fn open_stack() -> anyhow::Result<(Config, CompletionStack)> {
    let config = ConfigLoader::load()?;
    let pool = initialize_database(
        &format!("sqlite:{}", config.database.path),
        config.database.max_connections,
    )
    .await?;
    let stack = build_completion_stack(pool).await;
    Ok((config, stack))
}

/// Print an error and exit non-zero. Domain errors get their own
/// user-facing messages; `AlreadyCompleted` is an expected idempotency
/// signal and is reported as such.
pub fn handle_error(err: anyhow::Error, json_mode: bool) {
    let (kind, message) = match err.downcast_ref::<DomainError>() {
        Some(DomainError::PeriodNotFound(id)) => {
            ("not_found", format!("No intervention period with id {id}"))
        }
        Some(DomainError::AlreadyCompleted(id)) => (
            "already_completed",
            format!("Period {id} already reached a terminal state; nothing to do"),
        ),
        Some(DomainError::ActivePeriodExists(owner)) => (
            "active_period_exists",
            format!("Owner {owner} already has an active period; use `regimen period reset`"),
        ),
        Some(e) => ("error", e.to_string()),
        None => ("error", err.to_string()),
    };

    if json_mode {
        eprintln!(
            "{}",
            serde_json::json!({ "success": false, "error": kind, "message": message })
        );
    } else {
        eprintln!("Error: {message}");
    }
    std::process::exit(1);
}
