//! Auto-completion sweep command: one-shot by default, `--daemon` keeps
//! the scheduler's tick loop running in the foreground.

use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Args;

use crate::cli::open_stack;
use crate::cli::output::{output, CommandOutput};
use crate::services::{AutoCompletionScheduler, SweepOutcome};

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Treat this date as "today" for the expiry check (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Keep running, sweeping once per day at the configured hour
    #[arg(long)]
    pub daemon: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct SweepOutput {
    pub as_of: String,
    pub examined: usize,
    pub completed: usize,
    pub already_terminal: usize,
    pub failed: usize,
}

impl CommandOutput for SweepOutput {
    fn to_human(&self) -> String {
        format!(
            "Sweep for {}: {} examined, {} completed, {} already terminal, {} failed",
            self.as_of, self.examined, self.completed, self.already_terminal, self.failed
        )
    }
}

pub async fn execute(args: SweepArgs, json: bool) -> Result<()> {
    let (config, stack) = open_stack().await?;

    let scheduler = Arc::new(AutoCompletionScheduler::new(
        stack.lifecycle.clone(),
        stack.periods.clone(),
        config.scheduler.clone(),
    ));

    if args.daemon {
        tracing::info!(
            sweep_hour = config.scheduler.sweep_hour,
            tick_interval_secs = config.scheduler.tick_interval_secs,
            "Starting auto-completion scheduler"
        );
        let handle = scheduler.start();
        tokio::signal::ctrl_c().await?;
        scheduler.stop();
        handle.abort();
        return Ok(());
    }

    let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let SweepOutcome {
        examined,
        completed,
        already_terminal,
        failed,
    } = scheduler.run_sweep(as_of).await?;

    output(
        &SweepOutput {
            as_of: as_of.to_string(),
            examined,
            completed,
            already_terminal,
            failed,
        },
        json,
    );
    Ok(())
}
