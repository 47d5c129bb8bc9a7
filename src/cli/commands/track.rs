//! Daily progress recording command (the thin storage write performed by
//! the daily-tracking flow).

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Args;

use crate::cli::open_stack;
use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::DomainError;
use crate::domain::models::DailyProgressRecord;

#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Owner recording progress
    #[arg(long)]
    pub owner: String,

    /// Day being recorded (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Habits scheduled that day
    #[arg(long)]
    pub total: u32,

    /// Habits completed that day
    #[arg(long)]
    pub completed: u32,

    /// Mood score (1-5)
    #[arg(long)]
    pub mood: Option<u8>,
}

#[derive(Debug, serde::Serialize)]
pub struct TrackOutput {
    pub success: bool,
    pub record_id: String,
    pub date: String,
}

impl CommandOutput for TrackOutput {
    fn to_human(&self) -> String {
        format!("Recorded progress for {}", self.date)
    }
}

pub async fn execute(args: TrackArgs, json: bool) -> Result<()> {
    let (_config, stack) = open_stack().await?;

    let record = DailyProgressRecord::new(
        args.owner,
        args.date.unwrap_or_else(|| Utc::now().date_naive()),
        args.total,
        args.completed,
        args.mood,
    );
    record.validate().map_err(DomainError::ValidationFailed)?;
    stack.progress.create(&record).await?;

    output(
        &TrackOutput {
            success: true,
            record_id: record.id.to_string(),
            date: record.date.to_string(),
        },
        json,
    );
    Ok(())
}
