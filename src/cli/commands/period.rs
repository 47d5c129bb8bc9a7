//! Intervention period CLI commands.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::open_stack;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::InterventionPeriod;
use crate::services::PeriodRequest;

#[derive(Args, Debug)]
pub struct PeriodArgs {
    #[command(subcommand)]
    pub command: PeriodCommands,
}

#[derive(Subcommand, Debug)]
pub enum PeriodCommands {
    /// Start a new intervention period
    Start {
        /// Owner of the period
        #[arg(long)]
        owner: String,

        /// Intervention name
        #[arg(long)]
        name: String,

        /// Habit names tracked during the period (repeatable)
        #[arg(long = "habit")]
        habits: Vec<String>,

        /// Period length in days
        #[arg(long, default_value = "30")]
        duration: u32,

        /// First day of the period (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Intake reference
        #[arg(long)]
        intake_ref: Option<String>,

        /// Cycle phase annotation
        #[arg(long)]
        cycle_phase: Option<String>,
    },

    /// Complete an active period
    Complete {
        /// Period ID
        id: Uuid,

        /// Requester (already verified by the identity layer)
        #[arg(long, default_value = "cli")]
        requester: String,

        /// Note appended to the period
        #[arg(long)]
        notes: Option<String>,
    },

    /// Abandon the current active period and start a new one
    Reset {
        #[arg(long)]
        owner: String,

        #[arg(long)]
        name: String,

        #[arg(long = "habit")]
        habits: Vec<String>,

        #[arg(long, default_value = "30")]
        duration: u32,

        #[arg(long)]
        start_date: Option<NaiveDate>,

        #[arg(long)]
        intake_ref: Option<String>,

        #[arg(long)]
        cycle_phase: Option<String>,
    },

    /// Show progress aggregates for a period
    Progress {
        /// Period ID
        id: Uuid,
    },

    /// Show a period
    Show {
        /// Period ID
        id: Uuid,
    },

    /// List an owner's periods (full history; rows are never deleted)
    List {
        #[arg(long)]
        owner: String,
    },
}

// -- Output structs --

#[derive(Debug, serde::Serialize)]
pub struct PeriodOutput {
    pub id: String,
    pub owner_id: String,
    pub intervention_name: String,
    pub status: String,
    pub start_date: String,
    pub planned_end_date: String,
    pub actual_end_date: Option<String>,
    pub habit_names: Vec<String>,
    pub notes: String,
}

impl From<&InterventionPeriod> for PeriodOutput {
    fn from(p: &InterventionPeriod) -> Self {
        Self {
            id: p.id.to_string(),
            owner_id: p.owner_id.clone(),
            intervention_name: p.intervention_name.clone(),
            status: p.status.as_str().to_string(),
            start_date: p.start_date.to_string(),
            planned_end_date: p.planned_end_date.to_string(),
            actual_end_date: p.actual_end_date.map(|dt| dt.to_rfc3339()),
            habit_names: p.habit_names.clone(),
            notes: p.notes.clone(),
        }
    }
}

impl CommandOutput for PeriodOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Period {}", self.id),
            format!("  owner:        {}", self.owner_id),
            format!("  intervention: {}", self.intervention_name),
            format!("  status:       {}", self.status),
            format!("  dates:        {} -> {}", self.start_date, self.planned_end_date),
        ];
        if let Some(ended) = &self.actual_end_date {
            lines.push(format!("  ended:        {ended}"));
        }
        if !self.habit_names.is_empty() {
            lines.push(format!("  habits:       {}", self.habit_names.join(", ")));
        }
        if !self.notes.is_empty() {
            lines.push(format!("  notes:        {}", truncate(&self.notes, 120)));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct PeriodListOutput {
    pub periods: Vec<PeriodOutput>,
    pub total: usize,
}

impl CommandOutput for PeriodListOutput {
    fn to_human(&self) -> String {
        if self.periods.is_empty() {
            return "No intervention periods found.".to_string();
        }

        let mut lines = vec![format!("Found {} period(s):\n", self.total)];
        lines.push(format!(
            "{:<36} {:<10} {:<12} {:<12} {:<25}",
            "ID", "STATUS", "START", "PLANNED END", "INTERVENTION"
        ));
        lines.push("-".repeat(98));
        for p in &self.periods {
            lines.push(format!(
                "{:<36} {:<10} {:<12} {:<12} {:<25}",
                p.id,
                p.status,
                p.start_date,
                p.planned_end_date,
                truncate(&p.intervention_name, 25)
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CompletionOutput {
    pub success: bool,
    pub period_id: String,
    pub event_results: Vec<crate::services::HandlerOutcome>,
}

impl CommandOutput for CompletionOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Completed period {}", self.period_id)];
        for result in &self.event_results {
            let status = if result.success { "ok" } else { "FAILED" };
            let detail = result
                .error
                .clone()
                .or_else(|| result.result.as_ref().map(ToString::to_string))
                .unwrap_or_default();
            lines.push(format!("  {:<14} {status:<6} {detail}", result.handler));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: PeriodArgs, json: bool) -> Result<()> {
    let (_config, stack) = open_stack().await?;

    match args.command {
        PeriodCommands::Start {
            owner,
            name,
            habits,
            duration,
            start_date,
            intake_ref,
            cycle_phase,
        } => {
            let period = stack
                .lifecycle
                .start(PeriodRequest {
                    owner_id: owner,
                    intervention_name: name,
                    habit_names: habits,
                    duration_days: duration,
                    start_date,
                    cycle_phase,
                    intake_ref,
                })
                .await?;
            output(&PeriodOutput::from(&period), json);
        }

        PeriodCommands::Complete {
            id,
            requester,
            notes,
        } => {
            let receipt = stack
                .lifecycle
                .complete(id, &requester, notes.as_deref(), false)
                .await?;
            output(
                &CompletionOutput {
                    success: true,
                    period_id: receipt.period_id.to_string(),
                    event_results: receipt.event_results,
                },
                json,
            );
        }

        PeriodCommands::Reset {
            owner,
            name,
            habits,
            duration,
            start_date,
            intake_ref,
            cycle_phase,
        } => {
            let receipt = stack
                .lifecycle
                .reset(PeriodRequest {
                    owner_id: owner,
                    intervention_name: name,
                    habit_names: habits,
                    duration_days: duration,
                    start_date,
                    cycle_phase,
                    intake_ref,
                })
                .await?;
            let period = stack
                .periods
                .get(receipt.period_id)
                .await?
                .ok_or(crate::domain::errors::DomainError::PeriodNotFound(
                    receipt.period_id,
                ))?;
            output(&PeriodOutput::from(&period), json);
        }

        PeriodCommands::Progress { id } => {
            let report = stack.lifecycle.get_progress(id).await?;
            output(&ProgressOutput::from(report), json);
        }

        PeriodCommands::Show { id } => {
            let period = stack
                .periods
                .get(id)
                .await?
                .ok_or(crate::domain::errors::DomainError::PeriodNotFound(id))?;
            output(&PeriodOutput::from(&period), json);
        }

        PeriodCommands::List { owner } => {
            let periods = stack.periods.list_for_owner(&owner).await?;
            output(
                &PeriodListOutput {
                    total: periods.len(),
                    periods: periods.iter().map(PeriodOutput::from).collect(),
                },
                json,
            );
        }
    }

    Ok(())
}

#[derive(Debug, serde::Serialize)]
pub struct ProgressOutput {
    pub average_mood: Option<f64>,
    pub days_passed: i64,
    pub total_days: i64,
    pub fully_completed_days: usize,
    pub tracked_days: usize,
    pub completion_rate: f64,
}

impl From<crate::services::ProgressReport> for ProgressOutput {
    fn from(r: crate::services::ProgressReport) -> Self {
        Self {
            average_mood: r.average_mood,
            days_passed: r.days_passed,
            total_days: r.total_days,
            fully_completed_days: r.fully_completed_days,
            tracked_days: r.tracked_days,
            completion_rate: r.completion_rate,
        }
    }
}

impl CommandOutput for ProgressOutput {
    fn to_human(&self) -> String {
        let mood = self
            .average_mood
            .map_or_else(|| "n/a".to_string(), |m| format!("{m:.1}"));
        [
            format!("Day {}/{}", self.days_passed, self.total_days),
            format!(
                "  tracked days:     {} ({} fully completed)",
                self.tracked_days, self.fully_completed_days
            ),
            format!("  completion rate:  {:.0}%", self.completion_rate),
            format!("  average mood:     {mood}"),
        ]
        .join("\n")
    }
}
