//! Implementation of the `regimen init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
    pub database_initialized: bool,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        lines.push(format!("Config written to {}", self.config_path.display()));
        if self.database_initialized {
            lines.push("Database initialized at .regimen/regimen.db".to_string());
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, json: bool) -> Result<()> {
    let base = args.path.join(".regimen");
    let config_path = base.join("config.yaml");

    if config_path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; rerun with --force to overwrite",
            config_path.display()
        );
    }

    fs::create_dir_all(&base)
        .await
        .context("Failed to create .regimen directory")?;

    let config = Config::default();
    let yaml = format!(
        "database:\n  path: {}\n  max_connections: {}\nlogging:\n  level: {}\n  format: {}\nscheduler:\n  tick_interval_secs: {}\n  sweep_hour: {}\n",
        config.database.path,
        config.database.max_connections,
        config.logging.level,
        config.logging.format,
        config.scheduler.tick_interval_secs,
        config.scheduler.sweep_hour,
    );
    fs::write(&config_path, yaml)
        .await
        .context("Failed to write config.yaml")?;

    let db_path = args.path.join(&config.database.path);
    let pool = initialize_database(
        &format!("sqlite:{}", db_path.display()),
        config.database.max_connections,
    )
    .await
    .context("Failed to initialize database")?;
    pool.close().await;

    output(
        &InitOutput {
            success: true,
            message: "Initialized regimen".to_string(),
            config_path,
            database_initialized: true,
        },
        json,
    );
    Ok(())
}
