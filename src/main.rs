//! Regimen CLI entry point.

use clap::Parser;

use regimen::cli::{Cli, Commands};
use regimen::infrastructure::config::ConfigLoader;
use regimen::infrastructure::logging;
use regimen::Config;

#[tokio::main]
async fn main() {
    // Logging must come up before anything else; if the config is missing
    // or broken, fall back to defaults here and let the command surface
    // the real error.
    let config = ConfigLoader::load().unwrap_or_else(|_| Config::default());
    logging::init(&config.logging);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => regimen::cli::commands::init::execute(args, cli.json).await,
        Commands::Period(args) => regimen::cli::commands::period::execute(args, cli.json).await,
        Commands::Track(args) => regimen::cli::commands::track::execute(args, cli.json).await,
        Commands::Sweep(args) => regimen::cli::commands::sweep::execute(args, cli.json).await,
        Commands::Notifications(args) => {
            regimen::cli::commands::notifications::execute(args, cli.json).await
        }
    };

    if let Err(err) = result {
        regimen::cli::handle_error(err, cli.json);
    }
}
