// anomabot/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the status and notifications only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Commands::Run {
            test_id,
            project_dir,
            dry_run,
        } => commands::run::execute(project_dir, test_id, dry_run).await,
        Commands::List { project_dir } => commands::list::execute(project_dir),
        Commands::Validate { project_dir } => commands::validate::execute(project_dir),
        Commands::Query {
            query,
            project,
            project_dir,
            limit,
        } => commands::query::execute(project_dir, query, project, limit).await,
    }
}
