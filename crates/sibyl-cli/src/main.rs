//! `syb`: ask questions of your database in natural language

mod bootstrap;
mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("sibyl={log_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = bootstrap::load_config(&cli.config).await?;

    match cli.command {
        Commands::Ask { question } => commands::ask::run(&config, &question.join(" ")).await,
        Commands::Train { action } => commands::train::run(&config, action).await,
    }
}
