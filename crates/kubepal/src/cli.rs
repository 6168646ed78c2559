//! Kubepal app cli definition and entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use kubepal_core::config::get_config;

use crate::log::setup_logging;

/// Kubepal - turn plain english into kubectl commands.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model to use for the session, must be defined in the config.
    #[arg(short, long)]
    model: Option<String>,

    /// Show verbose logs.
    #[arg(short, long)]
    verbose: bool,
}

/// Runs the main CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    // Load configuration
    let config = get_config(None).context("Failed to load configuration")?;

    crate::chat::execute(cli.model.as_deref(), &config).await
}
