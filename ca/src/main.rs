//! ca - terminal chat with Claude
//!
//! CLI entry point: parse arguments, set up logging, load config, chat.

use std::fs;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use codeagent::cli::{Cli, get_log_path};
use codeagent::config::Config;
use codeagent::repl;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Log to file: stdout carries the conversation
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(model) = cli.model {
        config.llm.model = model;
    }

    info!(model = %config.llm.model, "ca starting");

    repl::run_interactive(&config).await
}
