//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// Chat with Claude from the terminal, with access to local files
#[derive(Debug, Parser)]
#[command(
    name = "ca",
    about = "Terminal chat with Claude that can read, list and edit local files",
    version,
    after_help = "Logs are written to: ~/.local/share/codeagent/logs/codeagent.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Override the configured model
    #[arg(short, long, help = "Model to chat with")]
    pub model: Option<String>,
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("codeagent")
        .join("logs")
        .join("codeagent.log")
}
