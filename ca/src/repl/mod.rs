//! Interactive chat loop
//!
//! Reads user lines, relays the conversation to the model, and runs the
//! file tools the model asks for until it answers in plain text.

mod console;
mod conversation;
mod input;
mod session;

pub use console::Console;
pub use conversation::Conversation;
pub use input::{LineInput, ReadlineInput, UserInput};
pub use session::{DispatchState, ReplSession};

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use eyre::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::llm::{AnthropicClient, LlmClient};
use crate::tools::{ToolContext, ToolRegistry};

/// Built-in system prompt for a session rooted at `dir`
pub fn default_system_prompt(dir: &Path) -> String {
    format!(
        "You are a coding assistant running in a terminal chat.\n\
         You can read, list and edit files with the provided tools. \
         Relative paths are resolved against the working directory: {}",
        dir.display()
    )
}

/// Run the interactive chat
///
/// Fails before any conversation starts when no API key is available.
pub async fn run_interactive(config: &Config) -> Result<()> {
    let api_key = config.llm.get_api_key()?;
    let llm: Arc<dyn LlmClient> =
        Arc::new(AnthropicClient::new(&config.llm, api_key).context("Failed to create LLM client")?);

    let ctx = ToolContext::current_dir().context("Failed to determine working directory")?;
    let system_prompt = config
        .agent
        .system_prompt
        .clone()
        .unwrap_or_else(|| default_system_prompt(&ctx.root));

    let mut session = ReplSession::new(llm, ToolRegistry::standard(), ctx, std::io::stdout())
        .with_system_prompt(system_prompt)
        .with_max_tokens(config.llm.max_tokens);

    if std::io::stdin().is_terminal() {
        info!("run_interactive: using line editor");
        let mut input = ReadlineInput::new().context("Failed to initialize readline")?;
        session.run(&mut input).await
    } else {
        info!("run_interactive: reading piped stdin");
        let mut input = LineInput::new(std::io::stdin().lock());
        session.run(&mut input).await
    }
}
