//! REPL session - the dispatch loop
//!
//! One user line in, then as many model round trips as it takes for the
//! model to stop asking for tools, then back to the user.

use std::io::Write;
use std::sync::Arc;

use eyre::{Context, Result};
use tracing::{debug, info, warn};

use super::{Console, Conversation, UserInput};
use crate::llm::{CompletionRequest, ContentBlock, LlmClient, StopReason, ToolCall};
use crate::tools::{ToolContext, ToolRegistry};

/// Where the dispatch loop is
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchState {
    /// Waiting for the next user line
    AwaitingUserInput,

    /// The conversation ends with a user turn the model has not answered
    AwaitingModelReply,

    /// A reply was appended and its blocks still need handling
    Interpreting(Vec<ContentBlock>),

    /// Input is exhausted
    Closed,
}

/// Interactive chat session
pub struct ReplSession<W> {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    ctx: ToolContext,
    conversation: Conversation,
    console: Console<W>,
    system_prompt: String,
    max_tokens: u32,
    state: DispatchState,
}

impl<W: Write> ReplSession<W> {
    /// Create a new session writing its side of the chat to `out`
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolRegistry, ctx: ToolContext, out: W) -> Self {
        Self {
            llm,
            tools,
            ctx,
            conversation: Conversation::new(),
            console: Console::new(out),
            system_prompt: String::new(),
            max_tokens: 1024,
            state: DispatchState::AwaitingUserInput,
        }
    }

    /// Set the system prompt; empty sends none
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    /// Drive the loop until input runs out
    pub async fn run(&mut self, input: &mut dyn UserInput) -> Result<()> {
        self.console.banner()?;
        while self.state != DispatchState::Closed {
            self.step(input).await?;
        }
        info!(turns = %self.conversation.len(), "ReplSession::run: input closed");
        Ok(())
    }

    /// Perform one state transition
    pub async fn step(&mut self, input: &mut dyn UserInput) -> Result<()> {
        let state = std::mem::replace(&mut self.state, DispatchState::Closed);
        self.state = match state {
            DispatchState::AwaitingUserInput => self.read_user_input(input)?,
            DispatchState::AwaitingModelReply => self.request_reply().await?,
            DispatchState::Interpreting(blocks) => self.interpret(blocks).await?,
            DispatchState::Closed => DispatchState::Closed,
        };
        debug!(state = ?self.state, "ReplSession::step: transitioned");
        Ok(())
    }

    fn read_user_input(&mut self, input: &mut dyn UserInput) -> Result<DispatchState> {
        let Some(line) = input
            .read_line(&Console::<W>::user_prompt())
            .context("Failed to read user input")?
        else {
            return Ok(DispatchState::Closed);
        };

        if !input.echoes_input() {
            self.console.user(&line)?;
        }

        if line.trim().is_empty() {
            debug!("ReplSession::read_user_input: blank line skipped");
            return Ok(DispatchState::AwaitingUserInput);
        }

        self.conversation.push_user_text(line);
        Ok(DispatchState::AwaitingModelReply)
    }

    async fn request_reply(&mut self) -> Result<DispatchState> {
        debug_assert!(self.conversation.unanswered_tool_uses().is_empty());
        let request = CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            messages: self.conversation.messages().to_vec(),
            tools: self.tools.definitions(),
            max_tokens: self.max_tokens,
        };
        debug!(message_count = %request.messages.len(), "ReplSession::request_reply: calling model");

        match self.llm.complete(request).await {
            Ok(response) => {
                self.conversation.push_assistant(response.content.clone());
                if response.stop_reason == StopReason::MaxTokens {
                    warn!("ReplSession::request_reply: reply truncated at max tokens");
                    self.console.notice("[Response truncated - max tokens reached]")?;
                }
                Ok(DispatchState::Interpreting(response.content))
            }
            Err(e) if e.is_overloaded() => {
                warn!(error = %e, "ReplSession::request_reply: service overloaded");
                self.console
                    .notice(&format!("The model is overloaded right now ({}). Please try again.", e))?;
                Ok(DispatchState::AwaitingUserInput)
            }
            Err(e) => Err(e).context("Inference request failed"),
        }
    }

    async fn interpret(&mut self, blocks: Vec<ContentBlock>) -> Result<DispatchState> {
        let mut results = Vec::new();

        for block in blocks {
            match block {
                ContentBlock::Text { text } => self.console.assistant(&text)?,
                ContentBlock::ToolUse { id, name, input } => {
                    if self.tools.has_tool(&name) {
                        self.console.tool_call(&name, &input)?;
                    }
                    let call = ToolCall { id, name, input };
                    let result = self.tools.execute(&call, &self.ctx).await;
                    results.push(ContentBlock::tool_result(call.id, result.content, result.is_error));
                }
                ContentBlock::ToolResult { .. } => {
                    debug!("ReplSession::interpret: ignoring tool_result in model reply");
                }
            }
        }

        if results.is_empty() {
            return Ok(DispatchState::AwaitingUserInput);
        }

        self.conversation.push_tool_results(results);
        Ok(DispatchState::AwaitingModelReply)
    }
}
