//! Conversation - the append-only transcript resent on every turn

use tracing::debug;

use crate::llm::{ContentBlock, Message, Role};

/// Ordered conversation history
///
/// Turns are only ever appended. Every tool_use in an assistant turn is
/// answered by a tool_result in the user turn right after it.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a free-form user message
    pub fn push_user_text(&mut self, text: impl Into<String>) {
        debug!(len = %self.messages.len(), "Conversation::push_user_text: called");
        self.messages.push(Message::user(text));
    }

    /// Append a model reply, blocks kept in reply order
    pub fn push_assistant(&mut self, blocks: Vec<ContentBlock>) {
        debug!(len = %self.messages.len(), "Conversation::push_assistant: called");
        self.messages.push(Message::assistant_blocks(blocks));
    }

    /// Append the tool results answering the previous assistant turn
    pub fn push_tool_results(&mut self, results: Vec<ContentBlock>) {
        debug!(result_count = %results.len(), "Conversation::push_tool_results: called");
        self.messages.push(Message::user_blocks(results));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Ids of tool_use blocks not answered by the following user turn
    pub fn unanswered_tool_uses(&self) -> Vec<String> {
        let mut unanswered = Vec::new();
        for (i, msg) in self.messages.iter().enumerate() {
            if msg.role != Role::Assistant {
                continue;
            }
            let answered: Vec<&str> = match self.messages.get(i + 1) {
                Some(next) if next.role == Role::User => next
                    .blocks()
                    .iter()
                    .filter_map(|b| match b {
                        ContentBlock::ToolResult { tool_use_id, .. } => Some(tool_use_id.as_str()),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            for block in msg.blocks() {
                if let ContentBlock::ToolUse { id, .. } = block
                    && !answered.contains(&id.as_str())
                {
                    unanswered.push(id.clone());
                }
            }
        }
        unanswered
    }
}
