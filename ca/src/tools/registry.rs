//! ToolRegistry - the ordered set of tools offered to the model

use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::{ToolCall, ToolDefinition};

use super::builtin::{EditFileTool, ListFilesTool, ReadFileTool};
use super::{Tool, ToolContext, ToolResult};

/// Content of the error result for a tool name the registry does not know
pub const TOOL_NOT_FOUND: &str = "tool not found";

/// A second tool was registered under an existing name
#[derive(Debug, Error)]
#[error("tool already registered: {name}")]
pub struct DuplicateToolError {
    pub name: String,
}

/// Registered tools, in registration order
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a registry with the built-in file tools
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.tools.push(Box::new(ReadFileTool));
        registry.tools.push(Box::new(ListFilesTool));
        registry.tools.push(Box::new(EditFileTool));
        registry
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool; names must be unique
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), DuplicateToolError> {
        if self.has_tool(tool.name()) {
            return Err(DuplicateToolError {
                name: tool.name().to_string(),
            });
        }
        debug!(name = %tool.name(), "ToolRegistry::register: added");
        self.tools.push(tool);
        Ok(())
    }

    /// Get tool definitions for the LLM, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.input_schema()))
            .collect()
    }

    /// Execute a tool call
    ///
    /// Never fails: unknown tools and tool errors both come back as error
    /// results for the model to read.
    pub async fn execute(&self, tool_call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        debug!(id = %tool_call.id, name = %tool_call.name, "ToolRegistry::execute: called");
        let Some(tool) = self.get(&tool_call.name) else {
            warn!(name = %tool_call.name, "ToolRegistry::execute: unknown tool");
            return ToolResult::error(TOOL_NOT_FOUND);
        };

        let result = tool.execute(tool_call.input.clone(), ctx).await;
        if let Err(e) = &result {
            debug!(name = %tool_call.name, error = %e, "ToolRegistry::execute: tool failed");
        }
        result.into()
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
