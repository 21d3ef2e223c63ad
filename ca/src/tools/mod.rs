//! Tool system for the chat loop
//!
//! Tools give the model access to the local file system. Paths resolve
//! against the process working directory with no sandboxing: a tool can
//! touch anything the process user can.

mod context;
mod error;
mod registry;
mod traits;

pub mod builtin;

pub use context::ToolContext;
pub use error::ToolError;
pub use registry::{DuplicateToolError, TOOL_NOT_FOUND, ToolRegistry};
pub use traits::{Tool, ToolResult, parse_input};
