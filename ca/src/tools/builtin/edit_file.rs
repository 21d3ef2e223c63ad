//! edit_file tool - replace text in a file, or create it

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolError, parse_input};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EditFileInput {
    path: String,
    #[serde(default)]
    old_str: String,
    #[serde(default)]
    new_str: String,
}

/// Replace every occurrence of a string in a file
///
/// A missing file is created when `old_str` is empty. Writes go straight to
/// the target; there is no temp-file-and-rename step.
pub struct EditFileTool;

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &'static str {
        "edit_file"
    }

    fn description(&self) -> &'static str {
        "Make edits to a text file.

Replaces 'old_str' with 'new_str' in the given file. 'old_str' and 'new_str' MUST be different from each other.

If the file specified with path doesn't exist, it will be created.
"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to the file"
                },
                "old_str": {
                    "type": "string",
                    "description": "Text to search for - must match exactly and must only have one match exactly"
                },
                "new_str": {
                    "type": "string",
                    "description": "Text to replace old_str with"
                }
            },
            "required": ["path"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let EditFileInput { path, old_str, new_str } = parse_input(input)?;
        debug!(%path, "EditFileTool::execute: called");

        if path.is_empty() || old_str == new_str {
            debug!("EditFileTool::execute: rejected parameters");
            return Err(ToolError::InvalidInput("invalid input parameters".to_string()));
        }

        let full_path = ctx.resolve(&path);
        let content = match tokio::fs::read_to_string(&full_path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound && old_str.is_empty() => {
                debug!("EditFileTool::execute: file missing, creating");
                return create_new_file(&full_path, &path, &new_str).await;
            }
            Err(e) => return Err(ToolError::from_io("read file", &path, e)),
        };

        let new_content = content.replace(&old_str, &new_str);
        if new_content == content && !old_str.is_empty() {
            debug!("EditFileTool::execute: old_str not found in file");
            return Err(ToolError::InvalidInput("old_str not found in file".to_string()));
        }

        tokio::fs::write(&full_path, new_content)
            .await
            .map_err(|e| ToolError::from_io("write file", &path, e))?;

        debug!("EditFileTool::execute: file written successfully");
        Ok("OK".to_string())
    }
}

async fn create_new_file(full_path: &Path, path: &str, content: &str) -> Result<String, ToolError> {
    if let Some(dir) = full_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ToolError::from_io("create directory", dir, e))?;
    }

    tokio::fs::write(full_path, content)
        .await
        .map_err(|e| ToolError::from_io("create file", path, e))?;

    Ok(format!("Successfully created file {}", path))
}
