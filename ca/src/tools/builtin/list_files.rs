//! list_files tool - recursive listing as a JSON array

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::tools::{Tool, ToolContext, ToolError, parse_input};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListFilesInput {
    #[serde(default)]
    path: Option<String>,
}

/// List every file and directory below a path
pub struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &'static str {
        "list_files"
    }

    fn description(&self) -> &'static str {
        "List files and directories at a given path. If no path is provided, lists files in the current directory."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Optional relative path to list files from. Defaults to current directory if not provided."
                }
            },
            "additionalProperties": false
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let input: ListFilesInput = if input.is_null() {
            ListFilesInput::default()
        } else {
            parse_input(input)?
        };
        let path = input.path.filter(|p| !p.is_empty()).unwrap_or_else(|| ".".to_string());
        debug!(%path, "ListFilesTool::execute: called");

        let entries = walk(&ctx.resolve(&path)).map_err(|e| {
            debug!(%e, "ListFilesTool::execute: walk failed");
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            // Any walk failure, a missing root included, is an I/O error
            ToolError::Io {
                action: "list directory",
                path: path.clone().into(),
                source,
            }
        })?;
        debug!(entries_count = %entries.len(), "ListFilesTool::execute: entries collected");

        serde_json::to_string(&entries).map_err(|e| ToolError::InvalidInput(e.to_string()))
    }
}

/// Collect descendants of `root` relative to it, directories suffixed with `/`
///
/// Entries come back in traversal order. The first error ends the walk.
fn walk(root: &Path) -> Result<Vec<String>, walkdir::Error> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let mut name = relative.to_string_lossy().into_owned();
        if entry.file_type().is_dir() {
            name.push('/');
        }
        entries.push(name);
    }
    Ok(entries)
}
