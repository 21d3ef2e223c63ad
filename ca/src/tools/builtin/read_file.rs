//! read_file tool - return a file's contents as text

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolError, parse_input};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReadFileInput {
    path: String,
}

/// Read the contents of a file
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Read the contents of a given relative file path. Use this when you want to see what's inside a file. Do not use this with directory names."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The relative path of a file in the working directory."
                }
            },
            "required": ["path"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let ReadFileInput { path } = parse_input(input)?;
        debug!(%path, "ReadFileTool::execute: called");

        let bytes = tokio::fs::read(ctx.resolve(&path))
            .await
            .map_err(|e| ToolError::from_io("read file", &path, e))?;

        // Invalid UTF-8 sequences become U+FFFD rather than failing the read
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_file_verbatim() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("test.txt"), "line 1\nline 2\n\tindented\n").unwrap();

        let ctx = ToolContext::new(temp.path());
        let result = ReadFileTool
            .execute(serde_json::json!({"path": "test.txt"}), &ctx)
            .await
            .unwrap();

        assert_eq!(result, "line 1\nline 2\n\tindented\n");
    }

    #[tokio::test]
    async fn test_read_file_invalid_utf8_is_lossy() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("bin.dat"), b"ok \xff\xfe end").unwrap();

        let ctx = ToolContext::new(temp.path());
        let result = ReadFileTool
            .execute(serde_json::json!({"path": "bin.dat"}), &ctx)
            .await
            .unwrap();

        assert_eq!(result, "ok \u{FFFD}\u{FFFD} end");
    }

    #[tokio::test]
    async fn test_read_file_not_found() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path());

        let err = ReadFileTool
            .execute(serde_json::json!({"path": "nonexistent.txt"}), &ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::NotFound { .. }));
        assert!(err.to_string().contains("nonexistent.txt"));
    }

    #[tokio::test]
    async fn test_read_file_on_directory_fails() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("subdir")).unwrap();
        let ctx = ToolContext::new(temp.path());

        let err = ReadFileTool
            .execute(serde_json::json!({"path": "subdir"}), &ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::Io { .. }));
        assert!(err.to_string().starts_with("failed to read file subdir"));
    }

    #[tokio::test]
    async fn test_read_file_requires_path() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path());

        let err = ReadFileTool.execute(serde_json::json!({}), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }
}
