//! Anthropic Claude API client implementation
//!
//! Implements the LlmClient trait for Anthropic's Messages API. Each call is
//! a single blocking request; failures are reported, never retried.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, StopReason, TokenUsage};
use crate::config::{ApiKey, LlmConfig};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// HTTP status Anthropic uses when the service is overloaded
const STATUS_OVERLOADED: u16 = 529;

/// Anthropic Claude API client
pub struct AnthropicClient {
    model: String,
    api_key: ApiKey,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Create a new client from configuration and an already resolved key
    pub fn new(config: &LlmConfig, api_key: ApiKey) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "AnthropicClient::new: called");
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            debug!(%timeout_ms, "AnthropicClient::new: request timeout set");
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder.build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the Anthropic API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, message_count = %request.messages.len(), "build_request_body: called");
        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "messages": request.messages,
        });

        if !request.system_prompt.is_empty() {
            body["system"] = serde_json::json!(request.system_prompt);
        }

        if !request.tools.is_empty() {
            debug!(tool_count = %request.tools.len(), "build_request_body: adding tools");
            body["tools"] = serde_json::json!(
                request
                    .tools
                    .iter()
                    .map(|t| t.to_anthropic_schema())
                    .collect::<Vec<_>>()
            );
        }

        body
    }

    /// Parse the Anthropic API response, keeping block order
    fn parse_response(&self, api_response: AnthropicResponse) -> CompletionResponse {
        debug!(?api_response.stop_reason, "parse_response: called");
        let content = api_response
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(ContentBlock::Text { text }),
                AnthropicContentBlock::ToolUse { id, name, input } => {
                    debug!(%id, %name, "parse_response: ToolUse block");
                    Some(ContentBlock::ToolUse { id, name, input })
                }
                AnthropicContentBlock::Other => {
                    debug!("parse_response: skipping unsupported block");
                    None
                }
            })
            .collect();

        CompletionResponse {
            content,
            stop_reason: api_response
                .stop_reason
                .as_deref()
                .map(StopReason::from_anthropic)
                .unwrap_or(StopReason::EndTurn),
            usage: TokenUsage {
                input_tokens: api_response.usage.input_tokens,
                output_tokens: api_response.usage.output_tokens,
            },
        }
    }
}

/// Map a non-success HTTP response onto an error
fn classify_error(status: u16, body: &str, retry_after: Option<u64>) -> LlmError {
    let api_error = serde_json::from_str::<AnthropicErrorEnvelope>(body).ok().map(|e| e.error);
    let message = api_error
        .as_ref()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| body.to_string());

    let overloaded = status == STATUS_OVERLOADED || api_error.is_some_and(|e| e.kind == "overloaded_error");
    if overloaded {
        return LlmError::Overloaded { message };
    }

    if status == 429 {
        return LlmError::RateLimited {
            retry_after: Duration::from_secs(retry_after.unwrap_or(60)),
        };
    }

    LlmError::ApiError { status, message }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, "complete: called");
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(url)
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            let text = response.text().await.unwrap_or_default();
            let err = classify_error(status, &text, retry_after);
            warn!(%status, error = %err, "complete: API error");
            return Err(err);
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        debug!(
            input_tokens = %api_response.usage.input_tokens,
            output_tokens = %api_response.usage.output_tokens,
            "complete: success"
        );
        Ok(self.parse_response(api_response))
    }
}

// Anthropic API response types

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorEnvelope {
    error: AnthropicApiError,
}

#[derive(Debug, Deserialize)]
struct AnthropicApiError {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Message, ToolDefinition};

    fn test_client(max_tokens: u32) -> AnthropicClient {
        AnthropicClient {
            model: "claude-3-7-sonnet-latest".to_string(),
            api_key: ApiKey::new("test-key"),
            base_url: "https://api.anthropic.com".to_string(),
            http: Client::new(),
            max_tokens,
        }
    }

    #[test]
    fn test_build_request_body_basic() {
        let client = test_client(8192);

        let request = CompletionRequest {
            system_prompt: "You are helpful".to_string(),
            messages: vec![Message::user("Hello")],
            tools: vec![],
            max_tokens: 1000,
        };

        let body = client.build_request_body(&request);

        assert_eq!(body["model"], "claude-3-7-sonnet-latest");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["system"], "You are helpful");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_build_request_body_omits_empty_system_prompt() {
        let client = test_client(8192);
        let request = CompletionRequest {
            system_prompt: String::new(),
            messages: vec![Message::user("Hello")],
            tools: vec![],
            max_tokens: 1000,
        };

        let body = client.build_request_body(&request);
        assert!(body.get("system").is_none());
    }

    #[test]
    fn test_build_request_body_with_tools_and_blocks() {
        let client = test_client(8192);

        let request = CompletionRequest {
            system_prompt: String::new(),
            messages: vec![
                Message::user("list files"),
                Message::assistant_blocks(vec![ContentBlock::tool_use(
                    "toolu_1",
                    "list_files",
                    serde_json::json!({}),
                )]),
                Message::user_blocks(vec![ContentBlock::tool_result("toolu_1", "[]", false)]),
            ],
            tools: vec![ToolDefinition::new(
                "list_files",
                "List files",
                serde_json::json!({"type": "object", "properties": {}}),
            )],
            max_tokens: 1000,
        };

        let body = client.build_request_body(&request);

        assert_eq!(body["tools"][0]["name"], "list_files");
        assert_eq!(body["messages"][1]["content"][0]["type"], "tool_use");
        assert_eq!(body["messages"][2]["content"][0]["tool_use_id"], "toolu_1");
    }

    #[test]
    fn test_max_tokens_capped() {
        let client = test_client(1000);

        let request = CompletionRequest {
            system_prompt: "Test".to_string(),
            messages: vec![],
            tools: vec![],
            max_tokens: 5000,
        };

        let body = client.build_request_body(&request);
        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_parse_response_keeps_order_and_skips_unknown_blocks() {
        let client = test_client(1000);
        let raw = serde_json::json!({
            "content": [
                {"type": "thinking", "thinking": "hmm", "signature": "x"},
                {"type": "text", "text": "Looking"},
                {"type": "tool_use", "id": "toolu_1", "name": "read_file", "input": {"path": "a.txt"}},
                {"type": "text", "text": "done"}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        });
        let api_response: AnthropicResponse = serde_json::from_value(raw).unwrap();

        let response = client.parse_response(api_response);

        assert_eq!(response.content.len(), 3);
        assert_eq!(response.content[0], ContentBlock::text("Looking"));
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert!(matches!(&response.content[1], ContentBlock::ToolUse { name, .. } if name == "read_file"));
        assert_eq!(response.usage.input_tokens, 10);
    }

    #[test]
    fn test_classify_overloaded() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let err = classify_error(529, body, None);
        assert!(err.is_overloaded());
        assert_eq!(err.to_string(), "Service overloaded: Overloaded");

        // Body type alone is enough
        let err = classify_error(503, body, None);
        assert!(err.is_overloaded());
    }

    #[test]
    fn test_classify_other_errors() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"bad"}}"#;
        match classify_error(400, body, None) {
            LlmError::ApiError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad");
            }
            other => panic!("Expected ApiError, got {other:?}"),
        }

        match classify_error(429, "slow down", Some(7)) {
            LlmError::RateLimited { retry_after } => assert_eq!(retry_after, Duration::from_secs(7)),
            other => panic!("Expected RateLimited, got {other:?}"),
        }

        match classify_error(500, "not json", None) {
            LlmError::ApiError { message, .. } => assert_eq!(message, "not json"),
            other => panic!("Expected ApiError, got {other:?}"),
        }
    }
}
