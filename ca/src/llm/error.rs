//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Service overloaded: {message}")]
    Overloaded { message: String },

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Check if the service reported a transient overload
    ///
    /// This is the only inference failure the chat loop survives.
    pub fn is_overloaded(&self) -> bool {
        matches!(self, LlmError::Overloaded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_overloaded() {
        let err = LlmError::Overloaded {
            message: "Overloaded".to_string(),
        };
        assert!(err.is_overloaded());

        // 5xx other than overload are fatal
        let err = LlmError::ApiError {
            status: 500,
            message: "Server error".to_string(),
        };
        assert!(!err.is_overloaded());

        assert!(
            !LlmError::RateLimited {
                retry_after: Duration::from_secs(1)
            }
            .is_overloaded()
        );
    }

    #[test]
    fn test_rate_limit_message() {
        let err = LlmError::RateLimited {
            retry_after: Duration::from_secs(42),
        };
        assert_eq!(err.to_string(), "Rate limited, retry after 42s");
    }

    #[test]
    fn test_error_messages() {
        let err = LlmError::ApiError {
            status: 400,
            message: "bad request".to_string(),
        };
        assert_eq!(err.to_string(), "API error 400: bad request");
    }
}
