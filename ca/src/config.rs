//! Configuration types, loading, and API key resolution

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Chat session configuration
    pub agent: AgentConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .codeagent.yml
        let local_config = PathBuf::from(".codeagent.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/codeagent/codeagent.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("codeagent").join("codeagent.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// File searched for a `NAME=value` line when the variable is unset
    #[serde(rename = "api-key-file")]
    pub api_key_file: PathBuf,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds (none by default)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-7-sonnet-latest".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key_file: PathBuf::from("config.env"),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 1024,
            timeout_ms: None,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key from the process environment or the key file
    pub fn get_api_key(&self) -> Result<ApiKey, CredentialError> {
        resolve_api_key(
            &self.api_key_env,
            &self.api_key_file,
            |name| std::env::var(name).ok(),
        )
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Replaces the built-in system prompt; an empty string sends none
    #[serde(rename = "system-prompt")]
    pub system_prompt: Option<String>,
}

/// An API key, passed explicitly to the client that needs it
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Failure to find a usable API key
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(
        "{env_var} is required\nPlease either:\n1. Set environment variable: export {env_var}=your_api_key_here\n2. Add your key to {} file",
        .file.display()
    )]
    Missing { env_var: String, file: PathBuf },
}

/// Look up `env_var` first, then a `env_var=value` line in `file`
///
/// Empty values count as absent. The key itself is not validated.
pub fn resolve_api_key<F>(env_var: &str, file: &Path, lookup_env: F) -> Result<ApiKey, CredentialError>
where
    F: Fn(&str) -> Option<String>,
{
    debug!(%env_var, ?file, "resolve_api_key: called");
    if let Some(key) = lookup_env(env_var).filter(|k| !k.trim().is_empty()) {
        info!(%env_var, "API key loaded from environment");
        return Ok(ApiKey::new(key.trim()));
    }

    if let Ok(content) = fs::read_to_string(file) {
        let prefix = format!("{}=", env_var);
        let found = content
            .lines()
            .filter_map(|line| line.strip_prefix(&prefix))
            .map(str::trim)
            .find(|value| !value.is_empty());
        if let Some(key) = found {
            info!(file = %file.display(), "API key loaded from file");
            return Ok(ApiKey::new(key));
        }
        debug!("resolve_api_key: key file has no usable entry");
    } else {
        debug!("resolve_api_key: key file not readable");
    }

    Err(CredentialError::Missing {
        env_var: env_var.to_string(),
        file: file.to_path_buf(),
    })
}
