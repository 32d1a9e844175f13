//! Configuration for remote text generation providers.

use crate::error::{LlmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default Gemini REST endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model.
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Configuration for a remote provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteLlmConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: String,

    /// Base URL for the API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name/identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature. Plans should be deterministic, so this defaults to 0.
    #[serde(default)]
    pub temperature: f32,

    /// Upper bound on generated tokens.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: Option<usize>,
}

impl RemoteLlmConfig {
    /// Create a new remote LLM configuration.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout_secs: default_timeout_secs(),
            temperature: 0.0,
            max_output_tokens: default_max_output_tokens(),
        }
    }

    /// Gemini defaults with the API key read from `env_var`.
    pub fn gemini_from_env(env_var: &str) -> Result<Self> {
        let api_key = std::env::var(env_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::ApiKeyNotFound(format!("Environment variable: {}", env_var))
            })?;

        Ok(Self::new(api_key, GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL))
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of generated tokens.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<usize>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether an API key has been configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Check the values a request cannot be built without.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(LlmError::ConfigError("base_url must not be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::ConfigError("model must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LlmError::ConfigError(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }
        Ok(())
    }
}

impl Default for RemoteLlmConfig {
    fn default() -> Self {
        Self::new(String::new(), GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL)
    }
}

impl fmt::Debug for RemoteLlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteLlmConfig")
            .field("api_key", &if self.has_api_key() { "[REDACTED]" } else { "" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

fn default_base_url() -> String {
    GEMINI_BASE_URL.to_string()
}

fn default_model() -> String {
    GEMINI_DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_output_tokens() -> Option<usize> {
    Some(712)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_config_builder() {
        let config = RemoteLlmConfig::new("test-key", "http://127.0.0.1:9/v1beta/", "gemini-pro")
            .with_timeout(Duration::from_secs(5))
            .with_temperature(0.2)
            .with_max_output_tokens(None);

        assert_eq!(config.base_url, "http://127.0.0.1:9/v1beta");
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.temperature, 0.2);
        assert!(config.max_output_tokens.is_none());
    }

    #[test]
    fn test_defaults_match_agent_expectations() {
        let config = RemoteLlmConfig::default();
        assert_eq!(config.base_url, GEMINI_BASE_URL);
        assert_eq!(config.model, GEMINI_DEFAULT_MODEL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_output_tokens, Some(712));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = RemoteLlmConfig::new("super-secret", GEMINI_BASE_URL, "m");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let config = RemoteLlmConfig::default().with_temperature(3.5);
        assert!(matches!(config.validate(), Err(LlmError::ConfigError(_))));
    }

    #[test]
    fn test_missing_env_key() {
        let result = RemoteLlmConfig::gemini_from_env("LLM_TEST_MISSING_KEY_424242");
        assert!(matches!(result, Err(LlmError::ApiKeyNotFound(_))));
    }

    #[test]
    fn test_deserialize_partial_yaml_like_json() {
        let config: RemoteLlmConfig =
            serde_json::from_str(r#"{"model": "gemini-2.0-flash", "temperature": 0.1}"#).unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, GEMINI_BASE_URL);
        assert_eq!(config.max_output_tokens, Some(712));
    }
}
