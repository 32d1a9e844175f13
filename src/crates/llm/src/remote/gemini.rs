//! Google Gemini client implementation.
//!
//! Calls `{base_url}/models/{model}:generateContent` with the API key as a
//! query parameter and returns the text of the first candidate.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::GeminiClient;
//! use llm::{RemoteLlmConfig, TextGenerator};
//!
//! let config = RemoteLlmConfig::gemini_from_env("GEMINI_API_KEY")?;
//! let client = GeminiClient::new(config)?;
//! let text = client.generate("Hello!").await;
//! ```

use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};
use crate::generator::TextGenerator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tooling::logging::{sanitize_for_logging, timed, truncate_for_logging};
use tracing::{debug, warn};

/// Google Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration.
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// The active configuration.
    pub fn config(&self) -> &RemoteLlmConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn build_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiMessage {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: Some(self.config.temperature),
                max_output_tokens: self.config.max_output_tokens,
            }),
        }
    }

    /// Generate text, surfacing provider failures as errors.
    pub async fn try_generate(&self, prompt: &str) -> Result<String> {
        if !self.config.has_api_key() {
            return Err(LlmError::ApiKeyNotFound(
                "Gemini API key is not configured".to_string(),
            ));
        }

        let url = self.endpoint();
        debug!(
            url = %sanitize_for_logging(&url),
            prompt_chars = prompt.len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.config.api_key)])
            .json(&self.build_request(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationError(error_text),
                429 => LlmError::RateLimitExceeded(error_text),
                _ => LlmError::ProviderError(format!("Gemini API error {}: {}", status, error_text)),
            });
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        first_candidate_text(gemini_resp)
    }
}

/// Concatenate the parts of the first candidate.
fn first_candidate_text(response: GeminiResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("response has no candidates".to_string()))?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            debug!(finish_reason = reason, "Gemini candidate finished early");
        }
    }

    Ok(candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default())
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> String {
        match timed("gemini_generate", self.try_generate(prompt)).await {
            Ok(text) => {
                debug!(response = %truncate_for_logging(&text, 200), "Gemini response received");
                text
            }
            Err(e) => {
                warn!(error = %sanitize_for_logging(&e.to_string()), "Gemini request failed");
                String::new()
            }
        }
    }

    fn describe(&self) -> String {
        format!("gemini:{}", self.config.model)
    }
}

// Gemini API types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiMessage {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiMessage>,
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GEMINI_BASE_URL;

    fn client() -> GeminiClient {
        GeminiClient::new(RemoteLlmConfig::new("test-key", GEMINI_BASE_URL, "gemini-pro")).unwrap()
    }

    #[test]
    fn test_endpoint_format() {
        assert_eq!(
            client().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_request_serialization_uses_camel_case() {
        let body = serde_json::to_value(client().build_request("hi")).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 712);
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
    }

    #[test]
    fn test_first_candidate_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"[\"wait("},{"text":"100)\"]"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(first_candidate_text(response).unwrap(), "[\"wait(100)\"]");
    }

    #[test]
    fn test_first_candidate_text_without_candidates() {
        let response: GeminiResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert!(matches!(
            first_candidate_text(response),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_without_key_returns_empty() {
        let client =
            GeminiClient::new(RemoteLlmConfig::new("", GEMINI_BASE_URL, "gemini-pro")).unwrap();
        assert!(matches!(
            client.try_generate("p").await,
            Err(LlmError::ApiKeyNotFound(_))
        ));
        assert_eq!(client.generate("p").await, "");
    }
}
