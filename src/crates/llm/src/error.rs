//! Error types for text generation providers.

use thiserror::Error;

/// Result type for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur when talking to a provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// API key not found in environment.
    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid response from provider.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider answered with a non-success status.
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Check if this error is due to authentication.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            LlmError::AuthenticationError(_) | LlmError::ApiKeyNotFound(_)
        )
    }

    /// Check if retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::HttpError(_) | LlmError::RateLimitExceeded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_classification() {
        assert!(LlmError::ApiKeyNotFound("GEMINI_API_KEY".into()).is_auth_error());
        assert!(LlmError::AuthenticationError("403".into()).is_auth_error());
        assert!(!LlmError::ProviderError("500".into()).is_auth_error());
    }

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::RateLimitExceeded("slow down".into()).is_transient());
        assert!(!LlmError::InvalidResponse("no candidates".into()).is_transient());
    }
}
