//! LLM provider abstraction for event extraction.
//!
//! The event extractor is the only consumer of this interface; everything in
//! `verdra-core` stays deterministic and never touches a provider.
//!
//! ## Security
//!
//! Providers hold their key in an [`ApiCredential`], which cannot leak
//! through `Debug` output and is zeroed on drop.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

mod anthropic;
pub mod secrets;

pub use anthropic::AnthropicProvider;
pub use secrets::{ApiCredential, CredentialSource};

/// Errors from LLM providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Configuration for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature (low for consistent extraction)
    pub temperature: f32,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5".to_string(),
            max_tokens: 1000,
            temperature: 0.1,
            timeout: Duration::from_secs(30),
        }
    }
}

/// A chat message for LLM completion.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Role: "system" or "user"
    pub role: String,

    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response from an LLM completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content
    pub content: String,

    /// Model used
    pub model: String,

    /// Stop reason, if reported
    pub stop_reason: Option<String>,
}

/// Provider abstraction allows swapping LLM backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a single-turn completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Check whether the provider is usable (key present).
    async fn health_check(&self) -> bool;

    /// Provider name for logs and metrics.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_roles() {
        assert_eq!(ChatMessage::system("be terse").role, "system");
        assert_eq!(ChatMessage::user("hello").role, "user");
    }

    #[test]
    fn completion_config_defaults() {
        let config = CompletionConfig::default();
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
