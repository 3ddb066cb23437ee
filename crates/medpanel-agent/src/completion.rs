// ABOUTME: Defines the CompletionClient trait that every LLM provider adapter implements.
// ABOUTME: Also defines CompletionOptions (model + sampling) and CompletionError (what can go wrong).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Per-call generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Errors surfaced by a completion provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Server error: {0}")]
    Server(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty completion")]
    EmptyCompletion,
}

/// A text-completion service. Implementations must be shareable across
/// concurrently running agents; a call is stateless from the caller's view.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one prompt and return the completion text.
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError>;

    /// Provider name for logging and display (e.g. "openrouter", "anthropic").
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_builder_sets_fields() {
        let options = CompletionOptions::new("gpt-4o")
            .temperature(0.3)
            .max_tokens(Some(512));
        assert_eq!(options.model, "gpt-4o");
        assert_eq!(options.temperature, 0.3);
        assert_eq!(options.max_tokens, Some(512));
    }

    #[test]
    fn options_default_to_deterministic_sampling() {
        let options = CompletionOptions::new("m");
        assert_eq!(options.temperature, 0.0);
        assert!(options.max_tokens.is_none());
    }

    #[test]
    fn completion_error_display() {
        let errors = vec![
            CompletionError::Transport("connection refused".to_string()),
            CompletionError::Unauthorized("bad key".to_string()),
            CompletionError::RateLimited,
            CompletionError::Server("502 Bad Gateway".to_string()),
            CompletionError::Api {
                status: 400,
                body: "bad request".to_string(),
            },
            CompletionError::InvalidResponse("missing choices".to_string()),
            CompletionError::EmptyCompletion,
        ];

        for err in &errors {
            assert!(!err.to_string().is_empty());
        }

        assert!(
            CompletionError::Api {
                status: 418,
                body: "teapot".to_string()
            }
            .to_string()
            .contains("418")
        );
    }
}
