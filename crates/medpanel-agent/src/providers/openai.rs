// ABOUTME: OpenAI-compatible Chat Completions adapter implementing CompletionClient.
// ABOUTME: Serves both OpenRouter (the default provider) and OpenAI proper, which differ only in base URL and key.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::completion::{CompletionClient, CompletionError, CompletionOptions};
use crate::providers::{non_empty, send_json};

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for any endpoint speaking the OpenAI Chat Completions protocol.
/// Each prompt is sent as a single user message.
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    provider: String,
    api_key: String,
    base_url: String,
    key_hint: String,
}

impl OpenAiCompatibleClient {
    /// Create a client with explicit configuration. `key_hint` names the
    /// credential to check when the endpoint rejects the key.
    pub fn new(provider: &str, api_key: String, base_url: String, key_hint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            provider: provider.to_string(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            key_hint: key_hint.to_string(),
        }
    }

    pub fn openrouter(api_key: String) -> Self {
        Self::new(
            "openrouter",
            api_key,
            OPENROUTER_BASE_URL.to_string(),
            "OPENROUTER_API_KEY",
        )
    }

    pub fn openai(api_key: String) -> Self {
        Self::new("openai", api_key, OPENAI_BASE_URL.to_string(), "OPENAI_API_KEY")
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Build the JSON request body for the Chat Completions API.
    pub fn build_request_body(prompt: &str, options: &CompletionOptions) -> Value {
        let mut body = json!({
            "model": options.model,
            "temperature": options.temperature,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });
        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        body
    }

    /// Extract the completion text from a Chat Completions response.
    pub fn parse_response(response_body: &Value) -> Result<String, CompletionError> {
        if let Some(message) = response_body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return Err(CompletionError::InvalidResponse(format!(
                "provider returned error: {}",
                message
            )));
        }

        let choices = response_body
            .get("choices")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                CompletionError::InvalidResponse("missing choices array in response".to_string())
            })?;

        let choice = choices
            .first()
            .ok_or_else(|| CompletionError::InvalidResponse("empty choices array".to_string()))?;

        let message = choice.get("message").ok_or_else(|| {
            CompletionError::InvalidResponse("missing message in choice".to_string())
        })?;

        match message.get("content") {
            Some(Value::String(content)) => non_empty(content),
            Some(Value::Null) | None => Err(CompletionError::EmptyCompletion),
            Some(other) => Err(CompletionError::InvalidResponse(format!(
                "unexpected content type: {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        let body = Self::build_request_body(prompt, options);

        let request = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body);

        let response_body = send_json(request, &self.key_hint).await?;
        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        &self.provider
    }
}
