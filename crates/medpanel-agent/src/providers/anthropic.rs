// ABOUTME: Anthropic Messages API adapter implementing CompletionClient.
// ABOUTME: Sends the prompt as one user message and joins the text blocks of the reply.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::completion::{CompletionClient, CompletionError, CompletionOptions};
use crate::providers::{non_empty, send_json};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic Claude completion client.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    /// Build the JSON request body for the Messages API. The API requires
    /// `max_tokens`, so a default applies when the options leave it unset.
    pub fn build_request_body(prompt: &str, options: &CompletionOptions) -> Value {
        json!({
            "model": options.model,
            "max_tokens": options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "temperature": options.temperature,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        })
    }

    /// Concatenate the text blocks of a Messages API response.
    pub fn parse_response(response_body: &Value) -> Result<String, CompletionError> {
        let content = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                CompletionError::InvalidResponse("missing content array in response".to_string())
            })?;

        let text: Vec<&str> = content
            .iter()
            .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
            .collect();

        non_empty(&text.join(""))
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        let body = Self::build_request_body(prompt, options);

        let request = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body);

        let response_body = send_json(request, "ANTHROPIC_API_KEY").await?;
        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}
