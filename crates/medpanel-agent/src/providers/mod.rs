// ABOUTME: Provider module aggregating the HTTP completion adapters.
// ABOUTME: Shares status-code mapping and response decoding across the OpenAI-compatible and Anthropic clients.

pub mod anthropic;
pub mod openai;

use serde_json::Value;

use crate::completion::CompletionError;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiCompatibleClient;

/// Send a prepared request and decode the JSON body, mapping HTTP failures
/// onto [`CompletionError`] the same way for every provider.
pub(crate) async fn send_json(
    request: reqwest::RequestBuilder,
    key_hint: &str,
) -> Result<Value, CompletionError> {
    let response = request
        .send()
        .await
        .map_err(|e| CompletionError::Transport(format!("HTTP request failed: {}", e)))?;

    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(status.as_u16(), body, key_hint));
    }

    response
        .json()
        .await
        .map_err(|e| CompletionError::InvalidResponse(format!("failed to parse JSON: {}", e)))
}

/// Map a non-success HTTP status onto a completion error.
pub(crate) fn classify_status(status: u16, body: String, key_hint: &str) -> CompletionError {
    match status {
        401 | 403 => CompletionError::Unauthorized(format!("check {}", key_hint)),
        429 => CompletionError::RateLimited,
        500..=599 => CompletionError::Server(format!("status {}", status)),
        _ => CompletionError::Api { status, body },
    }
}

/// Reject empty or whitespace-only completion text.
pub(crate) fn non_empty(text: &str) -> Result<String, CompletionError> {
    if text.trim().is_empty() {
        Err(CompletionError::EmptyCompletion)
    } else {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_status_maps_auth_and_rate_limits() {
        assert!(matches!(
            classify_status(401, String::new(), "OPENROUTER_API_KEY"),
            CompletionError::Unauthorized(msg) if msg.contains("OPENROUTER_API_KEY")
        ));
        assert!(matches!(
            classify_status(403, String::new(), "KEY"),
            CompletionError::Unauthorized(_)
        ));
        assert_eq!(
            classify_status(429, String::new(), "KEY"),
            CompletionError::RateLimited
        );
    }

    #[test]
    fn classify_status_maps_server_and_client_errors() {
        assert!(matches!(
            classify_status(503, String::new(), "KEY"),
            CompletionError::Server(msg) if msg.contains("503")
        ));
        assert_eq!(
            classify_status(400, "bad model".to_string(), "KEY"),
            CompletionError::Api {
                status: 400,
                body: "bad model".to_string()
            }
        );
    }

    #[test]
    fn non_empty_rejects_blank_text() {
        assert_eq!(non_empty("  \n"), Err(CompletionError::EmptyCompletion));
        assert_eq!(non_empty("ok"), Ok("ok".to_string()));
    }
}
