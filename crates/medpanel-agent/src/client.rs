// ABOUTME: Factory function for creating completion clients from a provider name.
// ABOUTME: Resolves provider name + optional model into a configured (Arc<dyn CompletionClient>, model) pair.

use std::env;
use std::sync::Arc;

use crate::completion::CompletionClient;
use crate::providers::{AnthropicClient, OpenAiCompatibleClient};

pub const DEFAULT_OPENROUTER_MODEL: &str = "mistralai/mistral-7b-instruct:free";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Read an env var and return `Some(value)` only if it is non-empty after trimming.
fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

fn required_key(key: &str) -> Result<String, anyhow::Error> {
    non_empty_env(key).ok_or_else(|| anyhow::anyhow!("{} environment variable not set", key))
}

/// Create a completion client for the given provider name.
///
/// Returns a tuple of (client, resolved_model). The model is resolved from:
/// 1. The explicit `model` parameter (if Some)
/// 2. A provider-specific environment variable (e.g. OPENROUTER_MODEL)
/// 3. The provider default
///
/// `<PROVIDER>_BASE_URL` overrides the endpoint for every provider.
pub fn create_completion_client(
    provider: &str,
    model: Option<&str>,
) -> Result<(Arc<dyn CompletionClient>, String), anyhow::Error> {
    let resolve_model = |env_key: &str, default: &str| {
        model
            .map(String::from)
            .or_else(|| non_empty_env(env_key))
            .unwrap_or_else(|| default.to_string())
    };

    match provider {
        "openrouter" => {
            let api_key = required_key("OPENROUTER_API_KEY")?;
            let resolved_model = resolve_model("OPENROUTER_MODEL", DEFAULT_OPENROUTER_MODEL);
            let mut client = OpenAiCompatibleClient::openrouter(api_key);
            if let Some(base_url) = non_empty_env("OPENROUTER_BASE_URL") {
                client = client.with_base_url(base_url);
            }
            Ok((Arc::new(client), resolved_model))
        }
        "openai" => {
            let api_key = required_key("OPENAI_API_KEY")?;
            let resolved_model = resolve_model("OPENAI_MODEL", DEFAULT_OPENAI_MODEL);
            let mut client = OpenAiCompatibleClient::openai(api_key);
            if let Some(base_url) = non_empty_env("OPENAI_BASE_URL") {
                client = client.with_base_url(base_url);
            }
            Ok((Arc::new(client), resolved_model))
        }
        "anthropic" => {
            let api_key = required_key("ANTHROPIC_API_KEY")?;
            let resolved_model = resolve_model("ANTHROPIC_MODEL", DEFAULT_ANTHROPIC_MODEL);
            let mut client = AnthropicClient::new(api_key);
            if let Some(base_url) = non_empty_env("ANTHROPIC_BASE_URL") {
                client = client.with_base_url(base_url);
            }
            Ok((Arc::new(client), resolved_model))
        }
        unknown => Err(anyhow::anyhow!(
            "unknown completion provider '{}' (expected openrouter, openai, or anthropic)",
            unknown
        )),
    }
}
