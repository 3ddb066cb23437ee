// ABOUTME: Configuration loading and validation for the medpanel binary.
// ABOUTME: Reads MEDPANEL_* environment variables; command-line flags override them afterwards.

use std::path::PathBuf;
use std::time::Duration;

use medpanel_agent::{AggregationPolicy, CompletionOptions, OrchestratorConfig};
use thiserror::Error;

pub const DEFAULT_OUTPUT: &str = "results/final_diagnosis.txt";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must be true or false, got '{value}'")]
    InvalidBool { key: &'static str, value: String },

    #[error("temperature must be between 0 and 2, got {0}")]
    TemperatureOutOfRange(f32),
}

/// Run configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MedpanelConfig {
    pub provider: String,
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout: Option<Duration>,
    pub max_concurrency: Option<usize>,
    pub require_specialist: bool,
    pub output: PathBuf,
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match non_empty_var(key) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(None),
    }
}

fn parse_bool(key: &'static str) -> Result<Option<bool>, ConfigError> {
    let Some(value) = non_empty_var(key) else {
        return Ok(None);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidBool { key, value }),
    }
}

impl MedpanelConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - MEDPANEL_PROVIDER: completion provider (default: openrouter)
    /// - MEDPANEL_MODEL: model name (optional; provider default otherwise)
    /// - MEDPANEL_TEMPERATURE: sampling temperature (default: 0)
    /// - MEDPANEL_MAX_TOKENS: completion token cap (optional)
    /// - MEDPANEL_TIMEOUT_SECS: per-call timeout, 0 disables (default: 120)
    /// - MEDPANEL_MAX_CONCURRENCY: specialist worker pool size (optional)
    /// - MEDPANEL_REQUIRE_SPECIALIST: skip aggregation when every specialist failed (default: false)
    /// - MEDPANEL_OUTPUT: where to write the final report (default: results/final_diagnosis.txt)
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = non_empty_var("MEDPANEL_PROVIDER").unwrap_or_else(|| "openrouter".to_string());
        let model = non_empty_var("MEDPANEL_MODEL");

        let temperature = parse_var::<f32>("MEDPANEL_TEMPERATURE")?.unwrap_or(0.0);

        let max_tokens = parse_var::<u32>("MEDPANEL_MAX_TOKENS")?;

        let timeout_secs = parse_var::<u64>("MEDPANEL_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let max_concurrency = parse_var::<usize>("MEDPANEL_MAX_CONCURRENCY")?;

        let require_specialist = parse_bool("MEDPANEL_REQUIRE_SPECIALIST")?.unwrap_or(false);

        let output = non_empty_var("MEDPANEL_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let config = Self {
            provider,
            model,
            temperature,
            max_tokens,
            timeout,
            max_concurrency,
            require_specialist,
            output,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that may have been overridden after loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::TemperatureOutOfRange(self.temperature));
        }
        Ok(())
    }

    pub fn policy(&self) -> AggregationPolicy {
        if self.require_specialist {
            AggregationPolicy::RequireAnySpecialist
        } else {
            AggregationPolicy::Proceed
        }
    }

    /// The standard panel configured with this run's settings. `model` is the
    /// resolved model name returned by the client factory.
    pub fn orchestrator_config(&self, model: String) -> OrchestratorConfig {
        let options = CompletionOptions::new(model)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens);

        let mut config = OrchestratorConfig::standard(options);
        config.timeout = self.timeout;
        config.max_concurrency = self.max_concurrency;
        config.policy = self.policy();
        config
    }
}
