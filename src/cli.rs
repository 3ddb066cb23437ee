// ABOUTME: Command-line arguments for the medpanel binary.
// ABOUTME: Every flag is optional and, when given, overrides the matching MEDPANEL_* setting.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::MedpanelConfig;

/// Analyze a medical report with a panel of AI specialists and a
/// multidisciplinary team summary.
#[derive(Debug, Parser)]
#[command(name = "medpanel", version, about)]
pub struct Cli {
    /// Path to the medical report. Reads stdin when omitted or "-".
    pub report: Option<PathBuf>,

    /// Where to write the final report.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Completion provider: openrouter, openai, or anthropic.
    #[arg(long)]
    pub provider: Option<String>,

    /// Model name for the chosen provider.
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature.
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Per-call timeout in seconds; 0 disables it.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum number of specialists running at once.
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Fail instead of aggregating when every specialist failed.
    #[arg(long)]
    pub require_specialist: bool,

    /// Append each specialist's outcome to the written report.
    #[arg(long)]
    pub include_specialists: bool,
}

impl Cli {
    /// Apply the flags that were given on top of the loaded configuration.
    pub fn apply(&self, config: &mut MedpanelConfig) {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(provider) = &self.provider {
            config.provider = provider.clone();
        }
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(n) = self.max_concurrency {
            config.max_concurrency = Some(n);
        }
        if self.require_specialist {
            config.require_specialist = true;
        }
    }

    /// The report path, or `None` when the report comes from stdin.
    pub fn report_path(&self) -> Option<&std::path::Path> {
        self.report
            .as_deref()
            .filter(|p| p.as_os_str() != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_OUTPUT;

    fn base_config() -> MedpanelConfig {
        MedpanelConfig {
            provider: "openrouter".to_string(),
            model: None,
            temperature: 0.0,
            max_tokens: None,
            timeout: Some(Duration::from_secs(120)),
            max_concurrency: None,
            require_specialist: false,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }

    #[test]
    fn no_flags_leave_config_untouched() {
        let cli = Cli::try_parse_from(["medpanel"]).unwrap();
        let mut config = base_config();
        cli.apply(&mut config);

        assert_eq!(config.provider, "openrouter");
        assert_eq!(config.timeout, Some(Duration::from_secs(120)));
        assert!(!config.require_specialist);
        assert!(cli.report_path().is_none());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "medpanel",
            "report.txt",
            "--output",
            "out/final.txt",
            "--provider",
            "anthropic",
            "--model",
            "claude-x",
            "--temperature",
            "0.7",
            "--timeout-secs",
            "0",
            "--max-concurrency",
            "1",
            "--require-specialist",
        ])
        .unwrap();
        let mut config = base_config();
        cli.apply(&mut config);

        assert_eq!(cli.report_path(), Some(std::path::Path::new("report.txt")));
        assert_eq!(config.output, PathBuf::from("out/final.txt"));
        assert_eq!(config.provider, "anthropic");
        assert_eq!(config.model.as_deref(), Some("claude-x"));
        assert_eq!(config.temperature, 0.7);
        assert!(config.timeout.is_none());
        assert_eq!(config.max_concurrency, Some(1));
        assert!(config.require_specialist);
    }

    #[test]
    fn out_of_range_temperature_flag_fails_validation() {
        let cli = Cli::try_parse_from(["medpanel", "--temperature", "5"]).unwrap();
        let mut config = base_config();
        cli.apply(&mut config);

        assert!(matches!(
            config.validate(),
            Err(crate::config::ConfigError::TemperatureOutOfRange(_))
        ));
    }

    #[test]
    fn dash_means_stdin() {
        let cli = Cli::try_parse_from(["medpanel", "-"]).unwrap();
        assert!(cli.report_path().is_none());
    }
}
