// ABOUTME: Entry point for the medpanel binary.
// ABOUTME: Loads config, reads the report, runs the specialist panel, and writes the final diagnosis.

mod cli;
mod config;
mod report_io;

use anyhow::Context;
use clap::Parser;
use medpanel_agent::{Orchestrator, create_completion_client};
use medpanel_core::PromptBuilder;

use crate::cli::Cli;
use crate::config::MedpanelConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medpanel=info,medpanel_agent=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = MedpanelConfig::from_env().context("Invalid configuration")?;
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let report_text = report_io::read_report(cli.report_path())?;

    let (client, model) = create_completion_client(&config.provider, config.model.as_deref())
        .context("Failed to create completion client")?;
    tracing::info!(
        provider = %config.provider,
        model = %model,
        chars = report_text.len(),
        "medpanel starting"
    );

    let orchestrator = Orchestrator::new(
        config.orchestrator_config(model),
        client,
        PromptBuilder::standard(),
    )?;

    let run = orchestrator.analyze_detailed(&report_text).await;

    let specialists = cli.include_specialists.then_some(&run.results);
    let contents = report_io::render(&run.report, specialists);
    report_io::write_output(&config.output, &contents)?;

    println!("{contents}");
    tracing::info!(
        run_id = %run.run_id,
        output = %config.output.display(),
        "final report written"
    );

    if let Some(reason) = run.report.reason() {
        tracing::error!(run_id = %run.run_id, reason = %reason, "panel analysis failed");
        std::process::exit(1);
    }
    Ok(())
}
