// ABOUTME: End-to-end tests for the full panel pipeline over a scripted completion client.
// ABOUTME: Covers the happy path, a failed specialist, a failed aggregator, and repeatability.

use std::sync::Arc;

use medpanel_agent::testing::{Reply, ScriptedCompletionClient};
use medpanel_agent::{CompletionError, CompletionOptions, Orchestrator};
use medpanel_core::{AgentOutcome, FinalReport, Role};

const REPORT: &str = "58-year-old male. Intermittent chest tightness, shortness of breath \
on exertion, and panic episodes over the last three months.";

const AGGREGATOR_MARKER: &str = "You are a multidisciplinary healthcare team";

fn orchestrator(client: Arc<ScriptedCompletionClient>) -> Orchestrator {
    Orchestrator::standard(client, CompletionOptions::new("stub-model"))
}

/// Specialists answer with fixed text; the aggregator echoes its prompt so
/// the final report shows exactly what it was given.
fn healthy_panel() -> ScriptedCompletionClient {
    ScriptedCompletionClient::new()
        .when_role(&Role::Cardiologist, Reply::text("card-ok"))
        .when_role(&Role::Psychologist, Reply::text("psych-ok"))
        .when_role(&Role::Pulmonologist, Reply::text("pulm-ok"))
        .when_role(&Role::MultidisciplinaryTeam, Reply::Echo)
}

#[tokio::test]
async fn full_panel_reaches_final_report() {
    let client = Arc::new(healthy_panel());
    let orch = orchestrator(client.clone());

    let run = orch.analyze_detailed(REPORT).await;

    assert_eq!(run.results.len(), 3);
    assert_eq!(run.results.success_count(), 3);
    assert!(run.finished_at >= run.started_at);

    let text = run.report.text().expect("final report should succeed");
    assert!(text.contains("Cardiologist Report: card-ok"));
    assert!(text.contains("Psychologist Report: psych-ok"));
    assert!(text.contains("Pulmonologist Report: pulm-ok"));

    // Three specialists plus one aggregator, each called once.
    assert_eq!(client.call_count(), 4);
    assert_eq!(client.prompts_containing(AGGREGATOR_MARKER).len(), 1);
    for prompt in client.prompts_containing("Act like a") {
        assert!(prompt.contains(REPORT), "specialist prompt lacks report text");
    }
}

#[tokio::test]
async fn failed_specialist_reads_as_not_available() {
    let client = Arc::new(
        ScriptedCompletionClient::new()
            .when_role(
                &Role::Cardiologist,
                Reply::error(CompletionError::Transport("connection reset".into())),
            )
            .when_role(&Role::Psychologist, Reply::text("psych-ok"))
            .when_role(&Role::Pulmonologist, Reply::text("pulm-ok"))
            .when_role(&Role::MultidisciplinaryTeam, Reply::Echo),
    );
    let orch = orchestrator(client.clone());

    let run = orch.analyze_detailed(REPORT).await;

    let cardio = run.results.get(&Role::Cardiologist).unwrap();
    assert!(!cardio.is_success());
    assert!(cardio.reason().unwrap().contains("connection reset"));
    assert_eq!(
        run.results.get(&Role::Psychologist),
        Some(&AgentOutcome::Success("psych-ok".into()))
    );

    let aggregate_prompt = &client.prompts_containing(AGGREGATOR_MARKER)[0];
    assert!(aggregate_prompt.contains("Cardiologist Report: N/A"));
    assert!(!aggregate_prompt.contains("connection reset"));

    assert!(run.report.is_success());
}

#[tokio::test]
async fn failed_aggregator_fails_the_run() {
    let client = Arc::new(
        ScriptedCompletionClient::new()
            .when_role(
                &Role::MultidisciplinaryTeam,
                Reply::error(CompletionError::Server("503 overloaded".into())),
            )
            .fallback(Reply::text("specialist-ok")),
    );
    let orch = orchestrator(client);

    let report = orch.analyze(REPORT).await;

    match report {
        FinalReport::Failure(reason) => assert!(!reason.is_empty()),
        FinalReport::Success(text) => panic!("expected failure, got success: {}", text),
    }
}

#[tokio::test]
async fn repeated_runs_are_independent() {
    let client = Arc::new(healthy_panel());
    let orch = orchestrator(client.clone());

    let first = orch.analyze_detailed(REPORT).await;
    let second = orch.analyze_detailed(REPORT).await;

    assert_eq!(first.results, second.results);
    assert_eq!(first.report, second.report);
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(client.call_count(), 8);
}

#[tokio::test]
async fn concurrent_runs_share_one_orchestrator() {
    let orch = orchestrator(Arc::new(healthy_panel()));

    let (a, b) = tokio::join!(orch.analyze(REPORT), orch.analyze("Different report."));

    assert!(a.is_success());
    assert!(b.is_success());
}
