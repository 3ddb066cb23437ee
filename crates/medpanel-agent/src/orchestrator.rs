// ABOUTME: Orchestrator runs the specialist agents concurrently, waits for all of them, then runs the aggregator.
// ABOUTME: Individual failures and panics are captured per role; the ResultSet always has one entry per specialist.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;
use ulid::Ulid;

use medpanel_core::{AgentOutcome, FinalReport, PromptBuilder, ResultSet, Role, RoleKind};

use crate::agent::{Agent, AgentInput};
use crate::completion::{CompletionClient, CompletionOptions};

/// What to do when every specialist failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// Run the aggregator anyway; every slot reads "N/A".
    #[default]
    Proceed,
    /// Skip the aggregator and report failure when no specialist succeeded.
    RequireAnySpecialist,
}

/// The fixed panel an orchestrator runs.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub specialists: Vec<Role>,
    pub aggregator: Role,
    pub options: CompletionOptions,
    /// Bound on each completion call; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Worker pool size. `None` runs every specialist at once.
    pub max_concurrency: Option<usize>,
    pub policy: AggregationPolicy,
}

impl OrchestratorConfig {
    /// The standard three-specialist panel with the multidisciplinary team
    /// as aggregator.
    pub fn standard(options: CompletionOptions) -> Self {
        Self {
            specialists: Role::STANDARD_SPECIALISTS.to_vec(),
            aggregator: Role::MultidisciplinaryTeam,
            options,
            timeout: None,
            max_concurrency: None,
            policy: AggregationPolicy::Proceed,
        }
    }
}

/// Configuration problems detected when building an orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrchestratorError {
    #[error("panel has no specialists")]
    NoSpecialists,

    #[error("specialist {0} is configured more than once")]
    DuplicateSpecialist(Role),

    #[error("no prompt template registered for aggregator {0}")]
    UnknownAggregator(Role),

    #[error("role {0} is not registered as an aggregator")]
    NotAnAggregator(Role),

    #[error("specialist {specialist} has no slot in the {aggregator} template")]
    UnboundSpecialist { specialist: Role, aggregator: Role },
}

/// Everything one pipeline invocation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelRun {
    pub run_id: Ulid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: ResultSet,
    pub report: FinalReport,
}

/// Runs a fixed panel of specialists over a report and fans their outcomes
/// in to one aggregator. Holds only immutable configuration, so one
/// orchestrator can serve any number of independent `analyze` calls.
#[derive(Clone)]
pub struct Orchestrator {
    config: OrchestratorConfig,
    client: Arc<dyn CompletionClient>,
    prompts: Arc<PromptBuilder>,
}

impl Orchestrator {
    pub fn new(
        config: OrchestratorConfig,
        client: Arc<dyn CompletionClient>,
        prompts: PromptBuilder,
    ) -> Result<Self, OrchestratorError> {
        if config.specialists.is_empty() {
            return Err(OrchestratorError::NoSpecialists);
        }
        for (i, role) in config.specialists.iter().enumerate() {
            if config.specialists[..i].contains(role) {
                return Err(OrchestratorError::DuplicateSpecialist(role.clone()));
            }
        }

        // Every specialist's outcome must reach the aggregator prompt.
        let aggregator = &config.aggregator;
        let descriptor = prompts
            .descriptor(aggregator)
            .ok_or_else(|| OrchestratorError::UnknownAggregator(aggregator.clone()))?;
        if prompts.kind(aggregator) != Some(RoleKind::Aggregator) {
            return Err(OrchestratorError::NotAnAggregator(aggregator.clone()));
        }
        if let Some(unbound) = config
            .specialists
            .iter()
            .find(|role| !descriptor.sources.iter().any(|(_, source)| source == *role))
        {
            return Err(OrchestratorError::UnboundSpecialist {
                specialist: unbound.clone(),
                aggregator: aggregator.clone(),
            });
        }

        Ok(Self {
            config,
            client,
            prompts: Arc::new(prompts),
        })
    }

    /// The standard panel and clinical templates over the given client.
    pub fn standard(client: Arc<dyn CompletionClient>, options: CompletionOptions) -> Self {
        Self {
            config: OrchestratorConfig::standard(options),
            client,
            prompts: Arc::new(PromptBuilder::standard()),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    fn pool_size(&self) -> usize {
        self.config
            .max_concurrency
            .filter(|n| *n > 0)
            .unwrap_or(self.config.specialists.len())
    }

    fn agent(&self, role: Role, input: AgentInput) -> Agent {
        Agent::new(
            role,
            input,
            Arc::clone(&self.prompts),
            Arc::clone(&self.client),
            self.config.options.clone(),
        )
        .with_timeout(self.config.timeout)
    }

    /// Fan out: run every specialist concurrently on the report and wait for
    /// all of them. Never short-circuits; every configured role gets an entry.
    pub async fn run_specialists(&self, report_text: &str) -> ResultSet {
        let permits = Arc::new(Semaphore::new(self.pool_size()));
        let mut join_set = JoinSet::new();

        for role in &self.config.specialists {
            let agent = self.agent(role.clone(), AgentInput::Report(report_text.to_string()));
            let permits = Arc::clone(&permits);
            join_set.spawn(
                async move {
                    let role = agent.role().clone();
                    let outcome = match permits.acquire_owned().await {
                        Ok(_permit) => execute_isolated(&agent).await,
                        Err(_) => AgentOutcome::Failure("worker pool closed".to_string()),
                    };
                    (role, outcome)
                }
                .in_current_span(),
            );
        }

        let mut collected: HashMap<Role, AgentOutcome> = HashMap::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((role, outcome)) => {
                    tracing::info!(
                        role = %role,
                        success = outcome.is_success(),
                        "specialist finished"
                    );
                    collected.insert(role, outcome);
                }
                Err(e) => {
                    tracing::error!(error = %e, "specialist task failed to join");
                }
            }
        }

        self.config
            .specialists
            .iter()
            .map(|role| {
                let outcome = collected.remove(role).unwrap_or_else(|| {
                    AgentOutcome::Failure("specialist task did not complete".to_string())
                });
                (role.clone(), outcome)
            })
            .collect()
    }

    /// Fan in: run the aggregator once over the specialist outcomes.
    pub async fn run_aggregator(&self, results: &ResultSet) -> FinalReport {
        if self.config.policy == AggregationPolicy::RequireAnySpecialist
            && results.success_count() == 0
        {
            tracing::warn!(
                specialists = results.len(),
                "no specialist succeeded; skipping aggregation"
            );
            return FinalReport::Failure(format!(
                "all {} specialists failed; aggregation skipped",
                results.len()
            ));
        }

        if results.failure_count() > 0 {
            tracing::warn!(
                failed = results.failure_count(),
                total = results.len(),
                "aggregating with degraded specialist input"
            );
        }

        let agent = self.agent(
            self.config.aggregator.clone(),
            AgentInput::Findings(results.clone()),
        );
        FinalReport::from(execute_isolated(&agent).await)
    }

    /// The whole pipeline: specialists, barrier, aggregator.
    pub async fn analyze(&self, report_text: &str) -> FinalReport {
        self.analyze_detailed(report_text).await.report
    }

    /// Like [`Orchestrator::analyze`], but also returns the specialist
    /// outcomes and timing of the run.
    pub async fn analyze_detailed(&self, report_text: &str) -> PanelRun {
        let run_id = Ulid::new();
        let span = tracing::info_span!("panel_run", run_id = %run_id);

        async move {
            let started_at = Utc::now();
            tracing::info!(
                specialists = self.config.specialists.len(),
                report_chars = report_text.len(),
                "panel run started"
            );

            let results = self.run_specialists(report_text).await;
            let report = self.run_aggregator(&results).await;

            match &report {
                FinalReport::Success(_) => tracing::info!("panel run produced a final report"),
                FinalReport::Failure(reason) => {
                    tracing::error!(reason = %reason, "panel run failed to produce a final report")
                }
            }

            PanelRun {
                run_id,
                started_at,
                finished_at: Utc::now(),
                results,
                report,
            }
        }
        .instrument(span)
        .await
    }
}

/// Run an agent, turning a panic inside it into a failure outcome.
async fn execute_isolated(agent: &Agent) -> AgentOutcome {
    match AssertUnwindSafe(agent.execute()).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(role = %agent.role(), panic = %message, "agent panicked");
            AgentOutcome::Failure(format!("agent panicked: {}", message))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
