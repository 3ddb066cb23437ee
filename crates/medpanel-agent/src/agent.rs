// ABOUTME: Agent binds one role, its inputs, the prompt catalog, and a completion client into a unit of work.
// ABOUTME: execute() never returns an error: every failure is captured as AgentOutcome::Failure.

use std::sync::Arc;
use std::time::Duration;

use medpanel_core::{AgentOutcome, PromptBuilder, PromptError, ResultSet, Role};

use crate::completion::{CompletionClient, CompletionError, CompletionOptions};

/// Errors that can occur inside a single agent execution. These never
/// cross the agent boundary; they are rendered into the failure reason.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),
}

/// What an agent analyzes.
#[derive(Debug, Clone)]
pub enum AgentInput {
    /// The raw report, for specialists.
    Report(String),
    /// Specialist outcomes, for the aggregator.
    Findings(ResultSet),
}

/// One prompt-completion unit of work. Owns its inputs; shares only the
/// read-only catalog and client.
pub struct Agent {
    role: Role,
    input: AgentInput,
    prompts: Arc<PromptBuilder>,
    client: Arc<dyn CompletionClient>,
    options: CompletionOptions,
    timeout: Option<Duration>,
}

impl Agent {
    pub fn new(
        role: Role,
        input: AgentInput,
        prompts: Arc<PromptBuilder>,
        client: Arc<dyn CompletionClient>,
        options: CompletionOptions,
    ) -> Self {
        Self {
            role,
            input,
            prompts,
            client,
            options,
            timeout: None,
        }
    }

    /// Bound the completion call. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Render this agent's prompt without calling the client.
    pub fn prompt(&self) -> Result<String, PromptError> {
        match &self.input {
            AgentInput::Report(text) => self.prompts.build_specialist(&self.role, text),
            AgentInput::Findings(results) => self.prompts.build_aggregate(&self.role, results),
        }
    }

    async fn try_execute(&self) -> Result<String, AgentError> {
        let prompt = self.prompt()?;
        let call = self.client.complete(&prompt, &self.options);

        let text = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| AgentError::Timeout(limit))??,
            None => call.await?,
        };

        if text.trim().is_empty() {
            return Err(CompletionError::EmptyCompletion.into());
        }
        Ok(text)
    }

    /// Run the agent: build the prompt, make exactly one completion call,
    /// and wrap the result. Errors become `AgentOutcome::Failure`.
    pub async fn execute(&self) -> AgentOutcome {
        tracing::debug!(
            role = %self.role,
            provider = self.client.provider_name(),
            model = %self.options.model,
            "agent running"
        );

        match self.try_execute().await {
            Ok(text) => {
                tracing::info!(role = %self.role, chars = text.len(), "agent completed");
                AgentOutcome::Success(text)
            }
            Err(e) => {
                tracing::warn!(role = %self.role, error = %e, "agent failed");
                AgentOutcome::Failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, ScriptedCompletionClient, StubCompletionClient};

    fn specialist(role: Role, report: &str, client: Arc<dyn CompletionClient>) -> Agent {
        Agent::new(
            role,
            AgentInput::Report(report.to_string()),
            Arc::new(PromptBuilder::standard()),
            client,
            CompletionOptions::new("stub-model"),
        )
    }

    #[tokio::test]
    async fn success_wraps_completion_text() {
        let client = Arc::new(StubCompletionClient::new("No cardiac findings."));
        let agent = specialist(Role::Cardiologist, "report", client.clone());

        let outcome = agent.execute().await;

        assert_eq!(outcome, AgentOutcome::Success("No cardiac findings.".into()));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn completion_error_becomes_failure() {
        let client = Arc::new(StubCompletionClient::failing(CompletionError::Transport(
            "connection refused".into(),
        )));
        let agent = specialist(Role::Psychologist, "report", client.clone());

        let outcome = agent.execute().await;

        let reason = outcome.reason().expect("should fail");
        assert!(reason.contains("connection refused"), "got: {}", reason);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn blank_completion_becomes_failure() {
        let client = Arc::new(StubCompletionClient::new("  \n "));
        let agent = specialist(Role::Pulmonologist, "report", client);

        let outcome = agent.execute().await;

        assert!(outcome.reason().unwrap().contains("Empty completion"));
    }

    #[tokio::test]
    async fn prompt_error_fails_without_calling_client() {
        let client = Arc::new(StubCompletionClient::new("unused"));
        let agent = specialist(Role::custom("Neurologist"), "report", client.clone());

        let outcome = agent.execute().await;

        let reason = outcome.reason().expect("should fail");
        assert!(reason.contains("Neurologist"), "got: {}", reason);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn timeout_becomes_failure() {
        let client = Arc::new(
            ScriptedCompletionClient::new()
                .fallback(Reply::text("late").after(Duration::from_millis(500))),
        );
        let agent = specialist(Role::Cardiologist, "report", client)
            .with_timeout(Some(Duration::from_millis(20)));

        let outcome = agent.execute().await;

        let reason = outcome.reason().expect("should time out");
        assert!(reason.contains("timed out"), "got: {}", reason);
    }

    #[tokio::test]
    async fn prompt_contains_report_for_specialist() {
        let client = Arc::new(ScriptedCompletionClient::new().fallback(Reply::Echo));
        let agent = specialist(Role::Cardiologist, "BP 150/95", client.clone());

        let outcome = agent.execute().await;

        assert!(outcome.text().unwrap().contains("BP 150/95"));
        assert_eq!(client.prompts().len(), 1);
        assert!(client.prompts()[0].starts_with("Act like a cardiologist"));
    }

    #[tokio::test]
    async fn aggregator_agent_builds_from_findings() {
        let findings: ResultSet = [
            (Role::Cardiologist, AgentOutcome::Failure("HTTP 500".into())),
            (Role::Psychologist, AgentOutcome::Success("anxiety".into())),
            (Role::Pulmonologist, AgentOutcome::Success("clear lungs".into())),
        ]
        .into_iter()
        .collect();

        let client = Arc::new(ScriptedCompletionClient::new().fallback(Reply::Echo));
        let agent = Agent::new(
            Role::MultidisciplinaryTeam,
            AgentInput::Findings(findings),
            Arc::new(PromptBuilder::standard()),
            client,
            CompletionOptions::new("stub-model"),
        );

        let prompt = agent.prompt().unwrap();
        assert!(prompt.contains("Cardiologist Report: N/A"));
        assert!(!prompt.contains("HTTP 500"));

        let outcome = agent.execute().await;
        assert!(outcome.text().unwrap().contains("Psychologist Report: anxiety"));
    }
}
