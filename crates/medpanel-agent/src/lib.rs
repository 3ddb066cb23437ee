// ABOUTME: Agent runtime for medpanel: completion clients, single-role agents, and the panel orchestrator.
// ABOUTME: Specialists fan out concurrently; their outcomes fan in to one aggregator agent.

pub mod agent;
pub mod client;
pub mod completion;
pub mod orchestrator;
pub mod providers;
pub mod testing;

pub use agent::{Agent, AgentError, AgentInput};
pub use client::create_completion_client;
pub use completion::{CompletionClient, CompletionError, CompletionOptions};
pub use orchestrator::{
    AggregationPolicy, Orchestrator, OrchestratorConfig, OrchestratorError, PanelRun,
};
