// ABOUTME: Core library for medpanel, containing roles, prompt templates, and outcome types.
// ABOUTME: This crate is pure data and has no I/O; the agent crate drives it against an LLM.

pub mod clinical;
pub mod outcome;
pub mod prompt;
pub mod role;
pub mod template;

pub use outcome::{AgentOutcome, FinalReport, ResultSet};
pub use prompt::{NOT_AVAILABLE, PromptBuilder, PromptError, REPORT_TEXT_FIELD};
pub use role::{Role, RoleKind};
pub use template::{Template, TemplateDescriptor};
