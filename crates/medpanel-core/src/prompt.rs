// ABOUTME: PromptBuilder maps a role plus its input fields to a finished prompt string.
// ABOUTME: Pure and deterministic; aggregator prompts replace failed specialist outcomes with "N/A".

use std::collections::HashMap;

use thiserror::Error;

use crate::clinical;
use crate::outcome::{AgentOutcome, ResultSet};
use crate::role::{Role, RoleKind};
use crate::template::TemplateDescriptor;

/// Slot name every specialist template uses for the raw report.
pub const REPORT_TEXT_FIELD: &str = "report_text";

/// Substituted into an aggregator slot when the specialist failed or is
/// absent. Failure reasons never reach the aggregation prompt.
pub const NOT_AVAILABLE: &str = "N/A";

/// Errors raised while building a prompt. These are configuration mistakes,
/// fatal only to the one agent that hit them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("no prompt template registered for role {0}")]
    UnknownRole(Role),

    #[error("prompt for role {role} is missing field '{field}'")]
    MissingField { role: Role, field: String },
}

/// Role-to-template catalog.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    templates: HashMap<Role, TemplateDescriptor>,
}

impl PromptBuilder {
    /// An empty catalog. Every role is unknown until registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The catalog holding the three standard specialists and the
    /// multidisciplinary team.
    pub fn standard() -> Self {
        let mut builder = Self::empty();
        for role in Role::STANDARD_SPECIALISTS
            .into_iter()
            .chain([Role::MultidisciplinaryTeam])
        {
            if let Some(descriptor) = clinical::standard_descriptor(&role) {
                builder.templates.insert(role, descriptor);
            }
        }
        builder
    }

    /// Register (or replace) the template for a role.
    pub fn with_template(mut self, role: Role, descriptor: TemplateDescriptor) -> Self {
        self.templates.insert(role, descriptor);
        self
    }

    pub fn descriptor(&self, role: &Role) -> Option<&TemplateDescriptor> {
        self.templates.get(role)
    }

    pub fn kind(&self, role: &Role) -> Option<RoleKind> {
        self.templates.get(role).map(|d| d.kind)
    }

    /// Render the prompt for `role` from named fields.
    pub fn build(&self, role: &Role, fields: &HashMap<String, String>) -> Result<String, PromptError> {
        let descriptor = self
            .templates
            .get(role)
            .ok_or_else(|| PromptError::UnknownRole(role.clone()))?;

        descriptor
            .template
            .render(fields)
            .map_err(|field| PromptError::MissingField {
                role: role.clone(),
                field,
            })
    }

    /// Render a specialist prompt for the given report.
    pub fn build_specialist(&self, role: &Role, report_text: &str) -> Result<String, PromptError> {
        let fields = HashMap::from([(REPORT_TEXT_FIELD.to_string(), report_text.to_string())]);
        self.build(role, &fields)
    }

    /// Render an aggregator prompt from specialist outcomes. Each slot bound
    /// to a specialist gets that specialist's text on success and
    /// [`NOT_AVAILABLE`] on failure or when the role has no entry.
    pub fn build_aggregate(&self, role: &Role, results: &ResultSet) -> Result<String, PromptError> {
        let descriptor = self
            .templates
            .get(role)
            .ok_or_else(|| PromptError::UnknownRole(role.clone()))?;

        let fields: HashMap<String, String> = descriptor
            .sources
            .iter()
            .map(|(slot, source)| {
                let value = match results.get(source) {
                    Some(AgentOutcome::Success(text)) => text.clone(),
                    Some(AgentOutcome::Failure(_)) | None => NOT_AVAILABLE.to_string(),
                };
                (slot.clone(), value)
            })
            .collect();

        self.build(role, &fields)
    }
}
