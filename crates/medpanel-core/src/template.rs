// ABOUTME: Prompt template parsing and rendering with named `{slot}` substitution points.
// ABOUTME: Also defines TemplateDescriptor, the per-role catalog entry used by PromptBuilder.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::role::{Role, RoleKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum Segment {
    Literal(String),
    Slot(String),
}

/// A prompt template parsed once into literal text and named slots.
///
/// A slot is written `{name}` where `name` is made of lowercase ASCII
/// letters, digits and underscores. Any other brace text is kept literally,
/// so prose such as `{ "json": true }` survives unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_slot_name(&after[..close]) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(after[..close].to_string()));
                    rest = &after[close + 1..];
                }
                _ => {
                    literal.push('{');
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Slot names in order of first appearance.
    pub fn slots(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Slot(name) = segment
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }

    /// Render the template in a single pass. Substituted values are never
    /// re-scanned for slots. Returns the first slot with no value as `Err`.
    pub fn render(&self, fields: &HashMap<String, String>) -> Result<String, String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(name) => match fields.get(name) {
                    Some(value) => out.push_str(value),
                    None => return Err(name.clone()),
                },
            }
        }
        Ok(out)
    }
}

fn is_slot_name(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Catalog entry describing how to prompt one role.
///
/// Specialist descriptors carry a single `report_text` slot. Aggregator
/// descriptors bind each of their slots to the specialist role whose
/// outcome fills it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub kind: RoleKind,
    pub template: Template,
    pub sources: Vec<(String, Role)>,
}

impl TemplateDescriptor {
    pub fn specialist(source: &str) -> Self {
        Self {
            kind: RoleKind::Specialist,
            template: Template::parse(source),
            sources: Vec::new(),
        }
    }

    /// Build an aggregator descriptor. `sources` maps slot names to the
    /// specialist roles that fill them.
    pub fn aggregator<S: Into<String>>(source: &str, sources: impl IntoIterator<Item = (S, Role)>) -> Self {
        Self {
            kind: RoleKind::Aggregator,
            template: Template::parse(source),
            sources: sources.into_iter().map(|(slot, role)| (slot.into(), role)).collect(),
        }
    }
}
