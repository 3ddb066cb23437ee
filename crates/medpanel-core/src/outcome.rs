// ABOUTME: Outcome types produced by the panel: per-agent AgentOutcome, the ResultSet, and the FinalReport.
// ABOUTME: Failures are carried as data so one agent's error never becomes another's control flow.

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// The result of one agent execution. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum AgentOutcome {
    Success(String),
    Failure(String),
}

impl AgentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AgentOutcome::Success(_))
    }

    /// The completion text, or `None` for a failure.
    pub fn text(&self) -> Option<&str> {
        match self {
            AgentOutcome::Success(text) => Some(text),
            AgentOutcome::Failure(_) => None,
        }
    }

    /// The failure reason, or `None` for a success.
    pub fn reason(&self) -> Option<&str> {
        match self {
            AgentOutcome::Success(_) => None,
            AgentOutcome::Failure(reason) => Some(reason),
        }
    }
}

/// Specialist outcomes keyed by role, kept in the order roles were inserted.
///
/// After the fan-out barrier this holds exactly one entry per configured
/// specialist. Inserting a role that is already present replaces its outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    entries: Vec<(Role, AgentOutcome)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: Role, outcome: AgentOutcome) {
        match self.entries.iter_mut().find(|(r, _)| *r == role) {
            Some(entry) => entry.1 = outcome,
            None => self.entries.push((role, outcome)),
        }
    }

    pub fn get(&self, role: &Role) -> Option<&AgentOutcome> {
        self.entries
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, outcome)| outcome)
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.get(role).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Role, &AgentOutcome)> {
        self.entries.iter().map(|(role, outcome)| (role, outcome))
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.entries.iter().map(|(role, _)| role)
    }

    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }
}

impl FromIterator<(Role, AgentOutcome)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (Role, AgentOutcome)>>(iter: I) -> Self {
        let mut set = ResultSet::new();
        for (role, outcome) in iter {
            set.insert(role, outcome);
        }
        set
    }
}

/// The consolidated report produced by the aggregator, or why it could not be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum FinalReport {
    Success(String),
    Failure(String),
}

impl FinalReport {
    pub fn is_success(&self) -> bool {
        matches!(self, FinalReport::Success(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            FinalReport::Success(text) => Some(text),
            FinalReport::Failure(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            FinalReport::Success(_) => None,
            FinalReport::Failure(reason) => Some(reason),
        }
    }
}

impl From<AgentOutcome> for FinalReport {
    fn from(outcome: AgentOutcome) -> Self {
        match outcome {
            AgentOutcome::Success(text) => FinalReport::Success(text),
            AgentOutcome::Failure(reason) => FinalReport::Failure(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_accessors() {
        let ok = AgentOutcome::Success("fine".to_string());
        let bad = AgentOutcome::Failure("boom".to_string());

        assert!(ok.is_success());
        assert_eq!(ok.text(), Some("fine"));
        assert_eq!(ok.reason(), None);

        assert!(!bad.is_success());
        assert_eq!(bad.text(), None);
        assert_eq!(bad.reason(), Some("boom"));
    }

    #[test]
    fn result_set_preserves_insertion_order_and_replaces_duplicates() {
        let mut set = ResultSet::new();
        set.insert(Role::Pulmonologist, AgentOutcome::Success("p".into()));
        set.insert(Role::Cardiologist, AgentOutcome::Failure("x".into()));
        set.insert(Role::Pulmonologist, AgentOutcome::Success("p2".into()));

        assert_eq!(set.len(), 2);
        let roles: Vec<&Role> = set.roles().collect();
        assert_eq!(roles, vec![&Role::Pulmonologist, &Role::Cardiologist]);
        assert_eq!(
            set.get(&Role::Pulmonologist),
            Some(&AgentOutcome::Success("p2".into()))
        );
        assert_eq!(set.success_count(), 1);
        assert_eq!(set.failure_count(), 1);
        assert!(!set.contains(&Role::Psychologist));
    }

    #[test]
    fn final_report_mirrors_agent_outcome() {
        let ok: FinalReport = AgentOutcome::Success("summary".into()).into();
        assert_eq!(ok, FinalReport::Success("summary".into()));

        let bad: FinalReport = AgentOutcome::Failure("no response".into()).into();
        assert_eq!(bad.reason(), Some("no response"));
        assert!(!bad.is_success());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(AgentOutcome::Failure("timeout".into())).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["text"], "timeout");
    }
}
