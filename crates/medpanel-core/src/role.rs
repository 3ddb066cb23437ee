// ABOUTME: Defines the Role enum identifying each analyzer on the panel.
// ABOUTME: Standard specialists and the multidisciplinary aggregator, plus data-registered custom roles.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies an analyzer on the panel. The standard roles come with
/// clinical templates; `Custom` roles need a template registered on the
/// `PromptBuilder` before they can run.
///
/// A custom name that matches a standard label resolves to the standard
/// role, so `Custom("Cardiologist")` never exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RoleRepr")]
pub enum Role {
    Cardiologist,
    Psychologist,
    Pulmonologist,
    MultidisciplinaryTeam,
    Custom(String),
}

/// Wire shape of `Role`; deserialized custom names are normalized on the way in.
#[derive(Deserialize)]
enum RoleRepr {
    Cardiologist,
    Psychologist,
    Pulmonologist,
    MultidisciplinaryTeam,
    Custom(String),
}

impl From<RoleRepr> for Role {
    fn from(repr: RoleRepr) -> Self {
        match repr {
            RoleRepr::Cardiologist => Role::Cardiologist,
            RoleRepr::Psychologist => Role::Psychologist,
            RoleRepr::Pulmonologist => Role::Pulmonologist,
            RoleRepr::MultidisciplinaryTeam => Role::MultidisciplinaryTeam,
            RoleRepr::Custom(name) => Role::custom(name),
        }
    }
}

/// Whether a role analyzes the raw report or synthesizes specialist findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleKind {
    Specialist,
    Aggregator,
}

impl Role {
    /// The three specialists consulted by the standard panel, in report order.
    pub const STANDARD_SPECIALISTS: [Role; 3] =
        [Role::Cardiologist, Role::Psychologist, Role::Pulmonologist];

    /// Return a human-readable label for this role.
    pub fn label(&self) -> &str {
        match self {
            Role::Cardiologist => "Cardiologist",
            Role::Psychologist => "Psychologist",
            Role::Pulmonologist => "Pulmonologist",
            Role::MultidisciplinaryTeam => "MultidisciplinaryTeam",
            Role::Custom(name) => name,
        }
    }

    /// A role by name. Standard labels resolve to their built-in role.
    pub fn custom(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.parse() {
            Ok(role) => role,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = Infallible;

    /// Standard labels match case-insensitively; anything else is a custom role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = match s.trim().to_ascii_lowercase().as_str() {
            "cardiologist" => Role::Cardiologist,
            "psychologist" => Role::Psychologist,
            "pulmonologist" => Role::Pulmonologist,
            "multidisciplinaryteam" | "multidisciplinary_team" => Role::MultidisciplinaryTeam,
            _ => Role::Custom(s.trim().to_string()),
        };
        Ok(role)
    }
}
