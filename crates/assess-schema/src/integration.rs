//! Integration model - normalized view of an application's findings.

use serde::{Deserialize, Serialize};

/// Qualitative coupling strength of a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Coupling {
    Tight,
    #[default]
    Loose,
}

impl Coupling {
    /// Parse a coupling value leniently; anything that is not "tight"
    /// (case-insensitive) is loose.
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("tight") {
            Coupling::Tight
        } else {
            Coupling::Loose
        }
    }

    pub fn is_tight(&self) -> bool {
        matches!(self, Coupling::Tight)
    }
}

impl std::fmt::Display for Coupling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Coupling::Tight => "tight",
            Coupling::Loose => "loose",
        };
        f.write_str(s)
    }
}

/// Application-to-application dependency link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppLink {
    /// Identity of the target application (may be external to the run).
    pub target: String,
    pub coupling: Coupling,
}

/// Application-to-datastore dependency link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbLink {
    /// Lowercased datastore name; never the literal "none".
    pub datastore: String,
    pub coupling: Coupling,
}

/// Normalized integration model derived from an application's findings.
///
/// Stateless function of findings content; malformed findings degrade
/// to an empty model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationModel {
    pub app_links: Vec<AppLink>,
    pub db_links: Vec<DbLink>,
    /// Sorted, deduplicated, lowercased free-text tags.
    pub tags: Vec<String>,
}

impl IntegrationModel {
    pub fn is_empty(&self) -> bool {
        self.app_links.is_empty() && self.db_links.is_empty() && self.tags.is_empty()
    }
}
