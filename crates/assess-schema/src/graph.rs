//! Dependency graph types for the assessment visualization.

use crate::integration::Coupling;
use crate::pattern::PatternId;
use serde::{Deserialize, Serialize};

/// Kind of graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// An application scanned in this run.
    App,
    /// The application's migration target platform.
    MigrationTarget,
    /// An application referenced by findings but not in this run.
    ExternalApp,
    /// A datastore referenced by db links.
    Datastore,
}

/// Qualitative risk band for an application node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    High,
    Medium,
    Low,
}

impl RiskBand {
    /// Band thresholds: high >= 70, medium >= 40, else low.
    pub fn from_risk(risk: f64) -> Self {
        if risk >= 70.0 {
            RiskBand::High
        } else if risk >= 40.0 {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }
}

/// Kind of graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    #[serde(rename = "migrates_to")]
    MigratesTo,
    #[serde(rename = "calls")]
    Calls,
    #[serde(rename = "reads/writes")]
    ReadsWrites,
}

/// A node in the assessment graph. Identity is `id`; nodes are
/// deduplicated by id with first-seen attributes winning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<bool>,
}

/// An edge in the assessment graph. Edges are never deduplicated;
/// parallel edges between the same pair are meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupling: Option<Coupling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

/// The complete graph for one scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentGraph {
    pub run_id: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_band_thresholds() {
        assert_eq!(RiskBand::from_risk(85.0), RiskBand::High);
        assert_eq!(RiskBand::from_risk(70.0), RiskBand::High);
        assert_eq!(RiskBand::from_risk(69.9), RiskBand::Medium);
        assert_eq!(RiskBand::from_risk(40.0), RiskBand::Medium);
        assert_eq!(RiskBand::from_risk(7.5), RiskBand::Low);
    }

    #[test]
    fn test_edge_kind_wire_names() {
        assert_eq!(serde_json::to_string(&EdgeKind::ReadsWrites).unwrap(), "\"reads/writes\"");
        assert_eq!(serde_json::to_string(&EdgeKind::MigratesTo).unwrap(), "\"migrates_to\"");
    }
}
