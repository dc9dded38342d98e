//! Classification result types - output of the pattern classifier.

use crate::pattern::{pattern, PatternId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complexity tier derived from the sampled content size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        };
        f.write_str(s)
    }
}

/// Result of classifying one scanned repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Assigned migration pattern.
    pub pattern_id: PatternId,
    /// Human-readable pattern name.
    pub pattern_name: String,
    /// Target platform label for the assigned pattern.
    pub target_platform: String,
    /// Classification confidence, 0.0 - 0.99, rounded to 2 decimals.
    pub confidence: f64,
    /// Per-pattern scores, all five patterns present.
    pub scores: BTreeMap<PatternId, f64>,
    /// Identifiers of fired signals, declaration order, first 20.
    pub signals_hit: Vec<String>,
    /// Heuristic risk score, 1.0 - 10.0, rounded to 1 decimal.
    pub risk_score: f64,
    /// Complexity tier from sampled line count.
    pub complexity: Complexity,
    /// Rule-based observations, at most 10.
    pub findings: Vec<String>,
}

impl ClassificationResult {
    /// Re-point the result at a different pattern, keeping scores and
    /// findings intact. Used by the instruction override resolver.
    pub fn override_pattern(&mut self, id: PatternId) {
        let p = pattern(id);
        self.pattern_id = id;
        self.pattern_name = p.name.to_string();
        self.target_platform = p.target_platform.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_pattern_updates_labels() {
        let p1 = pattern(PatternId::P1);
        let mut result = ClassificationResult {
            pattern_id: PatternId::P1,
            pattern_name: p1.name.to_string(),
            target_platform: p1.target_platform.to_string(),
            confidence: 0.5,
            scores: BTreeMap::new(),
            signals_hit: vec![],
            risk_score: 4.0,
            complexity: Complexity::Low,
            findings: vec![],
        };
        result.override_pattern(PatternId::P4);
        assert_eq!(result.pattern_id, PatternId::P4);
        assert_eq!(result.target_platform, "GKE");
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_complexity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Complexity::Medium).unwrap(), "\"medium\"");
    }
}
