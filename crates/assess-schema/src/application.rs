//! Application record - a scanned repository's persisted state.

use crate::classify::Complexity;
use crate::pattern::PatternId;
use migmap_common::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scanned repository, owned by a scan run.
///
/// Created during scan; re-scan upserts by `id`. The core never deletes
/// application records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Stable identity, e.g. `a1b2c3d4-APP-001`.
    pub id: String,
    /// Owning scan run.
    pub scan_run_id: String,
    /// Short repository name.
    pub name: String,
    /// Source coordinates, e.g. `owner/repo` or a local path.
    pub repo_full_name: String,
    pub language: String,
    pub framework: String,
    /// Estimated lines of sampled code.
    pub loc: u64,
    pub complexity: Complexity,
    pub risk_score: f64,
    pub pattern_id: PatternId,
    pub pattern_name: String,
    pub target_platform: String,
    pub has_dockerfile: bool,
    pub has_terraform: bool,
    pub has_jenkinsfile: bool,
    pub has_github_actions: bool,
    pub has_pcf: bool,
    pub has_db: bool,
    pub has_messaging: bool,
    /// Detected database engines, lowercased.
    pub db_types: Vec<String>,
    /// Detected dependency managers.
    pub dependencies: Vec<String>,
    /// Sampled file paths (bounded upstream).
    pub files: Vec<String>,
    /// Raw findings records: classifier observations (strings) mixed
    /// with tagged integration records. Input to the integration
    /// extractor, which tolerates any shape found here.
    pub findings: Vec<Value>,
    pub created_at: Timestamp,
}

impl Application {
    /// Findings as a single value, the shape the extractor consumes.
    pub fn findings_value(&self) -> Value {
        Value::Array(self.findings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_application_round_trip() {
        let app = Application {
            id: "run1-APP-001".to_string(),
            scan_run_id: "run1".to_string(),
            name: "billing".to_string(),
            repo_full_name: "acme/billing".to_string(),
            language: "Java".to_string(),
            framework: "spring".to_string(),
            loc: 1200,
            complexity: Complexity::Medium,
            risk_score: 6.5,
            pattern_id: PatternId::P3,
            pattern_name: "Database Rebuild".to_string(),
            target_platform: "Cloud SQL".to_string(),
            has_dockerfile: false,
            has_terraform: true,
            has_jenkinsfile: true,
            has_github_actions: false,
            has_pcf: false,
            has_db: true,
            has_messaging: false,
            db_types: vec!["postgres".to_string()],
            dependencies: vec!["maven".to_string()],
            files: vec!["pom.xml".to_string()],
            findings: vec![json!("Code contains TODO/FIXME markers")],
            created_at: Timestamp::now(),
        };
        let json = serde_json::to_string(&app).unwrap();
        let parsed: Application = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, app.id);
        assert_eq!(parsed.pattern_id, PatternId::P3);
        assert_eq!(parsed.findings.len(), 1);
    }
}
