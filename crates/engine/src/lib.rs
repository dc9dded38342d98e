//! Migmap engine - classify repositories, model integrations, build
//! dependency graphs and migration bundles.

pub mod bundles;
pub mod classify;
pub mod embeddings;
pub mod graph;
pub mod instructions;
pub mod integration;
pub mod signals;

use migmap_assess_schema::{ClassificationResult, PatternId};
use std::collections::BTreeMap;

/// Run the full per-repository assessment pipeline.
pub fn assess_repository(
    files: &[String],
    content_sample: &str,
    instructions: &BTreeMap<PatternId, String>,
) -> ClassificationResult {
    // Step 1: Score signals and classify
    let mut result = classify::classify_repository(files, content_sample);

    // Step 2: Apply user instruction overrides
    instructions::apply_overrides(&mut result, content_sample, instructions);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_classifies_and_overrides() {
        let files = vec!["manifest.yml".to_string(), "src/App.java".to_string()];
        let content = "cf push with buildpack, kafka topics and kafka dead letter handling";

        let plain = assess_repository(&files, content, &BTreeMap::new());
        assert_eq!(plain.pattern_id, PatternId::P4);

        let mut inst = BTreeMap::new();
        inst.insert(PatternId::P5, "kafka, dead letter".to_string());
        let overridden = assess_repository(&files, content, &inst);
        assert_eq!(overridden.pattern_id, PatternId::P5);
        assert_eq!(overridden.target_platform, "Pub/Sub");
        // Scores reflect the original signal evidence, not the override.
        assert_eq!(plain.scores, overridden.scores);
    }

    #[test]
    fn test_pipeline_never_fails_on_garbage() {
        let result = assess_repository(&[], "\u{0}\u{1}\u{2} binary junk", &BTreeMap::new());
        assert_eq!(result.pattern_id, PatternId::P1);
        assert!(result.risk_score >= 1.0);
    }
}
