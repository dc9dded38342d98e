//! Instruction override resolver.
//!
//! User-authored keyword lists per pattern can override the signal
//! scorer's verdict when the override evidence is strong enough.

use migmap_assess_schema::{ClassificationResult, PatternId};
use std::collections::BTreeMap;

/// At most this many keywords are considered per pattern.
const MAX_KEYWORDS: usize = 50;
/// Minimum keyword hits required to override the classification.
const MIN_HITS: usize = 2;

/// Resolve the effective pattern given user instructions.
///
/// Each pattern's instruction string is a comma-separated keyword list;
/// keywords are trimmed, lowercased, and counted as substring hits in
/// the lowercased content sample. The max-hit pattern wins only with at
/// least two hits; ties resolve to the first-declared pattern.
pub fn resolve_override(
    initial: PatternId,
    content_sample: &str,
    instructions: &BTreeMap<PatternId, String>,
) -> PatternId {
    let content = content_sample.to_lowercase();

    let mut best = (initial, 0usize);
    let mut first = true;
    for id in PatternId::ALL {
        let hits = instructions
            .get(&id)
            .map(|text| keyword_hits(text, &content))
            .unwrap_or(0);
        if first || hits > best.1 {
            best = (id, hits);
            first = false;
        }
    }

    if best.1 >= MIN_HITS {
        best.0
    } else {
        initial
    }
}

/// Apply the override in place, updating pattern id and labels.
pub fn apply_overrides(
    result: &mut ClassificationResult,
    content_sample: &str,
    instructions: &BTreeMap<PatternId, String>,
) {
    let selected = resolve_override(result.pattern_id, content_sample, instructions);
    if selected != result.pattern_id {
        tracing::debug!(
            from = %result.pattern_id,
            to = %selected,
            "instruction override changed classification"
        );
        result.override_pattern(selected);
    }
}

fn keyword_hits(text: &str, lowercased_content: &str) -> usize {
    text.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .take(MAX_KEYWORDS)
        .filter(|k| lowercased_content.contains(k.as_str()))
        .count()
}
