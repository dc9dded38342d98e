//! Integration model extraction from raw findings.

use migmap_assess_schema::{Finding, IntegrationModel};
use serde_json::Value;
use std::collections::BTreeSet;

/// Derive the normalized integration model from a raw findings value.
///
/// Stateless and cheap; invoked once per application per graph or
/// bundle request. Malformed input degrades to an empty model.
pub fn extract_integration_model(findings_raw: &Value) -> IntegrationModel {
    let mut model = IntegrationModel::default();
    let mut tags: BTreeSet<String> = BTreeSet::new();

    for finding in Finding::parse_list(findings_raw) {
        match finding {
            Finding::Metadata { tags: t } => tags.extend(t),
            Finding::AppToApp { links } => model.app_links.extend(links),
            Finding::AppToDb { links } => model.db_links.extend(links),
            Finding::ScanDetails | Finding::Unrecognized => {}
        }
    }

    model.tags = tags.into_iter().collect();
    model
}
