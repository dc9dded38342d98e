//! Tolerant decoding of heterogeneous findings records.
//!
//! Findings arrive in loosely-structured shapes: absent, a single
//! object, a list of mixed objects, or a JSON-encoded string of either.
//! Decoding never fails; anything unrecognizable degrades to
//! [`Finding::Unrecognized`] or is dropped.

use crate::integration::{AppLink, Coupling, DbLink};
use serde_json::Value;

/// A single findings record, dispatched by its `type` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// Free-text tags attached to the application.
    Metadata { tags: Vec<String> },
    /// App-to-app integration evidence, already normalized to links.
    AppToApp { links: Vec<AppLink> },
    /// App-to-datastore integration evidence.
    AppToDb { links: Vec<DbLink> },
    /// Scan bookkeeping record; carries nothing the model needs.
    ScanDetails,
    /// Unknown or malformed record; ignored downstream.
    Unrecognized,
}

impl Finding {
    /// Normalize a raw findings value to a list of records.
    ///
    /// Accepts null, an object, an array, or a JSON-encoded string of
    /// either. Non-object array items (e.g. the classifier's plain
    /// string findings) are skipped. Unparsable strings yield an empty
    /// list.
    pub fn parse_list(raw: &Value) -> Vec<Finding> {
        match raw {
            Value::Null => Vec::new(),
            Value::Array(items) => items
                .iter()
                .filter(|v| v.is_object())
                .map(Finding::from_value)
                .collect(),
            Value::Object(_) => vec![Finding::from_value(raw)],
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                // One level of string-encoding is tolerated; a string
                // inside a string is not findings data.
                Ok(Value::String(_)) => Vec::new(),
                Ok(inner) => Finding::parse_list(&inner),
                Err(_) => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Decode one record. Shape mismatches degrade field-by-field
    /// rather than invalidating the record.
    pub fn from_value(value: &Value) -> Finding {
        let obj = match value.as_object() {
            Some(o) => o,
            None => return Finding::Unrecognized,
        };
        let ftype = obj
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_lowercase();

        match ftype.as_str() {
            "metadata" => {
                let tags = obj
                    .get("tags")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(as_loose_string)
                            .map(|t| t.to_lowercase())
                            .collect()
                    })
                    .unwrap_or_default();
                Finding::Metadata { tags }
            }
            "app_to_app_integration" => Finding::AppToApp {
                links: decode_app_links(obj),
            },
            "app_to_db_integration" => Finding::AppToDb {
                links: decode_db_links(obj),
            },
            "scan_details" => Finding::ScanDetails,
            _ => Finding::Unrecognized,
        }
    }
}

fn record_coupling(obj: &serde_json::Map<String, Value>) -> Option<Coupling> {
    obj.get("coupling")
        .and_then(Value::as_str)
        .map(Coupling::parse_lenient)
}

/// Prefer structured `integration_points`; fall back to a flat
/// `targets` list with the record-level coupling.
fn decode_app_links(obj: &serde_json::Map<String, Value>) -> Vec<AppLink> {
    let fallback = record_coupling(obj).unwrap_or_default();

    let points = obj.get("integration_points").and_then(Value::as_array);
    if let Some(points) = points.filter(|p| !p.is_empty()) {
        return points
            .iter()
            .filter_map(|p| {
                let point = p.as_object()?;
                let target = point.get("target").and_then(as_loose_string)?;
                let coupling = point
                    .get("coupling")
                    .and_then(Value::as_str)
                    .map(Coupling::parse_lenient)
                    .unwrap_or(fallback);
                Some(AppLink { target, coupling })
            })
            .collect();
    }

    obj.get("targets")
        .and_then(Value::as_array)
        .map(|targets| {
            targets
                .iter()
                .filter_map(as_loose_string)
                .map(|target| AppLink {
                    target,
                    coupling: fallback,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Datastore names are lowercased; the literal sentinel "none" is a
/// placeholder, never a real datastore.
fn decode_db_links(obj: &serde_json::Map<String, Value>) -> Vec<DbLink> {
    let coupling = record_coupling(obj).unwrap_or_default();

    obj.get("datastores")
        .and_then(Value::as_array)
        .map(|stores| {
            stores
                .iter()
                .filter_map(as_loose_string)
                .map(|d| d.to_lowercase())
                .filter(|d| !d.is_empty() && d != "none")
                .map(|datastore| DbLink { datastore, coupling })
                .collect()
        })
        .unwrap_or_default()
}

/// Accept strings and numbers as identifiers; everything else is noise.
fn as_loose_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_list_tolerates_garbage() {
        for raw in [
            json!(null),
            json!("{}"),
            json!("not json"),
            json!([]),
            json!([{"type": "unknown"}]),
            json!({"type": "metadata", "tags": "not-a-list"}),
            json!(42),
        ] {
            // Must never panic; shape mismatches degrade.
            let findings = Finding::parse_list(&raw);
            for f in &findings {
                match f {
                    Finding::Metadata { tags } => assert!(tags.is_empty()),
                    Finding::Unrecognized => {}
                    other => panic!("unexpected finding: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_single_object_becomes_one_record() {
        let raw = json!({"type": "metadata", "tags": ["Web", "Batch"]});
        let findings = Finding::parse_list(&raw);
        assert_eq!(
            findings,
            vec![Finding::Metadata {
                tags: vec!["web".to_string(), "batch".to_string()]
            }]
        );
    }

    #[test]
    fn test_json_encoded_string_is_unwrapped() {
        let raw = json!("[{\"type\": \"scan_details\"}]");
        assert_eq!(Finding::parse_list(&raw), vec![Finding::ScanDetails]);
    }

    #[test]
    fn test_plain_string_items_are_skipped() {
        let raw = json!(["Code contains TODO/FIXME markers", {"type": "scan_details"}]);
        assert_eq!(Finding::parse_list(&raw), vec![Finding::ScanDetails]);
    }

    #[test]
    fn test_integration_points_preferred_over_targets() {
        let raw = json!({
            "type": "app_to_app_integration",
            "coupling": "tight",
            "integration_points": [
                {"target": "billing", "coupling": "loose"},
                {"target": "ledger"},
                {"no_target": true}
            ],
            "targets": ["ignored"]
        });
        match Finding::from_value(&raw) {
            Finding::AppToApp { links } => {
                assert_eq!(
                    links,
                    vec![
                        AppLink { target: "billing".to_string(), coupling: Coupling::Loose },
                        AppLink { target: "ledger".to_string(), coupling: Coupling::Tight },
                    ]
                );
            }
            other => panic!("unexpected finding: {other:?}"),
        }
    }

    #[test]
    fn test_flat_targets_use_record_coupling() {
        let raw = json!({"type": "APP_TO_APP_INTEGRATION", "targets": ["a", "b"]});
        match Finding::from_value(&raw) {
            Finding::AppToApp { links } => {
                assert_eq!(links.len(), 2);
                assert!(links.iter().all(|l| l.coupling == Coupling::Loose));
            }
            other => panic!("unexpected finding: {other:?}"),
        }
    }

    #[test]
    fn test_db_links_drop_none_and_normalize_case() {
        let raw = json!({
            "type": "app_to_db_integration",
            "datastores": ["MySQL", "none", "NONE", ""],
            "coupling": "Tight"
        });
        match Finding::from_value(&raw) {
            Finding::AppToDb { links } => {
                assert_eq!(
                    links,
                    vec![DbLink { datastore: "mysql".to_string(), coupling: Coupling::Tight }]
                );
            }
            other => panic!("unexpected finding: {other:?}"),
        }
    }
}
