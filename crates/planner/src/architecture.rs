//! Target-architecture summaries per migration pattern.

use migmap_assess_schema::PatternId;
use serde::Serialize;

/// Summary of the GCP target architecture for one pattern.
#[derive(Debug, Clone, Serialize)]
pub struct TargetArchitecture {
    pub target: &'static str,
    pub components: Vec<&'static str>,
    pub diagram: Vec<&'static str>,
    pub pipeline_focus: Vec<&'static str>,
}

/// A file the migration is expected to touch, with a short rationale.
#[derive(Debug, Clone, Serialize)]
pub struct ChangedFile {
    pub file: &'static str,
    pub change: &'static str,
}

/// A rendered line of the changed-file preview.
#[derive(Debug, Clone, Serialize)]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: String,
}

/// Changed files plus a synthetic unified-diff style preview.
#[derive(Debug, Clone, Serialize)]
pub struct DiffPayload {
    pub changed_files: Vec<ChangedFile>,
    pub lines: Vec<DiffLine>,
}

/// Architecture summary for a pattern.
pub fn architecture_for(pattern_id: PatternId) -> TargetArchitecture {
    match pattern_id {
        PatternId::P1 => TargetArchitecture {
            target: "GCE",
            components: vec![
                "Global External HTTP(S) LB",
                "Cloud Armor (WAF)",
                "DMZ subnet",
                "Managed Instance Group (GCE)",
                "Cloud SQL (private IP)",
                "Cloud Logging",
            ],
            diagram: vec![
                "Users -> Global External HTTP(S) LB",
                "LB -> Cloud Armor policy -> DMZ NEG",
                "DMZ tier -> Internal service tier (GCE MIG)",
                "Service tier -> Cloud SQL (private service networking)",
            ],
            pipeline_focus: vec![
                "DMZ policy validation",
                "Blue/green deploy",
                "Synthetic health checks",
                "Canary cutover",
            ],
        },
        PatternId::P2 => TargetArchitecture {
            target: "Cloud Load Balancing",
            components: vec![
                "Global External HTTP(S) LB (Layer 7)",
                "Regional backends",
                "URL maps + host rules",
                "Cloud CDN",
                "Cloud Armor",
                "Health checks",
            ],
            diagram: vec![
                "Users -> Global External HTTP(S) LB",
                "LB -> URL map (host/path routing)",
                "URL map -> Backend service pools (active-active)",
                "Backend pools -> Existing app tier",
            ],
            pipeline_focus: vec![
                "Traffic replay",
                "L7 route tests",
                "Canary weight shift",
                "Global failover drill",
            ],
        },
        PatternId::P3 => TargetArchitecture {
            target: "Cloud SQL + DMS",
            components: vec![
                "Cloud SQL HA",
                "Database Migration Service",
                "Connection profiles",
                "CDC validation jobs",
                "Secret Manager",
                "Cloud Monitoring",
            ],
            diagram: vec![
                "Source DB -> DMS replication job",
                "DMS -> Cloud SQL",
                "Validation runner -> row/hash diff checks",
                "App -> Cloud SQL",
            ],
            pipeline_focus: vec![
                "Schema drift check",
                "Dry-run migration",
                "CDC lag SLO gates",
                "Cutover guardrails",
            ],
        },
        PatternId::P4 => TargetArchitecture {
            target: "GKE",
            components: vec![
                "Artifact Registry",
                "GKE Cluster",
                "ConfigMaps/Secrets",
                "Cloud SQL",
                "Ingress",
            ],
            diagram: vec![
                "CI/CD -> Artifact Registry",
                "Artifact Registry -> GKE Deployment",
                "Ingress -> GKE Service -> Pods",
                "Pods -> Cloud SQL",
            ],
            pipeline_focus: vec![
                "Container security scan",
                "Helm upgrade",
                "Progressive delivery",
                "SLO checks",
            ],
        },
        PatternId::P5 => TargetArchitecture {
            target: "Pub/Sub",
            components: vec![
                "Pub/Sub Topics",
                "Subscriptions",
                "Dead Letter Topic",
                "Cloud Functions/Run Subscribers",
            ],
            diagram: vec![
                "Producer -> Pub/Sub Topic",
                "Topic -> Subscription(s)",
                "Subscriber -> App services",
                "Failures -> Dead Letter Topic",
            ],
            pipeline_focus: vec![
                "Topic contract tests",
                "Backpressure test",
                "DLQ verification",
                "Replay simulation",
            ],
        },
    }
}

/// Files the migration touches for a pattern.
pub fn changed_files(pattern_id: PatternId) -> Vec<ChangedFile> {
    match pattern_id {
        PatternId::P1 => vec![
            ChangedFile {
                file: "network/dmz.tf",
                change: "Create DMZ subnet, firewall tiers, and private service perimeter",
            },
            ChangedFile {
                file: "Jenkinsfile",
                change: "Add DMZ security gate and blue/green cutover stage",
            },
            ChangedFile {
                file: "terraform/web_mig.tf",
                change: "Provision GCE MIG with Cloud Armor-protected ingress",
            },
        ],
        PatternId::P2 => vec![
            ChangedFile {
                file: "terraform/global_lb.tf",
                change: "Create global L7 load balancer with URL maps and host rules",
            },
            ChangedFile {
                file: "pipeline/global-routing-test.yml",
                change: "Validate route/host behavior across regions before cutover",
            },
            ChangedFile {
                file: "Jenkinsfile",
                change: "Add weighted traffic shift stage and failback hooks",
            },
        ],
        PatternId::P3 => vec![
            ChangedFile {
                file: "terraform/cloudsql_dms.tf",
                change: "Provision Cloud SQL HA and DMS continuous replication",
            },
            ChangedFile {
                file: "database/cutover-runbook.md",
                change: "Document checkpoint, CDC lag threshold, and rollback plan",
            },
            ChangedFile {
                file: "Jenkinsfile",
                change: "Add dry-run migration and data parity gate",
            },
        ],
        PatternId::P4 => vec![
            ChangedFile {
                file: "Jenkinsfile",
                change: "Update deploy stage to deploy to GKE with kubectl",
            },
            ChangedFile {
                file: "terraform/gke.tf",
                change: "Add GKE cluster and node pool resources",
            },
            ChangedFile {
                file: "k8s/deployment.yaml",
                change: "Add Kubernetes deployment and service manifests",
            },
        ],
        PatternId::P5 => vec![
            ChangedFile {
                file: "terraform/pubsub.tf",
                change: "Create Pub/Sub topics, subscriptions, and DLQ routing",
            },
            ChangedFile {
                file: "services/subscriber.py",
                change: "Add idempotent subscriber with retry semantics",
            },
            ChangedFile {
                file: "Jenkinsfile",
                change: "Add contract/replay validation stage for message flows",
            },
        ],
    }
}

/// Synthetic before/after preview for the changed-file list.
pub fn diff_payload(pattern_id: PatternId) -> DiffPayload {
    let files = changed_files(pattern_id);
    let mut lines: Vec<DiffLine> = files
        .iter()
        .map(|f| DiffLine {
            kind: "@",
            content: format!("# {}", f.file),
        })
        .collect();
    for f in &files {
        lines.push(DiffLine {
            kind: "-",
            content: "old deployment target: azure".to_string(),
        });
        lines.push(DiffLine {
            kind: "+",
            content: format!("new deployment target: gcp ({})", f.change),
        });
    }
    DiffPayload {
        changed_files: files,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architecture_target_matches_pattern() {
        assert_eq!(architecture_for(PatternId::P1).target, "GCE");
        assert_eq!(architecture_for(PatternId::P3).target, "Cloud SQL + DMS");
        assert_eq!(architecture_for(PatternId::P5).target, "Pub/Sub");
    }

    #[test]
    fn test_every_pattern_has_changed_files() {
        for id in PatternId::ALL {
            let files = changed_files(id);
            assert_eq!(files.len(), 3);
            assert!(files.iter().all(|f| !f.change.is_empty()));
        }
    }

    #[test]
    fn test_diff_payload_shape() {
        let payload = diff_payload(PatternId::P4);
        // One header line per file, then a -/+ pair per file.
        assert_eq!(payload.lines.len(), payload.changed_files.len() * 3);
        assert!(payload.lines[0].content.starts_with("# "));
        assert!(payload
            .lines
            .iter()
            .filter(|l| l.kind == "+")
            .all(|l| l.content.starts_with("new deployment target: gcp")));
    }
}
