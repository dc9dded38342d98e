//! Dependency graph builder for the assessment visualization.

use crate::integration::extract_integration_model;
use migmap_assess_schema::{
    Application, AssessmentGraph, Coupling, EdgeKind, GraphEdge, GraphNode, NodeKind, RiskBand,
};
use std::collections::HashSet;

/// Accumulates nodes deduplicated by id; first-seen attributes win.
struct GraphBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    seen: HashSet<String>,
}

impl GraphBuilder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn add_node(&mut self, node: GraphNode) {
        if self.seen.insert(node.id.clone()) {
            self.nodes.push(node);
        }
    }
}

/// Build the dependency graph for one scan run.
///
/// Deterministic for a given application order; rebuilding yields the
/// same node set and the same edge sequence.
pub fn build_graph(run_id: &str, apps: &[Application]) -> AssessmentGraph {
    let mut g = GraphBuilder::new();
    let app_ids: HashSet<&str> = apps.iter().map(|a| a.id.as_str()).collect();

    for app in apps {
        let risk = app.risk_score;
        g.add_node(GraphNode {
            id: app.id.clone(),
            label: app.name.clone(),
            kind: NodeKind::App,
            pattern: Some(app.pattern_id),
            risk_score: Some(risk),
            risk: Some(RiskBand::from_risk(risk)),
            critical: Some(risk >= 70.0),
        });

        let target_id = format!("gcp-{}", app.id);
        g.add_node(GraphNode {
            id: target_id.clone(),
            label: app.target_platform.clone(),
            kind: NodeKind::MigrationTarget,
            pattern: None,
            risk_score: None,
            risk: None,
            critical: None,
        });
        g.edges.push(GraphEdge {
            from: app.id.clone(),
            to: target_id,
            kind: EdgeKind::MigratesTo,
            coupling: None,
            weight: None,
        });

        let model = extract_integration_model(&app.findings_value());
        for link in &model.app_links {
            if app_ids.contains(link.target.as_str()) {
                g.edges.push(GraphEdge {
                    from: app.id.clone(),
                    to: link.target.clone(),
                    kind: EdgeKind::Calls,
                    coupling: Some(link.coupling),
                    weight: Some(if link.coupling.is_tight() { 3 } else { 1 }),
                });
            } else {
                let ext_id = format!("ext-{}", link.target);
                g.add_node(GraphNode {
                    id: ext_id.clone(),
                    label: link.target.clone(),
                    kind: NodeKind::ExternalApp,
                    pattern: None,
                    risk_score: None,
                    risk: None,
                    critical: None,
                });
                g.edges.push(GraphEdge {
                    from: app.id.clone(),
                    to: ext_id,
                    kind: EdgeKind::Calls,
                    coupling: Some(link.coupling),
                    weight: Some(1),
                });
            }
        }

        for db_link in &model.db_links {
            let db_id = format!("db-{}", db_link.datastore);
            g.add_node(GraphNode {
                id: db_id.clone(),
                label: db_link.datastore.to_uppercase(),
                kind: NodeKind::Datastore,
                pattern: None,
                risk_score: None,
                risk: None,
                critical: None,
            });
            g.edges.push(GraphEdge {
                from: app.id.clone(),
                to: db_id,
                kind: EdgeKind::ReadsWrites,
                coupling: Some(db_link.coupling),
                weight: Some(if db_link.coupling.is_tight() { 4 } else { 2 }),
            });
        }
    }

    AssessmentGraph {
        run_id: run_id.to_string(),
        nodes: g.nodes,
        edges: g.edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migmap_assess_schema::{pattern, Complexity, PatternId};
    use migmap_common::Timestamp;
    use serde_json::{json, Value};

    fn app(id: &str, pattern_id: PatternId, risk: f64, findings: Vec<Value>) -> Application {
        let p = pattern(pattern_id);
        Application {
            id: id.to_string(),
            scan_run_id: "run1".to_string(),
            name: format!("{id}-name"),
            repo_full_name: format!("acme/{id}"),
            language: "Java".to_string(),
            framework: "spring".to_string(),
            loc: 100,
            complexity: Complexity::Low,
            risk_score: risk,
            pattern_id,
            pattern_name: p.name.to_string(),
            target_platform: p.target_platform.to_string(),
            has_dockerfile: false,
            has_terraform: false,
            has_jenkinsfile: false,
            has_github_actions: false,
            has_pcf: false,
            has_db: false,
            has_messaging: false,
            db_types: vec![],
            dependencies: vec![],
            files: vec![],
            findings,
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn test_every_app_gets_target_node_and_edge() {
        let apps = vec![app("A", PatternId::P1, 5.0, vec![])];
        let graph = build_graph("run1", &apps);
        assert!(graph.nodes.iter().any(|n| n.id == "A" && n.kind == NodeKind::App));
        assert!(graph
            .nodes
            .iter()
            .any(|n| n.id == "gcp-A" && n.kind == NodeKind::MigrationTarget));
        assert!(graph
            .edges
            .iter()
            .any(|e| e.from == "A" && e.to == "gcp-A" && e.kind == EdgeKind::MigratesTo));
    }

    #[test]
    fn test_in_run_call_edge_weights() {
        let findings = vec![json!({
            "type": "app_to_app_integration",
            "integration_points": [{"target": "B", "coupling": "tight"}]
        })];
        let apps = vec![
            app("A", PatternId::P1, 5.0, findings),
            app("B", PatternId::P1, 5.0, vec![]),
        ];
        let graph = build_graph("run1", &apps);
        let call = graph
            .edges
            .iter()
            .find(|e| e.kind == EdgeKind::Calls)
            .unwrap();
        assert_eq!(call.to, "B");
        assert_eq!(call.weight, Some(3));
        assert_eq!(call.coupling, Some(Coupling::Tight));
    }

    #[test]
    fn test_external_target_becomes_external_node() {
        let findings = vec![json!({
            "type": "app_to_app_integration",
            "targets": ["mainframe"]
        })];
        let apps = vec![app("A", PatternId::P1, 5.0, findings)];
        let graph = build_graph("run1", &apps);
        let ext = graph
            .nodes
            .iter()
            .find(|n| n.kind == NodeKind::ExternalApp)
            .unwrap();
        assert_eq!(ext.id, "ext-mainframe");
        let call = graph.edges.iter().find(|e| e.kind == EdgeKind::Calls).unwrap();
        assert_eq!(call.weight, Some(1));
    }

    #[test]
    fn test_datastore_nodes_dedup_but_edges_do_not() {
        let db = json!({"type": "app_to_db_integration", "datastores": ["postgres"], "coupling": "tight"});
        let apps = vec![
            app("A", PatternId::P3, 5.0, vec![db.clone()]),
            app("B", PatternId::P3, 5.0, vec![db]),
        ];
        let graph = build_graph("run1", &apps);
        let db_nodes: Vec<_> = graph
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Datastore)
            .collect();
        assert_eq!(db_nodes.len(), 1);
        assert_eq!(db_nodes[0].label, "POSTGRES");
        let db_edges: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::ReadsWrites)
            .collect();
        assert_eq!(db_edges.len(), 2);
        assert!(db_edges.iter().all(|e| e.weight == Some(4)));
    }

    #[test]
    fn test_idempotent_on_node_identity() {
        let findings = vec![json!({
            "type": "app_to_db_integration", "datastores": ["mysql"], "coupling": "loose"
        })];
        let apps = vec![
            app("A", PatternId::P1, 80.0, findings),
            app("B", PatternId::P2, 30.0, vec![]),
        ];
        let first = build_graph("run1", &apps);
        let second = build_graph("run1", &apps);
        let ids = |g: &AssessmentGraph| g.nodes.iter().map(|n| n.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.edges.len(), second.edges.len());
    }

    #[test]
    fn test_risk_band_and_critical_flag() {
        let apps = vec![app("A", PatternId::P1, 72.0, vec![])];
        let graph = build_graph("run1", &apps);
        let node = graph.nodes.iter().find(|n| n.id == "A").unwrap();
        assert_eq!(node.risk, Some(RiskBand::High));
        assert_eq!(node.critical, Some(true));
    }
}
