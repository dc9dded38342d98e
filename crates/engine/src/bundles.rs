//! Bundle clusterer: coupling graph, connected components, affinity
//! scoring.

use crate::integration::extract_integration_model;
use migmap_assess_schema::{Application, Coupling, IntegrationModel, MigrationBundle};
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

/// Affinity contributed by an explicit app-to-app link.
const APP_LINK_TIGHT: u32 = 3;
const APP_LINK_LOOSE: u32 = 1;
/// Affinity contributed by a shared datastore with a tight side.
const SHARED_DB: u32 = 4;

/// Partition a scan run's applications into migration bundles.
///
/// Applications are connected by explicit app links and by shared
/// datastores where at least one side's link is tight. Every
/// application lands in exactly one bundle.
pub fn cluster_bundles(apps: &[Application]) -> Vec<MigrationBundle> {
    if apps.is_empty() {
        return Vec::new();
    }

    let index: HashMap<&str, usize> = apps
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id.as_str(), i))
        .collect();
    let models: Vec<IntegrationModel> = apps
        .iter()
        .map(|a| extract_integration_model(&a.findings_value()))
        .collect();

    let mut uf: UnionFind<usize> = UnionFind::new(apps.len());
    // Pairwise affinity, keyed by the undirected (low, high) index pair.
    let mut affinity: HashMap<(usize, usize), u32> = HashMap::new();

    let mut link = |uf: &mut UnionFind<usize>, a: usize, b: usize, score: u32| {
        uf.union(a, b);
        let key = (a.min(b), a.max(b));
        let entry = affinity.entry(key).or_insert(0);
        *entry = (*entry).max(score);
    };

    // Explicit app-to-app links between in-run applications.
    for (i, model) in models.iter().enumerate() {
        for app_link in &model.app_links {
            if let Some(&j) = index.get(app_link.target.as_str()) {
                if j == i {
                    continue;
                }
                let score = if app_link.coupling.is_tight() {
                    APP_LINK_TIGHT
                } else {
                    APP_LINK_LOOSE
                };
                link(&mut uf, i, j, score);
            }
        }
    }

    // Shared-datastore links via a datastore -> members index: one pass
    // over db links, then pairwise linking within each bucket when at
    // least one side holds a tight link to that datastore.
    let mut buckets: HashMap<&str, Vec<(usize, bool)>> = HashMap::new();
    for (i, model) in models.iter().enumerate() {
        for db_link in &model.db_links {
            let bucket = buckets.entry(db_link.datastore.as_str()).or_default();
            match bucket.iter_mut().find(|(idx, _)| *idx == i) {
                Some((_, tight)) => *tight |= db_link.coupling.is_tight(),
                None => bucket.push((i, db_link.coupling.is_tight())),
            }
        }
    }
    for members in buckets.values() {
        for (pos, &(i, i_tight)) in members.iter().enumerate() {
            for &(j, j_tight) in &members[pos + 1..] {
                if i_tight || j_tight {
                    link(&mut uf, i, j, SHARED_DB);
                }
            }
        }
    }

    // Connected components in discovery order (application input order).
    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut root_pos: HashMap<usize, usize> = HashMap::new();
    for i in 0..apps.len() {
        let root = uf.find(i);
        match root_pos.get(&root) {
            Some(&pos) => components[pos].push(i),
            None => {
                root_pos.insert(root, components.len());
                components.push(vec![i]);
            }
        }
    }

    // Largest bundles first; stable sort keeps discovery order on ties.
    components.sort_by_key(|c| std::cmp::Reverse(c.len()));

    components
        .iter()
        .enumerate()
        .map(|(n, comp)| build_bundle(n + 1, comp, apps, &affinity))
        .collect()
}

fn build_bundle(
    seq: usize,
    comp: &[usize],
    apps: &[Application],
    affinity: &HashMap<(usize, usize), u32>,
) -> MigrationBundle {
    // Dominant pattern: majority vote, ties to the first-encountered
    // member's pattern.
    let mut counts: HashMap<migmap_assess_schema::PatternId, usize> = HashMap::new();
    for &m in comp {
        *counts.entry(apps[m].pattern_id).or_insert(0) += 1;
    }
    let mut dominant = apps[comp[0]].pattern_id;
    let mut best = 0usize;
    for &m in comp {
        let c = counts[&apps[m].pattern_id];
        if c > best {
            best = c;
            dominant = apps[m].pattern_id;
        }
    }

    let avg_risk = comp.iter().map(|&m| apps[m].risk_score).sum::<f64>() / comp.len() as f64;

    let mut affinity_score = 0u32;
    for (pos, &i) in comp.iter().enumerate() {
        for &j in &comp[pos + 1..] {
            let key = (i.min(j), i.max(j));
            affinity_score += affinity.get(&key).copied().unwrap_or(0);
        }
    }

    // Boundary equality classifies tight.
    let threshold = 4u32.max(2 * comp.len() as u32);
    let coupling = if affinity_score >= threshold {
        Coupling::Tight
    } else {
        Coupling::Loose
    };

    MigrationBundle {
        bundle_id: format!("BUNDLE-{seq:03}"),
        pattern_id: dominant,
        app_ids: comp.iter().map(|&m| apps[m].id.clone()).collect(),
        avg_risk: (avg_risk * 100.0).round() / 100.0,
        coupling,
        affinity_score,
        bundle_reason: MigrationBundle::reason_for(coupling).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migmap_assess_schema::{pattern, Complexity, PatternId};
    use migmap_common::Timestamp;
    use serde_json::{json, Value};
    use std::collections::HashSet;

    fn app(id: &str, pattern_id: PatternId, risk: f64, findings: Vec<Value>) -> Application {
        let p = pattern(pattern_id);
        Application {
            id: id.to_string(),
            scan_run_id: "run1".to_string(),
            name: id.to_string(),
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

    fn db_finding(datastore: &str, coupling: &str) -> Value {
        json!({"type": "app_to_db_integration", "datastores": [datastore], "coupling": coupling})
    }

    fn call_finding(target: &str, coupling: &str) -> Value {
        json!({"type": "app_to_app_integration", "targets": [target], "coupling": coupling})
    }

    #[test]
    fn test_empty_run_yields_no_bundles() {
        assert!(cluster_bundles(&[]).is_empty());
    }

    #[test]
    fn test_bundles_partition_the_application_set() {
        let apps = vec![
            app("A", PatternId::P1, 5.0, vec![call_finding("B", "tight")]),
            app("B", PatternId::P1, 5.0, vec![]),
            app("C", PatternId::P2, 4.0, vec![db_finding("oracle", "tight")]),
            app("D", PatternId::P3, 6.0, vec![db_finding("oracle", "loose")]),
            app("E", PatternId::P5, 3.0, vec![]),
        ];
        let bundles = cluster_bundles(&apps);

        let mut seen: HashSet<String> = HashSet::new();
        for b in &bundles {
            for id in &b.app_ids {
                assert!(seen.insert(id.clone()), "app {id} appears in two bundles");
            }
        }
        let all: HashSet<String> = apps.iter().map(|a| a.id.clone()).collect();
        assert_eq!(seen, all);
    }

    #[test]
    fn test_shared_tight_datastore_bundles_together() {
        let apps = vec![
            app("A", PatternId::P3, 6.0, vec![db_finding("postgres", "tight")]),
            app("B", PatternId::P3, 6.0, vec![db_finding("postgres", "tight")]),
        ];
        let bundles = cluster_bundles(&apps);
        assert_eq!(bundles.len(), 1);
        let b = &bundles[0];
        assert_eq!(b.app_ids, vec!["A".to_string(), "B".to_string()]);
        // affinity 4 >= max(4, 2*2): boundary equality is tight.
        assert_eq!(b.affinity_score, 4);
        assert_eq!(b.coupling, Coupling::Tight);
        assert_eq!(b.bundle_reason, "Tightly coupled via shared DB/integration");
    }

    #[test]
    fn test_one_tight_side_is_enough_for_db_link() {
        let apps = vec![
            app("A", PatternId::P3, 6.0, vec![db_finding("mysql", "tight")]),
            app("B", PatternId::P1, 4.0, vec![db_finding("mysql", "loose")]),
        ];
        let bundles = cluster_bundles(&apps);
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].affinity_score, 4);
    }

    #[test]
    fn test_loose_only_shared_datastore_does_not_link() {
        let apps = vec![
            app("A", PatternId::P3, 6.0, vec![db_finding("mysql", "loose")]),
            app("B", PatternId::P1, 4.0, vec![db_finding("mysql", "loose")]),
        ];
        let bundles = cluster_bundles(&apps);
        assert_eq!(bundles.len(), 2);
    }

    #[test]
    fn test_single_loose_call_is_a_loose_bundle() {
        let apps = vec![
            app("A", PatternId::P1, 5.0, vec![call_finding("B", "loose")]),
            app("B", PatternId::P1, 5.0, vec![]),
        ];
        let bundles = cluster_bundles(&apps);
        assert_eq!(bundles.len(), 1);
        // affinity 1 < max(4, 4).
        assert_eq!(bundles[0].affinity_score, 1);
        assert_eq!(bundles[0].coupling, Coupling::Loose);
        assert_eq!(bundles[0].bundle_reason, "Loosely coupled; can migrate in silos");
    }

    #[test]
    fn test_bundle_ids_ordered_by_size() {
        let apps = vec![
            app("solo", PatternId::P2, 4.0, vec![]),
            app("A", PatternId::P1, 5.0, vec![call_finding("B", "tight"), call_finding("C", "tight")]),
            app("B", PatternId::P1, 5.0, vec![]),
            app("C", PatternId::P4, 5.0, vec![]),
        ];
        let bundles = cluster_bundles(&apps);
        assert_eq!(bundles.len(), 2);
        assert_eq!(bundles[0].bundle_id, "BUNDLE-001");
        assert_eq!(bundles[0].app_ids.len(), 3);
        assert_eq!(bundles[1].bundle_id, "BUNDLE-002");
        assert_eq!(bundles[1].app_ids, vec!["solo".to_string()]);
    }

    #[test]
    fn test_dominant_pattern_majority_and_tie_break() {
        let apps = vec![
            app("A", PatternId::P4, 5.0, vec![call_finding("B", "tight"), call_finding("C", "tight")]),
            app("B", PatternId::P1, 5.0, vec![]),
            app("C", PatternId::P4, 5.0, vec![]),
        ];
        let bundles = cluster_bundles(&apps);
        assert_eq!(bundles[0].pattern_id, PatternId::P4);

        // Tie: first-encountered member's pattern wins.
        let tied = vec![
            app("X", PatternId::P5, 5.0, vec![call_finding("Y", "tight")]),
            app("Y", PatternId::P2, 5.0, vec![]),
        ];
        let bundles = cluster_bundles(&tied);
        assert_eq!(bundles[0].pattern_id, PatternId::P5);
    }

    #[test]
    fn test_avg_risk_rounded() {
        let apps = vec![
            app("A", PatternId::P1, 5.1, vec![call_finding("B", "tight")]),
            app("B", PatternId::P1, 6.2, vec![]),
        ];
        let bundles = cluster_bundles(&apps);
        assert_eq!(bundles[0].avg_risk, 5.65);
    }

    #[test]
    fn test_affinity_keeps_max_of_repeated_links() {
        // Loose link then tight link between the same pair: affinity 3.
        let apps = vec![
            app(
                "A",
                PatternId::P1,
                5.0,
                vec![call_finding("B", "loose"), call_finding("B", "tight")],
            ),
            app("B", PatternId::P1, 5.0, vec![]),
        ];
        let bundles = cluster_bundles(&apps);
        assert_eq!(bundles[0].affinity_score, 3);
    }

    #[test]
    fn test_self_links_are_ignored() {
        let apps = vec![app("A", PatternId::P1, 5.0, vec![call_finding("A", "tight")])];
        let bundles = cluster_bundles(&apps);
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].affinity_score, 0);
    }
}
