//! Weighted signal table and scorer.
//!
//! Each signal is a regex contributing a fixed weight of evidence
//! toward one migration pattern. A pattern's score is the sum of its
//! firing signals' weights, capped at 1.0.

use migmap_assess_schema::PatternId;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Signal table: (regex, target pattern, weight). Declaration order is
/// the stable ordering of fired-signal identifiers.
const SIGNALS: &[(&str, PatternId, f64)] = &[
    // P1 (GCE replatform) signals
    (r"terraform", PatternId::P1, 0.3),
    (r"\.tf$", PatternId::P1, 0.3),
    (r"github.?actions|\.github", PatternId::P1, 0.2),
    (r"azure.?vm|azurerm_virtual", PatternId::P1, 0.4),
    (r"startup.?script|systemd|service.?unit", PatternId::P1, 0.3),
    (r"nginx|apache|iis", PatternId::P1, 0.25),
    (r"main\.tf|variables\.tf", PatternId::P1, 0.35),
    (r"app.?server|web.?server", PatternId::P1, 0.2),
    // P2 (load balancer) signals
    (r"load.?balanc", PatternId::P2, 0.4),
    (r"azure_lb|azurerm_lb", PatternId::P2, 0.5),
    (r"backend.?pool|frontend.?ip", PatternId::P2, 0.4),
    (r"health.?probe|health.?check", PatternId::P2, 0.3),
    (r"ingress|ssl.?cert|https", PatternId::P2, 0.2),
    (r"traffic.?manager|app.?gateway", PatternId::P2, 0.35),
    (r"port.*80|port.*443", PatternId::P2, 0.15),
    // P3 (database) signals
    (r"sql|database|db", PatternId::P3, 0.25),
    (r"azure.?sql|azurerm_sql|mssql", PatternId::P3, 0.5),
    (r"postgres|postgresql|pg", PatternId::P3, 0.3),
    (r"mysql|mariadb", PatternId::P3, 0.3),
    (r"flyway|liquibase|alembic|migrate", PatternId::P3, 0.3),
    (r"connectionstring|datasource.url", PatternId::P3, 0.35),
    (r"dms|data.?migration|replicat", PatternId::P3, 0.4),
    (r"entity.?framework|hibernate|jpa", PatternId::P3, 0.25),
    (r"\.sql$|schema\.sql|init\.sql", PatternId::P3, 0.4),
    // P4 (PCF/GKE) signals
    (r"manifest\.yml|cf.?manifest", PatternId::P4, 0.6),
    (r"buildpack|cloudfoundry|pcf", PatternId::P4, 0.6),
    (r"cf push|cf create", PatternId::P4, 0.5),
    (r"kubernetes|k8s|kubectl", PatternId::P4, 0.4),
    (r"deployment\.yaml|service\.yaml", PatternId::P4, 0.4),
    (r"dockerfile|docker-compose", PatternId::P4, 0.35),
    (r"helm|helmfile", PatternId::P4, 0.4),
    (r"spring.?boot|spring.?cloud", PatternId::P4, 0.2),
    (r"\.jar$|mvn|gradle", PatternId::P4, 0.15),
    // P5 (messaging) signals
    (r"service.?bus|servicebus", PatternId::P5, 0.6),
    (r"event.?hub|eventhub", PatternId::P5, 0.5),
    (r"azure.*messag|amqp", PatternId::P5, 0.5),
    (r"queue|topic|subscription", PatternId::P5, 0.3),
    (r"pub.?sub|pubsub|google.*pub", PatternId::P5, 0.3),
    (r"kafka|rabbitmq|activemq", PatternId::P5, 0.25),
    (r"message.?flow|integration.?flow", PatternId::P5, 0.35),
    (r"dead.?letter|dlq", PatternId::P5, 0.4),
    (r"@serviceactivator|@messaginggateway", PatternId::P5, 0.4),
];

/// Compiled signal table. `(?m)` makes `$`-anchored file-extension
/// signals match per path line; `(?i)` matches the scorer's
/// case-insensitive contract.
static COMPILED: LazyLock<Vec<(Regex, &'static str, PatternId, f64)>> = LazyLock::new(|| {
    SIGNALS
        .iter()
        .map(|(pattern, target, weight)| {
            let re = Regex::new(&format!("(?mi){pattern}"))
                .unwrap_or_else(|e| panic!("invalid signal regex {pattern:?}: {e}"));
            (re, *pattern, *target, *weight)
        })
        .collect()
});

/// Output of the signal scorer.
#[derive(Debug, Clone)]
pub struct SignalScores {
    /// Score per pattern; every pattern present, default 0.0.
    pub scores: BTreeMap<PatternId, f64>,
    /// Fired-signal identifiers (`"<pattern>:<regex>"`), in declaration order.
    pub signals_hit: Vec<String>,
}

impl SignalScores {
    /// Best pattern in declared P1..P5 order; strict comparison resolves
    /// ties to the first-declared pattern.
    pub fn best(&self) -> (PatternId, f64) {
        let mut best = (PatternId::P1, 0.0);
        for id in PatternId::ALL {
            let score = self.scores.get(&id).copied().unwrap_or(0.0);
            if score > best.1 {
                best = (id, score);
            }
        }
        best
    }
}

/// Score the evidence blob against the signal table. Pure function.
pub fn score_signals(files: &[String], content_sample: &str) -> SignalScores {
    let blob = format!(
        "{}\n{}",
        files.join("\n").to_lowercase(),
        content_sample.to_lowercase()
    );

    let mut scores: BTreeMap<PatternId, f64> =
        PatternId::ALL.iter().map(|id| (*id, 0.0)).collect();
    let mut signals_hit = Vec::new();

    for (re, pattern, target, weight) in COMPILED.iter() {
        if re.is_match(&blob) {
            let score = scores.entry(*target).or_insert(0.0);
            *score = (*score + weight).min(1.0);
            signals_hit.push(format!("{target}:{pattern}"));
        }
    }

    SignalScores { scores, signals_hit }
}
