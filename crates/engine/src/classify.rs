//! Pattern classifier: signal scoring, risk, complexity, findings.

use crate::signals::score_signals;
use migmap_assess_schema::{pattern, ClassificationResult, Complexity, PatternId};
use regex::Regex;
use std::sync::LazyLock;

/// Best score below this means no meaningful signal fired.
const NO_SIGNAL_THRESHOLD: f64 = 0.1;
/// Fallback confidence when classification defaults to P1.
const FALLBACK_CONFIDENCE: f64 = 0.15;
/// Storage bound on fired-signal identifiers.
const MAX_SIGNALS_STORED: usize = 20;
/// Bound on rule-based findings.
const MAX_FINDINGS: usize = 10;

static SECRET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)secret|password|credential|api.?key").unwrap());
static LEGACY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)legacy|deprecated|eof|end.?of.?life").unwrap());

static TODO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"TODO|FIXME|HACK|XXX").unwrap());
static LOCALHOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"localhost|127\.0\.0\.1").unwrap());
static AZURE_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"azure\.com|azurewebsites|azurecontainer").unwrap());
static AZURE_CONN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)connectionstring.*azure|azure.*connectionstring").unwrap());
static ITSM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)servicenow|snow\.com").unwrap());
static JENKINS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)jenkins|jenkinsfile").unwrap());
static MSSQL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)mssql|sqlserver|azure.*sql").unwrap());

/// Classify a repository from its file paths and sampled content.
///
/// Never fails: zero-signal input degrades to P1 with a fixed low
/// confidence, empty content yields minimal risk and complexity.
pub fn classify_repository(files: &[String], content_sample: &str) -> ClassificationResult {
    let scored = score_signals(files, content_sample);
    let (mut best_id, mut best_score) = scored.best();

    // Nothing scored: fall back to P1 (GCE replatform) as the safest default.
    if best_score < NO_SIGNAL_THRESHOLD {
        best_id = PatternId::P1;
        best_score = FALLBACK_CONFIDENCE;
    }

    let p = pattern(best_id);
    let confidence = best_score.min(0.99);
    let risk = calc_risk(files, content_sample, best_id);
    let complexity = complexity_from_loc(loc_estimate(content_sample));
    let findings = generate_findings(files, content_sample, best_id);

    let mut signals_hit = scored.signals_hit;
    signals_hit.truncate(MAX_SIGNALS_STORED);

    ClassificationResult {
        pattern_id: best_id,
        pattern_name: p.name.to_string(),
        target_platform: p.target_platform.to_string(),
        confidence: round2(confidence),
        scores: scored
            .scores
            .into_iter()
            .map(|(k, v)| (k, round2(v)))
            .collect(),
        signals_hit,
        risk_score: round1(risk),
        complexity,
        findings,
    }
}

/// Heuristic risk score clamped to 1.0 - 10.0.
fn calc_risk(files: &[String], content: &str, pattern_id: PatternId) -> f64 {
    let mut risk: f64 = 4.0;
    match pattern_id {
        PatternId::P3 => risk += 2.0, // DB migrations are risky
        PatternId::P4 => risk += 1.5, // PCF->GKE needs manifest work
        PatternId::P5 => risk += 1.5, // Messaging flows are complex
        _ => {}
    }
    if SECRET_RE.is_match(content) {
        risk += 0.5;
    }
    if LEGACY_RE.is_match(content) {
        risk += 0.5;
    }
    if files.iter().any(|f| f.ends_with(".sql")) {
        risk += 0.5;
    }
    risk.clamp(1.0, 10.0)
}

/// Line count of the sampled content; an empty sample is one line.
fn loc_estimate(content_sample: &str) -> usize {
    content_sample.split('\n').count()
}

fn complexity_from_loc(loc: usize) -> Complexity {
    if loc < 500 {
        Complexity::Low
    } else if loc > 5000 {
        Complexity::High
    } else {
        Complexity::Medium
    }
}

/// Fixed ordered checklist of rule-based observations, capped at 10.
fn generate_findings(files: &[String], content: &str, pattern_id: PatternId) -> Vec<String> {
    let mut findings = Vec::new();

    if TODO_RE.is_match(content) {
        findings.push("Code contains TODO/FIXME markers".to_string());
    }
    if LOCALHOST_RE.is_match(content) {
        findings.push("Hardcoded localhost references detected - update for GCP".to_string());
    }
    if AZURE_HOST_RE.is_match(content) {
        findings.push(
            "Azure-specific hostnames detected - must be replaced with GCP endpoints".to_string(),
        );
    }
    if AZURE_CONN_RE.is_match(content) {
        findings.push(
            "Azure connection strings present - update to Cloud SQL / GCP credentials".to_string(),
        );
    }
    if ITSM_RE.is_match(content) {
        findings.push("ServiceNow references present - configure integration".to_string());
    }
    if JENKINS_RE.is_match(content) {
        findings.push("Jenkins pipeline detected - will be updated for GCP deploy".to_string());
    }
    if !files.iter().any(|f| f.ends_with(".tf")) {
        findings.push("No Terraform files found - will be generated by migration engine".to_string());
    }
    if !files
        .iter()
        .any(|f| f.contains(".github") || f.contains("github/workflows"))
    {
        findings.push("No GitHub Actions found - CI/CD pipeline will be generated".to_string());
    }
    if pattern_id == PatternId::P4 && !files.iter().any(|f| f.to_lowercase().contains("dockerfile"))
    {
        findings.push(
            "PCF app without Dockerfile - Dockerfile will be generated for GKE".to_string(),
        );
    }
    if pattern_id == PatternId::P3 && MSSQL_RE.is_match(content) {
        findings.push(
            "MSSQL/Azure SQL detected - DMS heterogeneous migration required".to_string(),
        );
    }

    findings.truncate(MAX_FINDINGS);
    findings
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
