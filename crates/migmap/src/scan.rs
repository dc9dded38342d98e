//! Scan workflow: sample repositories, classify, persist.

use crate::source::RepoSource;
use crate::store::{CodeChunk, Store};
use migmap_assess_schema::{Application, PatternId, ScanRun, ScanStatus, ScanSummary};
use migmap_common::{Result, ScanFailure, Timestamp};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Tree paths considered per repository.
const MAX_TREE_PATHS: usize = 1500;
/// Files actually sampled per repository.
const MAX_SAMPLED_FILES: usize = 40;
/// Bytes sampled per file.
const MAX_FILE_BYTES: usize = 4000;
/// File paths persisted on the application record.
const MAX_STORED_FILES: usize = 300;
/// Embedded chunks persisted per application.
const MAX_CHUNKS: usize = 50;
/// Bytes persisted per chunk.
const MAX_CHUNK_BYTES: usize = 2000;

const INTERESTING_SUFFIXES: &[&str] = &[
    ".py", ".js", ".ts", ".java", ".tf", ".yml", ".yaml", ".json", ".md", "Jenkinsfile",
];

/// Execute a scan run to its terminal state.
///
/// Any error is diagnosed into the failure taxonomy and recorded on the
/// run; this function only fails if the store itself does.
pub async fn run_scan<S: RepoSource>(store: &Store, source: &S, run_id: &str) -> Result<()> {
    let mut run = store.get_run(run_id)?;
    match scan_repos(store, source, &mut run).await {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(run_id = %run.id, error = %e, "scan failed");
            fail_run(store, &mut run, ScanFailure::diagnose(&e.to_string()))
        }
    }
}

/// Record a terminal failure on a run.
pub fn fail_run(store: &Store, run: &mut ScanRun, failure: ScanFailure) -> Result<()> {
    run.status = ScanStatus::Failed;
    run.completed_at = Some(Timestamp::now());
    run.summary = ScanSummary {
        stage: "Scan failed".to_string(),
        progress: 100,
        failure: Some(failure),
        ..Default::default()
    };
    store.update_run(run)
}

async fn scan_repos<S: RepoSource>(store: &Store, source: &S, run: &mut ScanRun) -> Result<()> {
    let instructions = store.instructions()?;
    checkpoint(store, run, "Initializing scan", 5)?;

    let repos = run.repos.clone();
    let total = repos.len().max(1);
    let mut total_loc: u64 = 0;
    let mut app_count = 0usize;

    for (idx, full_name) in repos.iter().enumerate() {
        let seq = idx + 1;
        let pct_base = ((idx * 90) / total).max(8) as u8;
        checkpoint(store, run, &format!("Analyzing {full_name}"), pct_base)?;

        let (app, chunks) = analyze_repo(source, full_name, seq, &run.id, &instructions).await?;
        total_loc += app.loc;
        app_count += 1;

        store.upsert_application(&app)?;
        store.replace_chunks(&app.id, chunks)?;
        info!(app_id = %app.id, pattern = %app.pattern_id, "analyzed repository");

        let pct_done = ((seq * 90) / total).max(10) as u8;
        checkpoint(
            store,
            run,
            &format!("Processed {seq}/{total} repositories"),
            pct_done,
        )?;
    }

    run.status = ScanStatus::Complete;
    run.completed_at = Some(Timestamp::now());
    run.summary = ScanSummary {
        stage: "Scan complete".to_string(),
        progress: 100,
        repo_count: Some(repos.len()),
        app_count: Some(app_count),
        total_loc: Some(total_loc),
        failure: None,
    };
    store.update_run(run)
}

fn checkpoint(store: &Store, run: &mut ScanRun, stage: &str, progress: u8) -> Result<()> {
    run.status = ScanStatus::Running;
    run.summary.stage = stage.to_string();
    run.summary.progress = progress;
    store.update_run(run)
}

async fn analyze_repo<S: RepoSource>(
    source: &S,
    full_name: &str,
    seq: usize,
    run_id: &str,
    instructions: &BTreeMap<PatternId, String>,
) -> Result<(Application, Vec<CodeChunk>)> {
    let meta = source.repo_meta(full_name).await?;
    let mut files = source.list_paths(full_name, &meta.default_branch).await?;
    files.truncate(MAX_TREE_PATHS);

    let interesting: Vec<String> = files
        .iter()
        .filter(|p| INTERESTING_SUFFIXES.iter().any(|s| p.ends_with(s)))
        .take(MAX_SAMPLED_FILES)
        .cloned()
        .collect();

    let mut sampled_texts = Vec::new();
    for path in &interesting {
        // Individual file fetches may fail (submodules, size limits);
        // the sample just gets smaller.
        match source.fetch_file(full_name, path).await {
            Ok(text) => sampled_texts.push(truncate_utf8(&text, MAX_FILE_BYTES).to_string()),
            Err(e) => warn!(%path, error = %e, "skipping unreadable file"),
        }
    }
    if sampled_texts.is_empty() {
        let readme = source.readme(full_name).await?;
        sampled_texts.push(truncate_utf8(&readme, MAX_FILE_BYTES).to_string());
    }

    let content_sample = sampled_texts.join("\n\n");
    let result = migmap_engine::assess_repository(&files, &content_sample, instructions);

    let loc: u64 = sampled_texts.iter().map(|t| t.lines().count() as u64).sum();
    let blob = format!("{}\n{}", files.join("\n"), content_sample).to_lowercase();
    let db_types = detect_db_types(&blob);
    let app_id = format!("{}-APP-{seq:03}", run_prefix(run_id));

    let mut findings: Vec<Value> = result
        .findings
        .iter()
        .map(|f| Value::String(f.clone()))
        .collect();
    findings.push(serde_json::json!({
        "type": "scan_details",
        "signals_hit": result.signals_hit,
        "scores": result.scores,
        "confidence": result.confidence,
    }));

    let chunks = sampled_texts
        .iter()
        .take(MAX_CHUNKS)
        .enumerate()
        .map(|(i, text)| {
            let chunk_text = truncate_utf8(text, MAX_CHUNK_BYTES).to_string();
            CodeChunk {
                id: format!("{app_id}-chunk-{i:03}"),
                app_id: app_id.clone(),
                file_path: interesting
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("chunk_{i}")),
                chunk_index: i,
                embedding: migmap_engine::embeddings::embed_text(&chunk_text),
                chunk_text,
                created_at: Timestamp::now(),
            }
        })
        .collect();

    let name = full_name
        .rsplit('/')
        .next()
        .unwrap_or(full_name)
        .to_string();
    let app = Application {
        id: app_id,
        scan_run_id: run_id.to_string(),
        name,
        repo_full_name: full_name.to_string(),
        language: meta.language.unwrap_or_else(|| "unknown".to_string()),
        framework: detect_framework(&files),
        loc,
        complexity: result.complexity,
        risk_score: result.risk_score,
        pattern_id: result.pattern_id,
        pattern_name: result.pattern_name,
        target_platform: result.target_platform,
        has_dockerfile: files.iter().any(|f| f.to_lowercase().contains("dockerfile")),
        has_terraform: files.iter().any(|f| f.ends_with(".tf")),
        has_jenkinsfile: files.iter().any(|f| f.to_lowercase().contains("jenkinsfile")),
        has_github_actions: files
            .iter()
            .any(|f| f.to_lowercase().contains(".github/workflows")),
        has_pcf: files.iter().any(|f| f.to_lowercase().contains("manifest.yml")),
        has_db: !db_types.is_empty(),
        has_messaging: ["service bus", "event hub", "queue", "topic", "pub/sub", "pubsub"]
            .iter()
            .any(|k| blob.contains(k)),
        db_types,
        dependencies: detect_dependency_managers(&files),
        files: files.into_iter().take(MAX_STORED_FILES).collect(),
        findings,
        created_at: Timestamp::now(),
    };

    Ok((app, chunks))
}

fn run_prefix(run_id: &str) -> &str {
    run_id.get(..8).unwrap_or(run_id)
}

fn detect_framework(files: &[String]) -> String {
    let lower = files.join("\n").to_lowercase();
    if lower.contains("pom.xml") || lower.contains("build.gradle") {
        "spring"
    } else if lower.contains("package.json") {
        "node"
    } else if lower.contains("requirements.txt") || lower.contains(".py") {
        "python"
    } else if lower.contains(".csproj") {
        ".net"
    } else {
        "unknown"
    }
    .to_string()
}

fn detect_dependency_managers(files: &[String]) -> Vec<String> {
    let mut deps = Vec::new();
    let has = |needle: &str| files.iter().any(|f| f.contains(needle));
    if has("package.json") {
        deps.push("npm".to_string());
    }
    if has("requirements.txt") {
        deps.push("pip".to_string());
    }
    if has("pom.xml") {
        deps.push("maven".to_string());
    }
    if has("build.gradle") {
        deps.push("gradle".to_string());
    }
    deps
}

fn detect_db_types(blob: &str) -> Vec<String> {
    let mut types = Vec::new();
    if blob.contains("postgres") {
        types.push("postgres".to_string());
    }
    if blob.contains("mysql") {
        types.push("mysql".to_string());
    }
    if blob.contains("mssql") || blob.contains("sqlserver") {
        types.push("mssql".to_string());
    }
    types
}

fn truncate_utf8(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
