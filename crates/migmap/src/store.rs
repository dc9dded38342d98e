//! JSON-file-backed record store.
//!
//! One file per record family under the store root. All writes go
//! through load-modify-save on whole files; the single-active-scan
//! guard lives here so every caller path gets it.

use migmap_assess_schema::{Application, PatternId, ScanRun};
use migmap_common::{Error, Result, Timestamp};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const RUNS_FILE: &str = "scan_runs.json";
const APPS_FILE: &str = "applications.json";
const INSTRUCTIONS_FILE: &str = "instructions.json";
const CHUNKS_FILE: &str = "code_chunks.json";

/// A sampled code chunk with its embedding, persisted for search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChunk {
    pub id: String,
    pub app_id: String,
    pub file_path: String,
    pub chunk_index: usize,
    pub chunk_text: String,
    pub embedding: Vec<f64>,
    pub created_at: Timestamp,
}

/// File-backed store rooted at a directory.
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open (or create) a store at the given directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path(name);
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    // --- scan runs ---

    /// Conditionally insert a new pending run.
    ///
    /// Rejected when any existing run is pending or running; this is
    /// the single-active-scan guard.
    pub fn begin_run(&self, repos: Vec<String>) -> Result<ScanRun> {
        let mut runs: Vec<ScanRun> = self.load(RUNS_FILE)?;
        if let Some(active) = runs.iter().find(|r| r.is_active()) {
            return Err(Error::ScanInProgress {
                run_id: active.id.clone(),
            });
        }
        let run = ScanRun::new(Uuid::new_v4().to_string(), repos);
        debug!(run_id = %run.id, "created scan run");
        runs.push(run.clone());
        self.save(RUNS_FILE, &runs)?;
        Ok(run)
    }

    /// Replace a run record by id.
    pub fn update_run(&self, run: &ScanRun) -> Result<()> {
        let mut runs: Vec<ScanRun> = self.load(RUNS_FILE)?;
        let slot = runs
            .iter_mut()
            .find(|r| r.id == run.id)
            .ok_or_else(|| Error::NotFound(format!("scan run {}", run.id)))?;
        *slot = run.clone();
        self.save(RUNS_FILE, &runs)
    }

    pub fn get_run(&self, run_id: &str) -> Result<ScanRun> {
        let runs: Vec<ScanRun> = self.load(RUNS_FILE)?;
        runs.into_iter()
            .find(|r| r.id == run_id)
            .ok_or_else(|| Error::NotFound(format!("scan run {run_id}")))
    }

    /// Most recently started run, if any.
    pub fn latest_run(&self) -> Result<Option<ScanRun>> {
        let runs: Vec<ScanRun> = self.load(RUNS_FILE)?;
        Ok(runs.into_iter().last())
    }

    // --- applications ---

    /// Insert or replace an application by id.
    pub fn upsert_application(&self, app: &Application) -> Result<()> {
        let mut apps: Vec<Application> = self.load(APPS_FILE)?;
        match apps.iter_mut().find(|a| a.id == app.id) {
            Some(slot) => *slot = app.clone(),
            None => apps.push(app.clone()),
        }
        self.save(APPS_FILE, &apps)
    }

    /// Applications belonging to one run, in insertion order.
    pub fn applications_for_run(&self, run_id: &str) -> Result<Vec<Application>> {
        let apps: Vec<Application> = self.load(APPS_FILE)?;
        Ok(apps.into_iter().filter(|a| a.scan_run_id == run_id).collect())
    }

    // --- pattern instructions ---

    pub fn instructions(&self) -> Result<BTreeMap<PatternId, String>> {
        self.load(INSTRUCTIONS_FILE)
    }

    pub fn set_instruction(&self, pattern_id: PatternId, text: String) -> Result<()> {
        let mut all: BTreeMap<PatternId, String> = self.load(INSTRUCTIONS_FILE)?;
        all.insert(pattern_id, text);
        self.save(INSTRUCTIONS_FILE, &all)
    }

    // --- code chunks ---

    /// Replace the stored chunks for one application.
    pub fn replace_chunks(&self, app_id: &str, chunks: Vec<CodeChunk>) -> Result<()> {
        let mut all: Vec<CodeChunk> = self.load(CHUNKS_FILE)?;
        all.retain(|c| c.app_id != app_id);
        all.extend(chunks);
        self.save(CHUNKS_FILE, &all)
    }

    pub fn all_chunks(&self) -> Result<Vec<CodeChunk>> {
        self.load(CHUNKS_FILE)
    }

    /// Store root, for diagnostics.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
