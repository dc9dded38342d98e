//! Scan run records and progress reporting.

use migmap_common::{ScanFailure, Timestamp};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Pending,
    Running,
    Complete,
    Failed,
}

impl ScanStatus {
    /// Pending and running runs block new scans.
    pub fn is_active(&self) -> bool {
        matches!(self, ScanStatus::Pending | ScanStatus::Running)
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScanStatus::Pending => "pending",
            ScanStatus::Running => "running",
            ScanStatus::Complete => "complete",
            ScanStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Progress checkpoint and outcome summary, written to durable storage
/// as the scan advances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Human-readable stage, e.g. "Analyzing acme/billing".
    pub stage: String,
    /// Discrete progress percentage, 0-100.
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_loc: Option<u64>,
    /// Terminal failure diagnosis; present only on failed runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ScanFailure>,
}

/// A scan run over a set of repositories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRun {
    pub id: String,
    pub status: ScanStatus,
    /// Repository coordinates selected for this run.
    pub repos: Vec<String>,
    pub started_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    pub summary: ScanSummary,
}

impl ScanRun {
    /// Create a new pending run.
    pub fn new(id: impl Into<String>, repos: Vec<String>) -> Self {
        Self {
            id: id.into(),
            status: ScanStatus::Pending,
            repos,
            started_at: Timestamp::now(),
            completed_at: None,
            summary: ScanSummary {
                stage: "Queued".to_string(),
                progress: 0,
                ..Default::default()
            },
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
