//! Common error types for migmap.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Common error type for migmap operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Another scan is already running: {run_id}")]
    ScanInProgress { run_id: String },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Repository source error: {0}")]
    RepoSource(String),

    #[error("GitHub API error: status {status} - {message}")]
    GitHub { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Plan error: {0}")]
    Plan(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias using common Error.
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Other(e.to_string())
    }
}

/// Stable error codes for terminal scan failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanErrorCode {
    NotConnected,
    RepoConflict,
    RateLimit,
    AuthFailed,
    RepoNotFound,
    ScanFailed,
}

impl std::fmt::Display for ScanErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScanErrorCode::NotConnected => "NOT_CONNECTED",
            ScanErrorCode::RepoConflict => "REPO_CONFLICT",
            ScanErrorCode::RateLimit => "RATE_LIMIT",
            ScanErrorCode::AuthFailed => "AUTH_FAILED",
            ScanErrorCode::RepoNotFound => "REPO_NOT_FOUND",
            ScanErrorCode::ScanFailed => "SCAN_FAILED",
        };
        write!(f, "{s}")
    }
}

/// Diagnosis of a terminal scan failure.
///
/// The raw error text is preserved for diagnostics but the user-facing
/// message is always `failure_reason` + `remediation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanFailure {
    pub code: ScanErrorCode,
    pub failure_reason: String,
    pub remediation: String,
    pub raw_error: String,
}

impl ScanFailure {
    /// Scan refused before start because no credential is available.
    pub fn not_connected() -> Self {
        Self {
            code: ScanErrorCode::NotConnected,
            failure_reason: "No repository credential is available for scan execution.".to_string(),
            remediation: "Connect a repository token first, then restart the scan.".to_string(),
            raw_error: "credential missing".to_string(),
        }
    }

    /// Classify a raw error message into the scan failure taxonomy.
    pub fn diagnose(raw: &str) -> Self {
        let raw = if raw.is_empty() { "Unknown scan error" } else { raw };
        let lowered = raw.to_lowercase();

        if lowered.contains("409") && lowered.contains("conflict") {
            return Self {
                code: ScanErrorCode::RepoConflict,
                failure_reason:
                    "One or more selected repositories cannot be scanned (commonly empty repositories without commits)."
                        .to_string(),
                remediation:
                    "Remove empty repositories from the selection or create an initial commit, then rerun."
                        .to_string(),
                raw_error: raw.to_string(),
            };
        }
        if lowered.contains("403") && lowered.contains("rate limit") {
            return Self {
                code: ScanErrorCode::RateLimit,
                failure_reason: "Repository API rate limit exceeded for the current token.".to_string(),
                remediation: "Wait for the rate limit to reset or use a token with higher quota, then rerun the scan."
                    .to_string(),
                raw_error: raw.to_string(),
            };
        }
        if lowered.contains("401") || lowered.contains("unauthorized") {
            return Self {
                code: ScanErrorCode::AuthFailed,
                failure_reason: "Repository authentication failed while scanning.".to_string(),
                remediation: "Reconnect with a valid token that has repository read permissions.".to_string(),
                raw_error: raw.to_string(),
            };
        }
        if lowered.contains("404") || lowered.contains("not found") {
            return Self {
                code: ScanErrorCode::RepoNotFound,
                failure_reason: "One or more selected repositories were not found or are inaccessible.".to_string(),
                remediation: "Verify repository names and token access permissions, then rerun the scan.".to_string(),
                raw_error: raw.to_string(),
            };
        }
        Self {
            code: ScanErrorCode::ScanFailed,
            failure_reason: "Unexpected failure occurred during scan execution.".to_string(),
            remediation: "Check the selected repositories and connectivity, then retry the scan.".to_string(),
            raw_error: raw.to_string(),
        }
    }
}
