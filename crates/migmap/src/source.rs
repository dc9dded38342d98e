//! Repository content sources: GitHub API and local directories.

use migmap_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Basic repository metadata.
#[derive(Debug, Clone)]
pub struct RepoMeta {
    pub full_name: String,
    pub default_branch: String,
    pub language: Option<String>,
}

/// Read-only access to repository trees and file contents.
#[allow(async_fn_in_trait)]
pub trait RepoSource {
    async fn repo_meta(&self, full_name: &str) -> Result<RepoMeta>;
    /// Blob paths of the repository tree, in tree order.
    async fn list_paths(&self, full_name: &str, branch: &str) -> Result<Vec<String>>;
    async fn fetch_file(&self, full_name: &str, path: &str) -> Result<String>;
    /// README text, empty string when the repository has none.
    async fn readme(&self, full_name: &str) -> Result<String>;
}

/// Split `owner/repo` coordinates.
pub fn parse_full_name(full_name: &str) -> Result<(&str, &str)> {
    match full_name.split_once('/') {
        Some((owner, repo)) if !owner.trim().is_empty() && !repo.trim().is_empty() => {
            Ok((owner.trim(), repo.trim()))
        }
        _ => Err(Error::RepoSource(format!(
            "repository must be in owner/repo format: {full_name}"
        ))),
    }
}

// --- GitHub ---

const GITHUB_API: &str = "https://api.github.com";
const USER_AGENT: &str = "migmap";

/// GitHub REST API source. Uses the raw media type for file content so
/// no base64 decoding is needed.
pub struct GithubSource {
    client: reqwest::Client,
    token: String,
    api_base: String,
}

impl GithubSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            api_base: GITHUB_API.to_string(),
        }
    }

    /// Override the API base URL (test servers).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    async fn get(&self, path: &str, accept: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.api_base, path);
        debug!(%url, "github request");
        let resp = self
            .client
            .get(&url)
            .header("Accept", accept)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::RepoSource(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::GitHub {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        let resp = self.get(path, "application/vnd.github+json").await?;
        resp.json()
            .await
            .map_err(|e| Error::RepoSource(e.to_string()))
    }
}

impl RepoSource for GithubSource {
    async fn repo_meta(&self, full_name: &str) -> Result<RepoMeta> {
        let (owner, repo) = parse_full_name(full_name)?;
        let meta = self.get_json(&format!("/repos/{owner}/{repo}")).await?;
        Ok(RepoMeta {
            full_name: full_name.to_string(),
            default_branch: meta["default_branch"]
                .as_str()
                .unwrap_or("main")
                .to_string(),
            language: meta["language"].as_str().map(str::to_string),
        })
    }

    async fn list_paths(&self, full_name: &str, branch: &str) -> Result<Vec<String>> {
        let (owner, repo) = parse_full_name(full_name)?;
        let tree = self
            .get_json(&format!("/repos/{owner}/{repo}/git/trees/{branch}?recursive=1"))
            .await?;
        let entries = tree["tree"].as_array().cloned().unwrap_or_default();
        Ok(entries
            .iter()
            .filter(|e| e["type"].as_str() == Some("blob"))
            .filter_map(|e| e["path"].as_str().map(str::to_string))
            .collect())
    }

    async fn fetch_file(&self, full_name: &str, path: &str) -> Result<String> {
        let (owner, repo) = parse_full_name(full_name)?;
        let resp = self
            .get(
                &format!("/repos/{owner}/{repo}/contents/{path}"),
                "application/vnd.github.raw",
            )
            .await?;
        resp.text()
            .await
            .map_err(|e| Error::RepoSource(e.to_string()))
    }

    async fn readme(&self, full_name: &str) -> Result<String> {
        let (owner, repo) = parse_full_name(full_name)?;
        match self
            .get(
                &format!("/repos/{owner}/{repo}/readme"),
                "application/vnd.github.raw",
            )
            .await
        {
            Ok(resp) => resp
                .text()
                .await
                .map_err(|e| Error::RepoSource(e.to_string())),
            Err(Error::GitHub { status: 404, .. }) => Ok(String::new()),
            Err(e) => Err(e),
        }
    }
}

// --- local directory ---

const SKIP_DIRS: &[&str] = &[".git", "node_modules", "target", ".venv", "__pycache__"];

/// Local filesystem source; the repository coordinate is a directory
/// path relative to the source root (or `.` for the root itself).
pub struct LocalDirSource {
    root: PathBuf,
}

impl LocalDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn repo_dir(&self, full_name: &str) -> PathBuf {
        if full_name == "." {
            self.root.clone()
        } else {
            self.root.join(full_name)
        }
    }

    fn walk(dir: &Path, base: &Path, out: &mut Vec<String>) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
        entries.sort_by_key(|e| e.file_name());
        for entry in entries {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if path.is_dir() {
                if !SKIP_DIRS.contains(&name.as_str()) {
                    Self::walk(&path, base, out)?;
                }
            } else if let Ok(rel) = path.strip_prefix(base) {
                out.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
        Ok(())
    }
}

impl RepoSource for LocalDirSource {
    async fn repo_meta(&self, full_name: &str) -> Result<RepoMeta> {
        let dir = self.repo_dir(full_name);
        if !dir.is_dir() {
            return Err(Error::RepoSource(format!(
                "directory not found: {}",
                dir.display()
            )));
        }
        Ok(RepoMeta {
            full_name: full_name.to_string(),
            default_branch: "main".to_string(),
            language: None,
        })
    }

    async fn list_paths(&self, full_name: &str, _branch: &str) -> Result<Vec<String>> {
        let dir = self.repo_dir(full_name);
        let mut out = Vec::new();
        Self::walk(&dir, &dir, &mut out)?;
        Ok(out)
    }

    async fn fetch_file(&self, full_name: &str, path: &str) -> Result<String> {
        let bytes = std::fs::read(self.repo_dir(full_name).join(path))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn readme(&self, full_name: &str) -> Result<String> {
        let dir = self.repo_dir(full_name);
        for name in ["README.md", "README", "readme.md"] {
            let path = dir.join(name);
            if path.is_file() {
                let bytes = std::fs::read(path)?;
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }
        }
        Ok(String::new())
    }
}
