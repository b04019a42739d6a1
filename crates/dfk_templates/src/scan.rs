//! Tag derivation for existing Dockerfiles in a repository.
//!
//! Only `FROM` and `LABEL` instructions are read. The final stage's base image
//! and the `version` label (or `org.opencontainers.image.version`) yield one
//! tag per Dockerfile.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{DockerfileError, DockerfileResult};
use crate::tags::LATEST_TAG;

const VERSION_LABELS: [&str; 2] = ["version", "org.opencontainers.image.version"];

/// Instructions of interest extracted from a Dockerfile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DockerfileMetadata {
    /// Image of the last `FROM` instruction
    pub base_image: Option<String>,
    /// All `LABEL` pairs, later definitions win
    pub labels: BTreeMap<String, String>,
}

impl DockerfileMetadata {
    /// Parse `FROM` and `LABEL` lines.
    pub fn parse(content: &str) -> Self {
        let mut metadata = Self::default();

        for line in content.lines() {
            let line = line.trim();
            let Some((instruction, rest)) = line.split_once(char::is_whitespace) else {
                continue;
            };

            if instruction.eq_ignore_ascii_case("FROM") {
                metadata.base_image = rest
                    .split_whitespace()
                    .find(|token| !token.starts_with("--"))
                    .map(String::from);
            } else if instruction.eq_ignore_ascii_case("LABEL") {
                for token in split_quoted(rest) {
                    if let Some((key, value)) = token.split_once('=') {
                        metadata.labels.insert(key.to_string(), value.to_string());
                    }
                }
            }
        }

        metadata
    }

    pub fn version(&self) -> Option<&str> {
        VERSION_LABELS
            .iter()
            .find_map(|key| self.labels.get(*key))
            .map(String::as_str)
    }

    /// `{base image}-{version}`, with registry separators flattened to `-`.
    pub fn tags(&self) -> Vec<String> {
        let base = self.base_image.as_deref().unwrap_or("unknown");
        // Digests are not valid in tags
        let base = base.split('@').next().unwrap_or(base);
        let version = self.version().unwrap_or(LATEST_TAG);
        vec![format!("{}-{}", base.replace([':', '/'], "-"), version)]
    }
}

/// Split on whitespace, keeping double-quoted runs together and dropping the quotes.
fn split_quoted(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Per-Dockerfile tags keyed by path relative to the scan root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagReport {
    pub dockerfiles: BTreeMap<String, Vec<String>>,
}

impl TagReport {
    pub fn to_json(&self) -> DockerfileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Walks a repository for files named `Dockerfile`.
pub struct DockerfileScanner {
    root: PathBuf,
}

impl DockerfileScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn scan(&self) -> DockerfileResult<TagReport> {
        if !self.root.is_dir() {
            return Err(DockerfileError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("scan root {:?} is not a directory", self.root),
            )));
        }

        let mut report = TagReport::default();

        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e))
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() || entry.file_name() != "Dockerfile" {
                continue;
            }

            let path = entry.path();
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable Dockerfile {:?}: {}", path, e);
                    continue;
                }
            };

            let tags = DockerfileMetadata::parse(&content).tags();
            debug!("{:?} -> {}", path, tags.join(", "));
            report.dockerfiles.insert(self.relative(path), tags);
        }

        info!("Derived tags for {} Dockerfiles", report.dockerfiles.len());
        Ok(report)
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.') || name == "target" || name == "node_modules")
            .unwrap_or(false)
}
