//! Data directory removal
//!
//! Every target gets exactly one outcome. A failing path does not stop the
//! remaining ones unless fail-fast is requested.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;

use crate::error::{CleanerError, CleanerResult};
use shared::{data_dirs, tool_debug, tool_info, tool_warn};

/// What happened to one target path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum CleanupOutcome {
    Removed,
    /// Dry run: the directory exists and would have been removed
    WouldRemove,
    /// Nothing to do; the path is missing or not a directory
    Absent,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupEntry {
    pub path: PathBuf,
    pub outcome: CleanupOutcome,
}

/// Per-path results, in target order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub entries: Vec<CleanupEntry>,
}

impl CleanupReport {
    pub fn outcome_of(&self, path: &Path) -> Option<&CleanupOutcome> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| &entry.outcome)
    }

    pub fn removed(&self) -> usize {
        self.count(|outcome| matches!(outcome, CleanupOutcome::Removed))
    }

    pub fn absent(&self) -> usize {
        self.count(|outcome| matches!(outcome, CleanupOutcome::Absent))
    }

    pub fn failures(&self) -> Vec<&CleanupEntry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, CleanupOutcome::Failed(_)))
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failures().is_empty()
    }

    /// Turn collected failures into an error for the exit status
    pub fn into_result(self) -> CleanerResult<Self> {
        let failed = self.failures().len();
        if failed == 0 {
            Ok(self)
        } else {
            Err(CleanerError::Incomplete {
                failed,
                total: self.entries.len(),
            })
        }
    }

    /// Pretty-printed JSON for `--json`
    pub fn to_json(&self) -> CleanerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn count(&self, predicate: impl Fn(&CleanupOutcome) -> bool) -> usize {
        self.entries.iter().filter(|entry| predicate(&entry.outcome)).count()
    }
}

/// Removes a fixed list of data directories
#[derive(Debug, Clone)]
pub struct DataCleaner {
    targets: Vec<PathBuf>,
    dry_run: bool,
    fail_fast: bool,
}

impl DataCleaner {
    /// Cleaner over an explicit target list
    pub fn new(targets: Vec<PathBuf>) -> Self {
        Self {
            targets,
            dry_run: false,
            fail_fast: false,
        }
    }

    /// Every directory a cluster of `node_count` nodes may have written to,
    /// optionally resolved against `base_dir`
    pub fn for_cluster(node_count: usize, base_dir: Option<&Path>) -> Self {
        let targets = data_dirs(node_count)
            .into_iter()
            .map(|dir| match base_dir {
                Some(base) => base.join(dir),
                None => dir,
            })
            .collect();
        Self::new(targets)
    }

    /// Report what would be removed without touching anything (fluent API)
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop at the first failure and return it (fluent API)
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Add additional paths to clean up
    pub fn add_paths(&mut self, paths: &[PathBuf]) {
        self.targets.extend_from_slice(paths);
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    /// Process every target in order
    pub async fn clean(&self) -> CleanerResult<CleanupReport> {
        let mut report = CleanupReport::default();

        for path in &self.targets {
            let outcome = match self.clean_path(path).await {
                Ok(outcome) => outcome,
                Err(source) if self.fail_fast => {
                    return Err(CleanerError::Remove {
                        path: path.clone(),
                        source,
                    });
                }
                Err(e) => {
                    tool_warn!("⚠️ Failed to remove {}: {}", path.display(), e);
                    CleanupOutcome::Failed(e.to_string())
                }
            };

            report.entries.push(CleanupEntry {
                path: path.clone(),
                outcome,
            });
        }

        Ok(report)
    }

    async fn clean_path(&self, path: &Path) -> io::Result<CleanupOutcome> {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tool_info!("⏭️ Skipping {} (does not exist)", path.display());
                return Ok(CleanupOutcome::Absent);
            }
            Err(e) => return Err(e),
        };

        if !metadata.is_dir() {
            tool_info!("⏭️ Skipping {} (not a directory)", path.display());
            return Ok(CleanupOutcome::Absent);
        }

        if self.dry_run {
            tool_info!("📋 Would remove {}", path.display());
            return Ok(CleanupOutcome::WouldRemove);
        }

        tool_info!("🧹 Removing {} ...", path.display());
        fs::remove_dir_all(path).await?;
        tool_debug!("Removed {}", path.display());

        Ok(CleanupOutcome::Removed)
    }
}
