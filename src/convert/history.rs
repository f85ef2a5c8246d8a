//! Result history retention
//!
//! [`HistoryStore`] keeps the population of result files for one logical
//! name bounded. After each conversion the store snapshots the matching
//! artifacts under its output root and, once the count exceeds the policy
//! threshold, deletes everything beyond the most recent `remain_files`.
//!
//! No lock spans the snapshot-then-delete sequence: an artifact created
//! concurrently between the two steps is invisible to the pass and never
//! deleted, so the retained count may transiently exceed `remain_files`
//! until the next pass. Eviction is housekeeping and must never block the
//! conversion path, so that window is accepted.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use tokio::fs;
use tracing::debug;

use crate::config::{DEFAULT_MAX_HISTORY_FILES, DEFAULT_REMAIN_HISTORY_FILES};
use crate::convert::artifact::{Artifact, is_artifact_of};
use crate::convert::error::{
    BatchEvictionError, DeletionError, HistoryError, InvalidPolicyError,
};

/// The `(max, remain)` pair governing when and how much eviction occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    max_files: usize,
    remain_files: usize,
}

impl RetentionPolicy {
    pub fn new(max_files: usize, remain_files: usize) -> Result<Self, InvalidPolicyError> {
        if remain_files > max_files {
            return Err(InvalidPolicyError {
                max_files,
                remain_files,
            });
        }
        Ok(Self {
            max_files,
            remain_files,
        })
    }

    /// Eviction trigger threshold.
    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Most-recent artifacts retained once eviction runs.
    pub fn remain_files(&self) -> usize {
        self.remain_files
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_HISTORY_FILES,
            remain_files: DEFAULT_REMAIN_HISTORY_FILES,
        }
    }
}

/// Retention manager for one output directory tree.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    root: PathBuf,
}

impl HistoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerates every artifact for `logical_name` under the store root,
    /// most recent first.
    ///
    /// The whole subtree is searched; matching is scoped to this root only.
    /// Only regular files are considered. The returned list is a single
    /// final snapshot sorted by filename in descending string order (ties
    /// broken by path, also descending, for determinism). No matches is an
    /// empty list, not an error; a failed traversal is
    /// [`HistoryError::Enumeration`].
    pub async fn get_history(&self, logical_name: &str) -> Result<Vec<Artifact>, HistoryError> {
        let mut pending = vec![self.root.clone()];
        let mut artifacts = Vec::new();

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await.map_err(|source| {
                HistoryError::Enumeration {
                    path: dir.clone(),
                    source,
                }
            })?;

            loop {
                let entry = entries.next_entry().await.map_err(|source| {
                    HistoryError::Enumeration {
                        path: dir.clone(),
                        source,
                    }
                })?;
                let Some(entry) = entry else {
                    break;
                };

                let file_type = entry.file_type().await.map_err(|source| {
                    HistoryError::Enumeration {
                        path: entry.path(),
                        source,
                    }
                })?;

                if file_type.is_dir() {
                    pending.push(entry.path());
                    continue;
                }
                if !file_type.is_file() {
                    continue;
                }

                let name = entry.file_name();
                let Some(name) = name.to_str() else {
                    continue;
                };

                if is_artifact_of(name, logical_name) {
                    artifacts.push(Artifact::new(entry.path(), name.to_string()));
                }
            }
        }

        artifacts.sort_by(|a, b| {
            b.file_name()
                .cmp(a.file_name())
                .then_with(|| b.path().cmp(a.path()))
        });

        Ok(artifacts)
    }

    /// Runs one eviction pass for `logical_name` and returns the number of
    /// artifacts deleted.
    ///
    /// When the snapshot holds at most `policy.max_files()` artifacts this
    /// is a pure read: no filesystem mutation, `Ok(0)`. Otherwise every
    /// artifact beyond the `policy.remain_files()` most recent is deleted
    /// as one concurrent batch of unlink futures. All deletions are awaited
    /// before returning; individual failures are collected into a
    /// [`BatchEvictionError`] while the successful deletions stand (no
    /// rollback, no retry). Deletions are independent and commute, so no
    /// ordering between them is guaranteed or needed.
    pub async fn evict(
        &self,
        logical_name: &str,
        policy: RetentionPolicy,
    ) -> Result<usize, HistoryError> {
        let snapshot = self.get_history(logical_name).await?;

        if snapshot.len() <= policy.max_files() {
            return Ok(0);
        }

        let candidates = &snapshot[policy.remain_files()..];
        debug!(
            logical_name,
            total = snapshot.len(),
            evicting = candidates.len(),
            "history exceeds threshold"
        );

        let deletions = candidates.iter().map(|artifact| async move {
            fs::remove_file(artifact.path())
                .await
                .map_err(|source| DeletionError {
                    path: artifact.path().to_path_buf(),
                    source,
                })
        });

        let attempted = candidates.len();
        let errors: Vec<DeletionError> = join_all(deletions)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if errors.is_empty() {
            Ok(attempted)
        } else {
            Err(BatchEvictionError { attempted, errors }.into())
        }
    }
}
