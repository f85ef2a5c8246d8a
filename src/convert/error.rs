use std::path::PathBuf;

use thiserror::Error;

/// A single failed unlink attempt within an eviction batch.
#[derive(Debug, Error)]
#[error("failed to delete {}: {source}", path.display())]
pub struct DeletionError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// One or more deletions failed within a single eviction pass. Deletions
/// that already succeeded are not rolled back; failed candidates stay on
/// disk and are reconsidered by the next pass.
#[derive(Debug, Error)]
#[error("{} of {attempted} eviction deletions failed", errors.len())]
pub struct BatchEvictionError {
    /// Size of the eviction candidate set.
    pub attempted: usize,
    pub errors: Vec<DeletionError>,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    /// The directory traversal itself failed. Distinct from an empty
    /// history: the caller could not determine what exists.
    #[error("failed to enumerate history under {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    BatchEviction(#[from] BatchEvictionError),
}

/// A retention policy with `remain` exceeding `max` was supplied.
#[derive(Debug, Error)]
#[error("remainHistoryFilesNum ({remain_files}) must not exceed maxHistoryFilesNum ({max_files})")]
pub struct InvalidPolicyError {
    pub max_files: usize,
    pub remain_files: usize,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "engine exited with {}: {stderr}",
        code.map_or_else(|| "signal".to_string(), |c| format!("code {c}"))
    )]
    Failed { code: Option<i32>, stderr: String },

    #[error("engine reported success but produced no result file at {}", path.display())]
    MissingResult { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("conversion failed: {0}")]
    Engine(#[from] EngineError),
}
