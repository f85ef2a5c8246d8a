//! Conversion engine seam
//!
//! The engine is an external collaborator: it takes a data file and
//! produces one result file. Its transformation rules (templates, output
//! schema) are its own concern; this crate only relies on the returned
//! result path.

#[cfg(test)]
use mockall::automock;

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tokio::process::Command;
use tracing::debug;

use crate::config::{RESULT_FILE_EXTENSION, VERSION_STAMP_FORMAT};
use crate::convert::error::EngineError;

/// Descriptor returned by a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// The freshly produced artifact.
    pub result_file: PathBuf,
}

/// Trait for running one conversion
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ConversionEngine: Send + Sync {
    /// Converts `data_file` and returns the produced result descriptor
    ///
    /// # Returns
    /// * `Ok(ConversionResult)` - Descriptor holding the produced file path
    /// * `Err(EngineError)` - If the conversion fails
    async fn process(&self, data_file: &Path) -> Result<ConversionResult, EngineError>;
}

/// Engine backed by an external converter executable.
///
/// Invoked as `<command> <dataFile> <templateFolder> <resultFile>`, where
/// the result path is computed here: the data file's stem plus a
/// fixed-width version stamp plus the result extension, directly under the
/// configured result folder.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    command: String,
    template_folder: PathBuf,
    result_folder: PathBuf,
}

impl ProcessEngine {
    pub fn new(
        command: impl Into<String>,
        template_folder: impl Into<PathBuf>,
        result_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            command: command.into(),
            template_folder: template_folder.into(),
            result_folder: result_folder.into(),
        }
    }

    fn result_path_for(&self, data_file: &Path) -> Result<PathBuf, EngineError> {
        let stem = data_file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| {
                EngineError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("data file has no usable name: {}", data_file.display()),
                ))
            })?;

        let stamp = Utc::now().format(VERSION_STAMP_FORMAT);
        Ok(self
            .result_folder
            .join(format!("{stem}.{stamp}.{RESULT_FILE_EXTENSION}")))
    }
}

#[async_trait::async_trait]
impl ConversionEngine for ProcessEngine {
    async fn process(&self, data_file: &Path) -> Result<ConversionResult, EngineError> {
        let result_file = self.result_path_for(data_file)?;

        tokio::fs::create_dir_all(&self.result_folder).await?;

        debug!(
            command = %self.command,
            data_file = %data_file.display(),
            result_file = %result_file.display(),
            "invoking conversion engine"
        );

        let output = Command::new(&self.command)
            .arg(data_file)
            .arg(&self.template_folder)
            .arg(&result_file)
            .output()
            .await?;

        if !output.status.success() {
            return Err(EngineError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        if !tokio::fs::try_exists(&result_file).await.unwrap_or(false) {
            return Err(EngineError::MissingResult { path: result_file });
        }

        Ok(ConversionResult { result_file })
    }
}
