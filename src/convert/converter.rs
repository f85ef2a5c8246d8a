//! Convert-and-retain facade
//!
//! [`Converter`] glues the engine to the retention manager: run one
//! conversion, then bound the history the new result belongs to.
//! Conversion failures are fatal; eviction failures are housekeeping and
//! are downgraded to a logged report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::convert::artifact::{Artifact, logical_name};
use crate::convert::engine::{ConversionEngine, ConversionResult};
use crate::convert::error::{ConversionError, HistoryError};
use crate::convert::history::{HistoryStore, RetentionPolicy};

pub struct Converter {
    engine: Arc<dyn ConversionEngine>,
    result_folder: PathBuf,
    policy: RetentionPolicy,
}

impl Converter {
    pub fn new(
        engine: Arc<dyn ConversionEngine>,
        result_folder: impl Into<PathBuf>,
        policy: RetentionPolicy,
    ) -> Self {
        Self {
            engine,
            result_folder: result_folder.into(),
            policy,
        }
    }

    /// Converts `data_file` and bounds the history of the produced result.
    ///
    /// The engine call is the conversion itself and its failure propagates.
    /// The eviction pass that follows is awaited before returning, but its
    /// failure never turns a successful conversion into a failed one: a
    /// partially failed batch leaves the surplus on disk for the next pass
    /// and is only reported here via `warn!`.
    pub async fn convert(&self, data_file: &Path) -> Result<ConversionResult, ConversionError> {
        let result = self.engine.process(data_file).await?;

        self.retain(&result.result_file).await;

        Ok(result)
    }

    /// Returns the history of the logical result `result_identifier` belongs
    /// to, most recent first, searched under the configured result folder.
    pub async fn get_history(
        &self,
        result_identifier: &Path,
    ) -> Result<Vec<Artifact>, HistoryError> {
        let Some(name) = logical_name(result_identifier) else {
            return Ok(Vec::new());
        };

        HistoryStore::new(&self.result_folder)
            .get_history(&name)
            .await
    }

    /// One eviction pass rooted at the produced file's own directory: the
    /// siblings of the new result are exactly the history it belongs to.
    async fn retain(&self, result_file: &Path) {
        let Some(name) = logical_name(result_file) else {
            warn!(
                result_file = %result_file.display(),
                "engine produced a result with no usable name, skipping eviction"
            );
            return;
        };
        let Some(dir) = result_file.parent() else {
            warn!(
                result_file = %result_file.display(),
                "engine produced a result with no parent directory, skipping eviction"
            );
            return;
        };

        match HistoryStore::new(dir).evict(&name, self.policy).await {
            Ok(0) => {}
            Ok(deleted) => debug!(logical_name = %name, deleted, "evicted history files"),
            Err(e) => warn!(logical_name = %name, "history eviction failed: {e}"),
        }
    }
}
