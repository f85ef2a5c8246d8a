//! Global configuration cache
//!
//! Settings arrive as raw JSON from the editor client, either as
//! `initializationOptions` or through `workspace/didChangeConfiguration`.
//! The manager keeps the latest parsed snapshot; per-document scoping via
//! `workspace/configuration` requests is not supported, the retention
//! policy is workspace-wide.

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

use crate::config::{HistoryConfig, LspConfig};
use crate::convert::history::RetentionPolicy;

/// JSON key the client may nest our settings under.
const SETTINGS_SECTION: &str = "converterLsp";

#[derive(Debug, Default)]
pub struct SettingsManager {
    config: RwLock<LspConfig>,
}

impl SettingsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached configuration from a raw settings blob and
    /// returns the resulting snapshot.
    ///
    /// Unknown fields are ignored and missing fields fall back to defaults.
    /// An unparsable blob or an invalid retention pair does not poison the
    /// server: both are logged and replaced with defaults.
    pub async fn replace(&self, value: Value) -> LspConfig {
        let section = match value.get(SETTINGS_SECTION) {
            Some(section) => section.clone(),
            None => value,
        };

        let mut config = serde_json::from_value::<LspConfig>(section)
            .inspect_err(|e| warn!("invalid settings, falling back to defaults: {e}"))
            .unwrap_or_default();

        if config.history.remain_history_files_num > config.history.max_history_files_num {
            warn!(
                max = config.history.max_history_files_num,
                remain = config.history.remain_history_files_num,
                "remainHistoryFilesNum exceeds maxHistoryFilesNum, using default history settings"
            );
            config.history = HistoryConfig::default();
        }

        *self.config.write().await = config.clone();
        config
    }

    pub async fn current(&self) -> LspConfig {
        self.config.read().await.clone()
    }

    /// The retention policy from the current snapshot. The pair is
    /// validated on `replace`, so construction cannot fail here.
    pub async fn retention_policy(&self) -> RetentionPolicy {
        let history = self.config.read().await.history.clone();
        RetentionPolicy::new(
            history.max_history_files_num,
            history.remain_history_files_num,
        )
        .unwrap_or_default()
    }
}
