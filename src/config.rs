use serde::Deserialize;
use std::path::PathBuf;

// =============================================================================
// Retention constants
// =============================================================================

/// Default trigger threshold: eviction runs only when the number of history
/// files for one logical result strictly exceeds this value.
pub const DEFAULT_MAX_HISTORY_FILES: usize = 10;

/// Default number of most-recent history files kept when eviction runs.
pub const DEFAULT_REMAIN_HISTORY_FILES: usize = 5;

/// Extension shared by every conversion result file.
pub const RESULT_FILE_EXTENSION: &str = "json";

/// Version stamp format embedded in result filenames (17 characters,
/// fixed-width and zero-padded so that descending string order equals
/// descending recency order).
pub const VERSION_STAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// LSP configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LspConfig {
    pub history: HistoryConfig,
    pub engine: EngineConfig,
}

/// History retention configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Eviction trigger threshold
    pub max_history_files_num: usize,
    /// Files retained per logical result once eviction runs
    pub remain_history_files_num: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history_files_num: DEFAULT_MAX_HISTORY_FILES,
            remain_history_files_num: DEFAULT_REMAIN_HISTORY_FILES,
        }
    }
}

/// External engine configuration. The engine is only constructed once all
/// three fields are present.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Executable invoked as `<command> <dataFile> <templateFolder> <resultFile>`
    pub command: Option<String>,
    pub template_folder: Option<PathBuf>,
    pub result_folder: Option<PathBuf>,
}

impl EngineConfig {
    /// Returns `(command, template_folder, result_folder)` when fully configured.
    pub fn complete(&self) -> Option<(&str, &PathBuf, &PathBuf)> {
        match (&self.command, &self.template_folder, &self.result_folder) {
            (Some(command), Some(templates), Some(results)) => {
                Some((command.as_str(), templates, results))
            }
            _ => None,
        }
    }
}

/// Returns the path to the data directory for converter-lsp.
/// Uses $XDG_DATA_HOME/converter-lsp if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/converter-lsp,
/// or ./converter-lsp if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("converter-lsp.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("converter-lsp")
}
