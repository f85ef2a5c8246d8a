use std::path::PathBuf;
use std::sync::Arc;

use tower_lsp::jsonrpc::{Error, ErrorCode, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::info;

use crate::convert::artifact::logical_name;
use crate::convert::converter::Converter;
use crate::convert::engine::{ConversionEngine, ProcessEngine};
use crate::convert::error::ConversionError;
use crate::convert::history::HistoryStore;
use crate::lsp::settings::SettingsManager;

/// Runs one conversion and bounds the result history; the single argument
/// is the data file path, the reply is the conversion result descriptor.
pub const CONVERT_COMMAND: &str = "converter.convert";

/// Lists the history of a result identity, most recent first; the single
/// argument is a result file path (or name), the reply an array of paths.
pub const GET_HISTORY_COMMAND: &str = "converter.getHistory";

pub struct Backend {
    client: Client,
    settings: SettingsManager,
    engine: tokio::sync::RwLock<Option<Arc<dyn ConversionEngine>>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            settings: SettingsManager::new(),
            engine: tokio::sync::RwLock::new(None),
        }
    }

    /// Build a Backend with an injected engine
    pub fn build(client: Client, engine: Arc<dyn ConversionEngine>) -> Self {
        Self {
            client,
            settings: SettingsManager::new(),
            engine: tokio::sync::RwLock::new(Some(engine)),
        }
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![CONVERT_COMMAND.to_string(), GET_HISTORY_COMMAND.to_string()],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Applies a settings snapshot: a complete engine configuration replaces
    /// the current engine, an incomplete one leaves it untouched.
    async fn reconfigure(&self, raw_settings: serde_json::Value) {
        let config = self.settings.replace(raw_settings).await;

        if let Some((command, templates, results)) = config.engine.complete() {
            info!(command, "conversion engine configured");
            *self.engine.write().await =
                Some(Arc::new(ProcessEngine::new(command, templates, results)));
        }
    }

    async fn handle_convert(&self, data_file: PathBuf) -> Result<serde_json::Value> {
        let Some(engine) = self.engine.read().await.clone() else {
            return Err(server_error(
                ErrorCode::InvalidRequest,
                "conversion engine is not configured".to_string(),
            ));
        };

        let config = self.settings.current().await;
        let result_folder = config
            .engine
            .result_folder
            .unwrap_or_else(|| PathBuf::from("."));
        let policy = self.settings.retention_policy().await;
        let converter = Converter::new(engine, result_folder, policy);

        let result = converter.convert(&data_file).await.map_err(|e| {
            let ConversionError::Engine(engine_error) = &e;
            server_error(ErrorCode::InternalError, engine_error.to_string())
        })?;

        self.client
            .log_message(
                MessageType::INFO,
                format!(
                    "Converted {} -> {}",
                    data_file.display(),
                    result.result_file.display()
                ),
            )
            .await;

        serde_json::to_value(&result)
            .map_err(|e| server_error(ErrorCode::InternalError, e.to_string()))
    }

    async fn handle_get_history(&self, result_identifier: PathBuf) -> Result<serde_json::Value> {
        let config = self.settings.current().await;
        let Some(result_folder) = config.engine.result_folder else {
            return Err(server_error(
                ErrorCode::InvalidRequest,
                "resultFolder is not configured".to_string(),
            ));
        };

        let Some(name) = logical_name(&result_identifier) else {
            return Ok(serde_json::Value::from(Vec::<String>::new()));
        };

        let history = HistoryStore::new(result_folder)
            .get_history(&name)
            .await
            .map_err(|e| server_error(ErrorCode::InternalError, e.to_string()))?;

        let paths: Vec<String> = history
            .into_iter()
            .map(|artifact| artifact.path().display().to_string())
            .collect();

        Ok(serde_json::Value::from(paths))
    }
}

fn server_error(code: ErrorCode, message: String) -> Error {
    Error {
        code,
        message: message.into(),
        data: None,
    }
}

/// Extracts the single path argument every converter command takes.
fn path_argument(params: &ExecuteCommandParams) -> Result<PathBuf> {
    match params.arguments.first() {
        Some(serde_json::Value::String(path)) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Err(Error::invalid_params(format!(
            "{} expects one file path argument",
            params.command
        ))),
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        self.client
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;

        if let Some(options) = params.initialization_options {
            self.reconfigure(options).await;
        }

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "converter-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.client
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.client
            .log_message(MessageType::LOG, "Configuration changed")
            .await;

        self.reconfigure(params.settings).await;
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        match params.command.as_str() {
            CONVERT_COMMAND => {
                let data_file = path_argument(&params)?;
                self.handle_convert(data_file).await.map(Some)
            }
            GET_HISTORY_COMMAND => {
                let result_identifier = path_argument(&params)?;
                self.handle_get_history(result_identifier).await.map(Some)
            }
            other => Err(Error::invalid_params(format!("unknown command: {other}"))),
        }
    }
}
