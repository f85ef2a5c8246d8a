//! LSP server initialization and lifecycle

use tower_lsp::{LspService, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::data_dir;
use crate::lsp::backend::Backend;

/// Runs the language server over stdio until the client disconnects.
///
/// stdout carries the LSP protocol, so logs go to a file under the data
/// directory instead. Logging failures are not fatal: the server still
/// runs if the log file cannot be set up.
pub async fn run_server() -> anyhow::Result<()> {
    let _guard = init_logging();

    info!("starting converter-lsp {}", env!("CARGO_PKG_VERSION"));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}

fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let data_dir = data_dir();
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("failed to create data directory {}: {e}", data_dir.display());
        return None;
    }

    let file_appender = tracing_appender::rolling::never(&data_dir, "converter-lsp.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}
