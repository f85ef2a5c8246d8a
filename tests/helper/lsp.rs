//! LSP request/notification test utilities

use futures::StreamExt;
use tokio::sync::mpsc;
use tower_lsp::ClientSocket;
use tower_lsp::jsonrpc::{Request, Response};
use tower_lsp::lsp_types::*;

/// Create an LSP initialize request with initialization options
pub fn create_initialize_request(id: i64, options: Option<serde_json::Value>) -> Request {
    let params = InitializeParams {
        initialization_options: options,
        ..Default::default()
    };
    Request::build("initialize")
        .id(id)
        .params(serde_json::to_value(params).unwrap())
        .finish()
}

/// Create an LSP initialized notification
pub fn create_initialized_notification() -> Request {
    Request::build("initialized")
        .params(serde_json::to_value(InitializedParams {}).unwrap())
        .finish()
}

/// Create a workspace/executeCommand request
pub fn create_execute_command_request(id: i64, command: &str, argument: &str) -> Request {
    Request::build("workspace/executeCommand")
        .id(id)
        .params(
            serde_json::to_value(ExecuteCommandParams {
                command: command.to_string(),
                arguments: vec![serde_json::Value::String(argument.to_string())],
                work_done_progress_params: Default::default(),
            })
            .unwrap(),
        )
        .finish()
}

/// Create a workspace/didChangeConfiguration notification
pub fn create_did_change_configuration_notification(settings: serde_json::Value) -> Request {
    Request::build("workspace/didChangeConfiguration")
        .params(serde_json::to_value(DidChangeConfigurationParams { settings }).unwrap())
        .finish()
}

/// Extract the JSON-RPC result payload from a response
pub fn response_result(response: Response) -> serde_json::Value {
    let value = serde_json::to_value(response).unwrap();
    assert!(
        value.get("error").is_none(),
        "request failed: {}",
        value["error"]
    );
    value["result"].clone()
}

/// Extract the JSON-RPC error payload from a response
#[allow(dead_code)]
pub fn response_error(response: Response) -> serde_json::Value {
    let value = serde_json::to_value(response).unwrap();
    value
        .get("error")
        .cloned()
        .expect("expected the request to fail")
}

/// Drain client-bound messages in background so the service never blocks
pub fn spawn_notification_collector(mut socket: ClientSocket) -> mpsc::Receiver<Request> {
    let (tx, rx) = mpsc::channel(100);

    tokio::spawn(async move {
        while let Some(notification) = socket.next().await {
            if tx.send(notification).await.is_err() {
                break;
            }
        }
    });

    rx
}
