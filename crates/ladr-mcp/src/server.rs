//! MCP server and stdio transport
//!
//! One JSON-RPC message per line on stdin, one response per line on stdout.
//! Each request runs on its own task so a long proof search never holds up
//! other requests; responses funnel through a single writer.

use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use ladr_backends::LogicEngine;

use crate::error::{ErrorCode, JsonRpcError, McpError};
use crate::protocol::{
    IncomingMessage, InitializeResult, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    ToolCallParams, ToolsListResult, JSONRPC_VERSION,
};
use crate::tools::ToolRegistry;

/// MCP server over a tool registry
pub struct McpServer {
    tools: ToolRegistry,
}

impl McpServer {
    pub fn new(engine: Arc<LogicEngine>) -> Self {
        Self::with_registry(ToolRegistry::new(engine))
    }

    pub fn with_registry(tools: ToolRegistry) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Handle one request and build its response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        match self.dispatch(request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                debug!(error = %e, "Request failed");
                JsonRpcResponse::error(Some(id), e.into())
            }
        }
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> Result<serde_json::Value, McpError> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(McpError::InvalidRequest(format!(
                "unsupported jsonrpc version {}",
                request.jsonrpc
            )));
        }

        match request.method.as_str() {
            "initialize" => Ok(serde_json::to_value(InitializeResult::default())?),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(serde_json::to_value(ToolsListResult {
                tools: self.tools.definitions(),
            })?),
            "tools/call" => {
                let params: ToolCallParams =
                    serde_json::from_value(request.params.unwrap_or_default()).map_err(|e| {
                        McpError::InvalidParams(format!("Invalid tool call: {}", e))
                    })?;
                info!(tool = %params.name, "Tool call");
                let result = self.tools.call(&params.name, params.arguments).await;
                Ok(serde_json::to_value(result)?)
            }
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    fn handle_notification(&self, notification: &JsonRpcNotification) {
        match notification.method.as_str() {
            "notifications/initialized" => info!("Client initialized"),
            other => debug!(method = other, "Ignoring notification"),
        }
    }

    /// Serve stdin/stdout until stdin closes
    pub async fn run_stdio(self: Arc<Self>) -> std::io::Result<()> {
        info!("Server running with stdio transport");
        self.run(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve line-delimited JSON-RPC from `reader` to `writer` until the
    /// reader is exhausted and every in-flight request has answered
    pub async fn run<R, W>(self: Arc<Self>, reader: R, writer: W) -> std::io::Result<()>
    where
        R: tokio::io::AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
        let writer_task = tokio::spawn(write_responses(rx, writer));

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let message = match decode_message(line) {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "Unreadable message");
                    let _ = tx.send(JsonRpcResponse::error(None, e.into()));
                    continue;
                }
            };

            match message {
                IncomingMessage::Notification(notification) => {
                    self.handle_notification(&notification);
                }
                IncomingMessage::Request(request) => {
                    let server = Arc::clone(&self);
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let id = request.id.clone();
                        // Run in a nested task so a panic still produces a reply
                        let handled =
                            tokio::spawn(async move { server.handle_request(request).await }).await;
                        let response = handled.unwrap_or_else(|e| {
                            error!(error = %e, "Request handler panicked");
                            JsonRpcResponse::error(
                                Some(id),
                                JsonRpcError::new(ErrorCode::InternalError, "Internal error"),
                            )
                        });
                        let _ = tx.send(response);
                    });
                }
            }
        }

        debug!("Input closed, waiting for in-flight requests");
        drop(tx);
        match writer_task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e)),
        }
    }
}

/// Decode one line into a request or notification.
///
/// A message that carries an `id` the protocol cannot echo back (null, a
/// fraction, an object) would otherwise pass as a notification and never
/// get a reply, so it is rejected as an invalid request.
fn decode_message(line: &str) -> Result<IncomingMessage, McpError> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| McpError::ParseError(e.to_string()))?;
    let has_id = value.get("id").is_some();
    let message: IncomingMessage = serde_json::from_value(value)
        .map_err(|e| McpError::InvalidRequest(e.to_string()))?;
    match message {
        IncomingMessage::Notification(notification) if has_id => Err(McpError::InvalidRequest(
            format!("unusable id on {} request", notification.method),
        )),
        message => Ok(message),
    }
}

async fn write_responses<W>(
    mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>,
    mut writer: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = match serde_json::to_string(&response) {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "Failed to serialize response");
                continue;
            }
        };
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
