//! Line-delimited JSON-RPC over stdin/stdout.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::server::McpServer;

use super::rpc::{dispatch, JsonRpcRequest, JsonRpcResponse};

/// Reads JSON-RPC requests from stdin, one per line, and writes responses
/// to stdout. The default transport for CLI-embedded MCP clients.
pub struct StdioTransport {
    server: Arc<Mutex<McpServer>>,
}

impl StdioTransport {
    /// Wrap `server` for stdio dispatch.
    #[must_use]
    pub fn new(server: McpServer) -> Self {
        Self {
            server: Arc::new(Mutex::new(server)),
        }
    }

    /// Run until stdin closes.
    ///
    /// # Errors
    ///
    /// Returns a [`super::TransportError`] if reading from stdin or
    /// writing to stdout fails.
    pub async fn run(&self) -> super::Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin);
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                tracing::info!("stdin closed, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
                Ok(req) => req,
                Err(err) => {
                    let response =
                        JsonRpcResponse::error(serde_json::Value::Null, -32700, format!("Parse error: {err}"));
                    write_response(&mut stdout, &response).await?;
                    continue;
                }
            };

            let request_id = request.id.clone().unwrap_or(serde_json::Value::Null);
            let server = self.server.lock().await;
            let response = match dispatch(&server, &request.method, &request.params).await {
                Ok(result) => JsonRpcResponse::success(request_id, result),
                Err(err) => JsonRpcResponse::from_server_error(request_id, &err),
            };
            drop(server);

            if request.id.is_some() {
                write_response(&mut stdout, &response).await?;
            }
        }

        Ok(())
    }
}

async fn write_response(
    stdout: &mut tokio::io::Stdout,
    response: &JsonRpcResponse,
) -> super::Result<()> {
    let json = serde_json::to_string(response)?;
    stdout.write_all(json.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
