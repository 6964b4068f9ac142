//! HTTP transport: individual POST endpoints per §6's method table, plus a
//! `/ws` upgrade that carries the same JSON-RPC envelope (and `stream`
//! frames) over one connection.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use rand::RngCore;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::server::{McpServer, ServerError};

use super::error::TransportError;
use super::rpc::{dispatch, JsonRpcRequest, JsonRpcResponse};

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Port to listen on.
    pub port: u16,
    /// Bearer token required on every request.
    pub api_key: String,
}

impl HttpConfig {
    /// Build a config with a freshly generated API key.
    #[must_use]
    pub fn new(port: u16) -> Self {
        Self {
            port,
            api_key: generate_api_key(),
        }
    }

    /// Build a config with a caller-supplied API key.
    #[must_use]
    pub fn with_api_key(port: u16, api_key: impl Into<String>) -> Self {
        Self {
            port,
            api_key: api_key.into(),
        }
    }
}

fn generate_api_key() -> String {
    let mut key = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut key);
    hex::encode(key)
}

struct AppState {
    server: Arc<Mutex<McpServer>>,
    api_key: String,
}

/// HTTP transport for MCP communication: `/resources/list`,
/// `/resources/read`, `/tools/execute` as individual POST endpoints, and
/// `/ws` for a single bidirectional JSON-RPC connection.
pub struct HttpTransport {
    config: HttpConfig,
    server: Arc<Mutex<McpServer>>,
}

impl HttpTransport {
    /// Wrap `server` for HTTP dispatch under `config`.
    #[must_use]
    pub fn new(server: McpServer, config: HttpConfig) -> Self {
        Self {
            config,
            server: Arc::new(Mutex::new(server)),
        }
    }

    /// The bearer token clients must present.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Bind and serve until the process is signaled to stop.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::BindFailed`] if the listener can't bind,
    /// or [`TransportError::Io`] if serving fails.
    pub async fn run(&self) -> super::Result<()> {
        let state = Arc::new(AppState {
            server: Arc::clone(&self.server),
            api_key: self.config.api_key.clone(),
        });

        let app = Router::new()
            .route("/resources/list", post(handle_resources_list))
            .route("/resources/read", post(handle_resources_read))
            .route("/tools/list", post(handle_tools_list))
            .route("/tools/execute", post(handle_tools_execute))
            .route("/ws", axum::routing::get(handle_ws_upgrade))
            .with_state(state);

        let addr = format!("0.0.0.0:{}", self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::BindFailed(e.to_string()))?;

        tracing::info!(port = self.config.port, "http transport listening");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::Io(std::io::Error::other(e.to_string())))?;

        Ok(())
    }
}

fn validate_auth(headers: &HeaderMap, expected_key: &str) -> Result<(), (StatusCode, &'static str)> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or((StatusCode::UNAUTHORIZED, "Authentication required"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or((StatusCode::UNAUTHORIZED, "Invalid authorization format"))?;

    if !constant_time_eq(token.as_bytes(), expected_key.as_bytes()) {
        return Err((StatusCode::FORBIDDEN, "Invalid API key"));
    }

    Ok(())
}

/// Compares two byte strings in time independent of where they first
/// differ, so a bearer-token check can't leak the key one byte at a time
/// through response latency.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

async fn run_method(state: &AppState, method: &str, params: Value) -> Json<Value> {
    let server = state.server.lock().await;
    match dispatch(&server, method, &params).await {
        Ok(result) => Json(result),
        Err(err) => Json(serde_json::json!({ "error": { "message": err.to_string() } })),
    }
}

async fn handle_resources_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, Response> {
    validate_auth(&headers, &state.api_key).map_err(|(s, m)| (s, m).into_response())?;
    Ok(run_method(&state, "resources.list", Value::Null).await)
}

async fn handle_resources_read(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<Value>,
) -> Result<Json<Value>, Response> {
    validate_auth(&headers, &state.api_key).map_err(|(s, m)| (s, m).into_response())?;
    Ok(run_method(&state, "resources.read", params).await)
}

async fn handle_tools_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, Response> {
    validate_auth(&headers, &state.api_key).map_err(|(s, m)| (s, m).into_response())?;
    Ok(run_method(&state, "tools.list", Value::Null).await)
}

async fn handle_tools_execute(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<Value>,
) -> Result<Json<Value>, Response> {
    validate_auth(&headers, &state.api_key).map_err(|(s, m)| (s, m).into_response())?;
    Ok(run_method(&state, "tools.execute", params).await)
}

async fn handle_ws_upgrade(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, Response> {
    validate_auth(&headers, &state.api_key).map_err(|(s, m)| (s, m).into_response())?;
    Ok(ws.on_upgrade(move |socket| handle_ws(socket, state)))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    while let Some(Ok(message)) = socket.recv().await {
        let Message::Text(text) = message else {
            continue;
        };

        let request: JsonRpcRequest = match serde_json::from_str(&text) {
            Ok(req) => req,
            Err(err) => {
                let response =
                    JsonRpcResponse::error(Value::Null, -32700, format!("Parse error: {err}"));
                let _ = send_json(&mut socket, &response).await;
                continue;
            }
        };

        let request_id = request.id.clone().unwrap_or(Value::Null);
        let response = if request.method == "tools.execute" {
            match execute_tool_streaming(&mut socket, &state, &request_id, &request.params).await {
                Ok(result) => JsonRpcResponse::success(request_id.clone(), result),
                Err(err) => JsonRpcResponse::from_server_error(request_id.clone(), &err),
            }
        } else {
            let server = state.server.lock().await;
            match dispatch(&server, &request.method, &request.params).await {
                Ok(result) => JsonRpcResponse::success(request_id.clone(), result),
                Err(err) => JsonRpcResponse::from_server_error(request_id.clone(), &err),
            }
        };

        if request.id.is_some() && send_json(&mut socket, &response).await.is_err() {
            break;
        }
    }
}

#[derive(serde::Deserialize)]
struct WsExecuteToolParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Runs `tools.execute` with a sink wired straight to the socket,
/// forwarding every chunk a streaming tool emits as a `stream` frame
/// (`{ "id", "frame", "done" }`) ahead of the terminal JSON-RPC response.
/// The only method this transport streams — the HTTP POST endpoints and
/// stdio transport have no standing connection to push frames over, so a
/// streaming tool just runs to completion there, per
/// [`Tool::is_streaming`](crate::server::Tool::is_streaming).
async fn execute_tool_streaming(
    socket: &mut WebSocket,
    state: &AppState,
    request_id: &Value,
    params: &Value,
) -> Result<Value, ServerError> {
    let p: WsExecuteToolParams =
        serde_json::from_value(params.clone()).map_err(|e| ServerError::ArgumentValidation(e.to_string()))?;

    let (sink_tx, mut sink_rx) = tokio::sync::mpsc::channel(16);
    let mut streamed = false;

    let outcome = {
        let server = state.server.lock().await;
        let execute = server.execute_tool_with_sink(&p.name, p.arguments, Some(&sink_tx));
        tokio::pin!(execute);

        loop {
            tokio::select! {
                Some(chunk) = sink_rx.recv() => {
                    streamed = true;
                    let frame = serde_json::json!({ "id": request_id, "frame": chunk, "done": false });
                    let _ = send_raw(socket, &frame).await;
                }
                outcome = &mut execute => break outcome,
            }
        }
    };

    // The tool may have queued its last chunks right before resolving;
    // drain them before the trailing `done` marker so none are dropped.
    while let Ok(chunk) = sink_rx.try_recv() {
        streamed = true;
        let frame = serde_json::json!({ "id": request_id, "frame": chunk, "done": false });
        let _ = send_raw(socket, &frame).await;
    }

    if streamed {
        let done = serde_json::json!({ "id": request_id, "frame": Value::Null, "done": true });
        let _ = send_raw(socket, &done).await;
    }

    Ok(serde_json::to_value(outcome)?)
}

async fn send_json(socket: &mut WebSocket, response: &JsonRpcResponse) -> Result<(), axum::Error> {
    let text = serde_json::to_string(response).unwrap_or_else(|_| "{}".to_string());
    socket.send(Message::Text(text.into())).await
}

async fn send_raw(socket: &mut WebSocket, value: &Value) -> Result<(), axum::Error> {
    let text = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
    socket.send(Message::Text(text.into())).await
}
