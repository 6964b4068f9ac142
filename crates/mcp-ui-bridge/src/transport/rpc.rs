//! JSON-RPC wire types and the method dispatch table shared by every
//! transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::server::{McpServer, ServerError};

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version, always `"2.0"`.
    pub jsonrpc: String,

    /// Request id; `None` for notifications.
    #[serde(default)]
    pub id: Option<Value>,

    /// Method name.
    pub method: String,

    /// Method parameters.
    #[serde(default)]
    pub params: Value,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version.
    pub jsonrpc: &'static str,

    /// Echoes the request id.
    pub id: Value,

    /// Result, mutually exclusive with `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error, mutually exclusive with `result`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// Error code, per the taxonomy in [`ServerError::error_code`].
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Additional error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Build a success response.
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response from raw parts.
    #[must_use]
    pub fn error(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
        }
    }

    /// Build an error response from a [`ServerError`].
    #[must_use]
    pub fn from_server_error(id: Value, err: &ServerError) -> Self {
        Self::error(id, err.error_code(), err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct ExecuteToolParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Dispatch one JSON-RPC method against `server`, shared by every
/// transport so the method table only exists in one place.
///
/// # Errors
///
/// Returns a [`ServerError`] for unknown methods, malformed params, or any
/// failure the server itself reports (e.g. an unknown resource `uri`).
pub async fn dispatch(server: &McpServer, method: &str, params: &Value) -> Result<Value, ServerError> {
    match method {
        "initialize" => Ok(serde_json::json!({
            "protocolVersion": "2024-11-05",
            "serverInfo": { "name": server.config().name, "version": server.config().version },
        })),
        "initialized" => Ok(Value::Null),
        "resources.list" => {
            let resources: Vec<Value> = server
                .list_resources()
                .into_iter()
                .map(|r| {
                    serde_json::json!({
                        "uri": r.uri(),
                        "mimeType": r.mime_type(),
                    })
                })
                .collect();
            Ok(serde_json::json!({ "resources": resources }))
        }
        "resources.read" => {
            let p: ReadResourceParams =
                serde_json::from_value(params.clone()).map_err(|e| ServerError::ArgumentValidation(e.to_string()))?;
            let resource = server.get_resource(&p.uri)?;
            Ok(serde_json::json!({
                "uri": resource.uri(),
                "mimeType": resource.mime_type(),
                "text": resource.text(),
            }))
        }
        "tools.list" => Ok(serde_json::json!({ "tools": server.available_tools() })),
        "tools.execute" => {
            let p: ExecuteToolParams =
                serde_json::from_value(params.clone()).map_err(|e| ServerError::ArgumentValidation(e.to_string()))?;
            let outcome = server.execute_tool(&p.name, p.arguments).await;
            Ok(serde_json::to_value(outcome)?)
        }
        other => Err(ServerError::MethodNotFound(other.to_string())),
    }
}
