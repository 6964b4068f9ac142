//! [`Tool`]: a server-registered executable.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use super::InputSchema;

/// Result type for a tool's own `execute`.
///
/// Distinct from [`super::ServerError`] — a tool reports its own failures
/// as plain strings, which [`super::McpServer::execute_tool`] wraps into
/// the spec's structured `{ success: false, error }` shape.
pub type ToolResult = Result<Value, String>;

/// The channel a streaming tool emits intermediate chunks on ahead of its
/// final [`ToolResult`]. Only read by transports that carry `stream`
/// frames (see [`super::McpServer::execute_tool_with_sink`]) — a tool
/// that writes to the sink under a transport without that concept simply
/// has its chunks ignored by [`Tool::execute`]'s default, non-streaming
/// dispatch.
pub type StreamSink = mpsc::Sender<Value>;

/// A server-registered executable, dispatched by name from a tool-call
/// action.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, unique per server.
    fn name(&self) -> &str;

    /// Human-readable description, surfaced in tool listings.
    fn description(&self) -> &str;

    /// The schema `arguments` are validated against before `execute` runs.
    fn input_schema(&self) -> &InputSchema;

    /// Run the tool against already-validated `arguments`.
    async fn execute(&self, arguments: &Value) -> ToolResult;

    /// Whether this tool reports progress through [`Tool::execute_streaming`]
    /// rather than resolving in one shot.
    fn is_streaming(&self) -> bool {
        false
    }

    /// Run a streaming tool, sending each intermediate chunk on `sink`
    /// before resolving with the final result. The default just forwards
    /// to [`Tool::execute`] and never touches `sink`.
    async fn execute_streaming(&self, arguments: &Value, sink: &StreamSink) -> ToolResult {
        let _ = sink;
        self.execute(arguments).await
    }
}
