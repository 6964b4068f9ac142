//! Server error types.

use thiserror::Error;

/// Errors that can occur during MCP server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A requested resource URI has no registered resource.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// A resource was registered under a `uri` that already exists.
    #[error("Resource already exists: {0}")]
    ResourceExists(String),

    /// A requested tool name has no registered tool.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// A JSON-RPC request named a method this server doesn't implement.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Arguments failed `InputSchema::validate`.
    #[error("{0}")]
    ArgumentValidation(String),

    /// A tool's handler returned an error.
    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),

    /// `start()` called on an already-running server, or `stop()` called on
    /// a server that isn't running.
    #[error("Invalid server state: {0}")]
    InvalidState(String),
}

impl ServerError {
    /// JSON-RPC error code for this error, per the wire protocol's error
    /// taxonomy.
    #[must_use]
    pub const fn error_code(&self) -> i32 {
        match self {
            Self::Json(_) => -32700,
            Self::ArgumentValidation(_) => -32602,
            Self::ToolNotFound(_) | Self::ResourceNotFound(_) | Self::MethodNotFound(_) => -32601,
            Self::ResourceExists(_) | Self::InvalidState(_) | Self::ToolExecutionFailed(_) => {
                -32603
            }
        }
    }
}
