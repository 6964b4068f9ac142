//! Wire transports that carry the JSON-RPC protocol from §6 between a
//! remote MCP client and an [`crate::server::McpServer`].

mod error;
mod http;
mod rpc;
mod stdio;

#[cfg(test)]
mod tests;

pub use error::TransportError;
pub use http::{HttpConfig, HttpTransport};
pub use rpc::{dispatch, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use stdio::StdioTransport;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
