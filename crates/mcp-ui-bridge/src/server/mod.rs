//! The MCP server core: a registry of tools and a store of published
//! resources, reachable by whatever wire transport sits in
//! [`crate::transport`].

mod error;
mod mcp_server;
mod registry;
mod resource;
mod schema;
mod tool;
mod tools;
mod types;

#[cfg(test)]
mod tests;

pub use error::ServerError;
pub use mcp_server::{ExecuteToolData, ExecuteToolOutcome, McpServer, ToolMetadata};
pub use registry::ToolRegistry;
pub use resource::{MimeKind, PreferredFrameSize, ResourceMeta, ResourceStore, UIResource};
pub use schema::{InputSchema, PropertySchema, SchemaKind};
pub use tool::{StreamSink, Tool, ToolResult};
pub use tools::ProgressTool;
pub use types::ServerConfig;
