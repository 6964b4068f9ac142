//! # MCP-UI Bridge
//!
//! This crate provides the runtime that lets an MCP (Model Context Protocol)
//! server deliver interactive UI resources to a client host, renders those
//! resources inside sandboxed frames, and routes user actions from the
//! sandbox back through an MCP client to invoke server-side tools.
//!
//! ## Overview
//!
//! The crate is organized as five cooperating components, matching the
//! direction data flows across the trust boundary:
//!
//! - [`action`]: the postMessage-style action protocol — message shapes,
//!   origin whitelist, parameter sanitization.
//! - [`handler`]: the interactive handler that binds a sandboxed frame to
//!   a tool executor, validating and dispatching actions.
//! - [`remote_dom`]: serialization, reconciliation, and rendering of
//!   remote-DOM component trees.
//! - [`client`]: a durable MCP client session over WebSocket or HTTP.
//! - [`server`]: the MCP server core — tool registry, resource store,
//!   argument validation, dispatch.
//! - [`transport`]: stdio and HTTP/WebSocket carriers for the server side
//!   of the wire protocol.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use mcp_ui_bridge::{McpServer, ServerConfig};
//! use mcp_ui_bridge::transport::StdioTransport;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mcp_ui_bridge::transport::TransportError> {
//!     let server = McpServer::new(ServerConfig::default());
//!     let transport = StdioTransport::new(server);
//!     transport.run().await?;
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod client;
pub mod handler;
pub mod remote_dom;
pub mod server;
pub mod transport;

pub use server::{McpServer, ServerConfig};
