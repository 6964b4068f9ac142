//! [`ToolExecutor`]: the bridge from a `tool` action to [`crate::client`].

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::action::{ActionResult, Primitive};

/// Executes a named tool with sanitized parameters and returns an
/// [`ActionResult`].
///
/// The Rust shape of "toolExecutor(toolName, params) -> Promise<Result>"
/// from the spec's interactive-handler contract. In production this is
/// wired to a [`crate::client::McpClient`]; tests wire it to a stub.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute `tool_name` with `params`, already sanitized to primitives.
    async fn execute(&self, tool_name: &str, params: BTreeMap<String, Primitive>) -> ActionResult;
}
