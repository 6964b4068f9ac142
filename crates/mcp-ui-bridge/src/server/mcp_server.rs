//! [`McpServer`]: holds the tool registry and resource store, and
//! implements `executeTool`'s validation algorithm.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::{ResourceStore, ServerConfig, ServerError, StreamSink, Tool, ToolRegistry, UIResource};

/// Metadata describing a registered tool, as returned by
/// [`McpServer::available_tools`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMetadata {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema rendering of the tool's input schema.
    pub input_schema: Value,
}

/// Outcome of [`McpServer::execute_tool`], matching the spec's structured
/// `executeTool` response.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExecuteToolOutcome {
    /// Execution succeeded.
    Success {
        /// Always `true`.
        success: bool,
        /// Wrapped result payload.
        data: ExecuteToolData,
    },
    /// Execution failed at some step of the validation/dispatch algorithm.
    Failure {
        /// Always `false`.
        success: bool,
        /// Human-readable failure reason.
        error: String,
    },
}

/// Successful `executeTool` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteToolData {
    /// Name of the tool that ran.
    pub tool_name: String,
    /// The tool's own return value.
    pub result: Value,
    /// When execution completed.
    pub timestamp: chrono::DateTime<Utc>,
    /// The arguments the tool ran with.
    pub params: Value,
}

impl ExecuteToolOutcome {
    fn success(tool_name: String, result: Value, params: Value) -> Self {
        Self::Success {
            success: true,
            data: ExecuteToolData {
                tool_name,
                result,
                timestamp: Utc::now(),
                params,
            },
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            success: false,
            error: error.into(),
        }
    }

    /// Whether this outcome represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Owns a [`ToolRegistry`] and [`ResourceStore`] and dispatches tool calls
/// against them.
pub struct McpServer {
    config: ServerConfig,
    tools: ToolRegistry,
    resources: ResourceStore,
    running: bool,
}

impl McpServer {
    /// Build a server with an empty registry and resource store.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            tools: ToolRegistry::new(),
            resources: ResourceStore::new(),
            running: false,
        }
    }

    /// This server's configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Register a tool, honoring [`ServerConfig::strict_tool_registration`].
    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) -> Result<(), ServerError> {
        self.tools.register(tool, self.config.strict_tool_registration)
    }

    /// Publish a resource.
    pub fn add_resource(&mut self, resource: UIResource) -> Result<(), ServerError> {
        self.resources.add_resource(resource)
    }

    /// All published resources.
    #[must_use]
    pub fn list_resources(&self) -> Vec<&UIResource> {
        self.resources.list_resources()
    }

    /// Look up a resource by `uri`.
    pub fn get_resource(&self, uri: &str) -> Result<&UIResource, ServerError> {
        self.resources.get_resource(uri)
    }

    /// Number of published resources.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.resource_count()
    }

    /// Metadata for every registered tool.
    #[must_use]
    pub fn available_tools(&self) -> Vec<ToolMetadata> {
        self.tools
            .list()
            .into_iter()
            .map(|tool| ToolMetadata {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema().to_json_schema(),
            })
            .collect()
    }

    /// Run the spec's five-step `executeTool` algorithm: look up the tool,
    /// validate `arguments` against its schema, dispatch, and wrap the
    /// outcome. Never returns an `Err` — every failure mode is reported as
    /// an [`ExecuteToolOutcome::Failure`].
    pub async fn execute_tool(&self, name: &str, arguments: Value) -> ExecuteToolOutcome {
        self.execute_tool_with_sink(name, arguments, None).await
    }

    /// Same algorithm as [`Self::execute_tool`], but hands a streaming
    /// tool a `sink` to report intermediate chunks on as it runs, instead
    /// of only after it resolves. `sink` is ignored for any tool whose
    /// [`Tool::is_streaming`] is `false`.
    ///
    /// Used by the WebSocket transport, the only transport with a
    /// standing connection to forward those chunks over as `stream`
    /// frames; every other caller goes through [`Self::execute_tool`].
    pub async fn execute_tool_with_sink(
        &self,
        name: &str,
        arguments: Value,
        sink: Option<&StreamSink>,
    ) -> ExecuteToolOutcome {
        let Some(tool) = self.tools.get(name) else {
            return ExecuteToolOutcome::failure(format!("Tool not found: {name}"));
        };

        if let Err(err) = tool.input_schema().validate(&arguments) {
            return ExecuteToolOutcome::failure(err.to_string());
        }

        let result = match sink {
            Some(sink) if tool.is_streaming() => tool.execute_streaming(&arguments, sink).await,
            _ => tool.execute(&arguments).await,
        };

        match result {
            Ok(result) => ExecuteToolOutcome::success(name.to_string(), result, arguments),
            Err(message) => {
                warn!(tool = name, %message, "tool execution failed");
                ExecuteToolOutcome::failure(format!("Tool execution failed: {message}"))
            }
        }
    }

    /// Mark the server running.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidState`] if the server is already
    /// running.
    pub fn start(&mut self) -> Result<(), ServerError> {
        if self.running {
            return Err(ServerError::InvalidState("server is already running".into()));
        }
        self.running = true;
        info!(name = %self.config.name, version = %self.config.version, "mcp server started");
        Ok(())
    }

    /// Mark the server stopped.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidState`] if the server isn't running.
    pub fn stop(&mut self) -> Result<(), ServerError> {
        if !self.running {
            return Err(ServerError::InvalidState("server is not running".into()));
        }
        self.running = false;
        info!("mcp server stopped");
        Ok(())
    }

    /// Whether the server is currently running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{InputSchema, PropertySchema, SchemaKind, ToolResult};
    use async_trait::async_trait;
    use serde_json::json;

    struct Greet;

    #[async_trait]
    impl Tool for Greet {
        fn name(&self) -> &str {
            "greet"
        }
        fn description(&self) -> &str {
            "greets someone by name"
        }
        fn input_schema(&self) -> &InputSchema {
            static SCHEMA: std::sync::OnceLock<InputSchema> = std::sync::OnceLock::new();
            SCHEMA.get_or_init(|| InputSchema {
                properties: vec![PropertySchema::typed("name", SchemaKind::String)],
                required: vec!["name".to_string()],
            })
        }
        async fn execute(&self, arguments: &Value) -> ToolResult {
            let name = arguments["name"].as_str().unwrap_or("world");
            Ok(json!(format!("hello, {name}")))
        }
    }

    struct Boom;

    #[async_trait]
    impl Tool for Boom {
        fn name(&self) -> &str {
            "boom"
        }
        fn description(&self) -> &str {
            "always fails"
        }
        fn input_schema(&self) -> &InputSchema {
            static SCHEMA: std::sync::OnceLock<InputSchema> = std::sync::OnceLock::new();
            SCHEMA.get_or_init(InputSchema::new)
        }
        async fn execute(&self, _arguments: &Value) -> ToolResult {
            Err("kaboom".to_string())
        }
    }

    fn server() -> McpServer {
        let mut server = McpServer::new(ServerConfig::default());
        server.register_tool(Arc::new(Greet)).unwrap();
        server.register_tool(Arc::new(Boom)).unwrap();
        server
    }

    #[tokio::test]
    async fn successful_execution_wraps_result() {
        let outcome = server()
            .execute_tool("greet", json!({ "name": "Ada" }))
            .await;
        match outcome {
            ExecuteToolOutcome::Success { data, .. } => {
                assert_eq!(data.tool_name, "greet");
                assert_eq!(data.result, json!("hello, Ada"));
            }
            ExecuteToolOutcome::Failure { error, .. } => panic!("expected success, got {error}"),
        }
    }

    #[tokio::test]
    async fn unknown_tool_reports_not_found() {
        let outcome = server().execute_tool("missing", json!({})).await;
        assert!(!outcome.is_success());
        let ExecuteToolOutcome::Failure { error, .. } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(error, "Tool not found: missing");
    }

    #[tokio::test]
    async fn missing_required_argument_is_rejected_before_dispatch() {
        let outcome = server().execute_tool("greet", json!({})).await;
        let ExecuteToolOutcome::Failure { error, .. } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(error, "Missing required argument: name");
    }

    #[tokio::test]
    async fn handler_error_is_wrapped_as_execution_failed() {
        let outcome = server().execute_tool("boom", json!({})).await;
        let ExecuteToolOutcome::Failure { error, .. } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(error, "Tool execution failed: kaboom");
    }

    #[test]
    fn start_and_stop_are_idempotent_failures() {
        let mut server = server();
        server.start().unwrap();
        assert!(server.start().is_err());
        server.stop().unwrap();
        assert!(server.stop().is_err());
    }
}
