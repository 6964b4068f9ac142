//! Server configuration types.

/// MCP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name reported to clients.
    pub name: String,

    /// Server version reported to clients.
    pub version: String,

    /// If `true`, `registerTool` fails instead of overwriting a tool that
    /// is already registered under the same name.
    pub strict_tool_registration: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "mcp-ui-bridge".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            strict_tool_registration: false,
        }
    }
}
