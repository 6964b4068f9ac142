//! MCP-UI Bridge CLI
//!
//! Command-line entry point for running an MCP-UI Bridge server over
//! stdio or HTTP/WebSocket.

use anyhow::Result;
use clap::Parser;
use mcp_ui_bridge::transport::{HttpConfig, HttpTransport, StdioTransport};
use mcp_ui_bridge::{McpServer, ServerConfig};
use tracing_subscriber::EnvFilter;

/// MCP-UI Bridge - delivers interactive UI resources from an MCP server
#[derive(Parser, Debug)]
#[command(name = "mcp-ui-bridge")]
#[command(version)]
#[command(about = "MCP server for interactive remote-DOM UI resources")]
struct Args {
    /// Server name reported to clients.
    #[arg(long, default_value = "mcp-ui-bridge")]
    name: String,

    /// Reject re-registering a tool name instead of overwriting it.
    #[arg(long, default_value_t = false)]
    strict_tool_registration: bool,

    /// Port to serve HTTP/WebSocket on (enables HTTP mode instead of stdio).
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,

    /// API key for HTTP/WebSocket authentication (auto-generated if not provided).
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = Args::parse();

    let server_config = ServerConfig {
        name: args.name,
        strict_tool_registration: args.strict_tool_registration,
        ..Default::default()
    };
    let server = McpServer::new(server_config);

    if let Some(port) = args.port {
        let http_config = match args.api_key {
            Some(key) => HttpConfig::with_api_key(port, key),
            None => {
                let config = HttpConfig::new(port);
                eprintln!("Generated API key: {}", config.api_key);
                config
            }
        };

        let transport = HttpTransport::new(server, http_config);
        transport.run().await?;
    } else {
        if args.api_key.is_some() {
            tracing::warn!("--api-key is ignored in stdio mode");
        }

        let transport = StdioTransport::new(server);
        transport.run().await?;
    }

    Ok(())
}
