use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::server::{InputSchema, McpServer, ServerConfig, Tool, ToolResult, UIResource};
use crate::transport::dispatch;

struct Echo;

#[async_trait]
impl Tool for Echo {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "echoes its arguments"
    }
    fn input_schema(&self) -> &InputSchema {
        static SCHEMA: std::sync::OnceLock<InputSchema> = std::sync::OnceLock::new();
        SCHEMA.get_or_init(InputSchema::new)
    }
    async fn execute(&self, arguments: &Value) -> ToolResult {
        Ok(arguments.clone())
    }
}

fn server() -> McpServer {
    let mut server = McpServer::new(ServerConfig::default());
    server.register_tool(Arc::new(Echo)).unwrap();
    server
        .add_resource(UIResource::new("ui://a", "text/html", "<p>a</p>", None).unwrap())
        .unwrap();
    server
}

#[tokio::test]
async fn resources_list_reports_published_resources() {
    let result = dispatch(&server(), "resources.list", &Value::Null).await.unwrap();
    assert_eq!(result["resources"][0]["uri"], json!("ui://a"));
}

#[tokio::test]
async fn resources_read_returns_full_payload() {
    let result = dispatch(&server(), "resources.read", &json!({ "uri": "ui://a" }))
        .await
        .unwrap();
    assert_eq!(result["text"], json!("<p>a</p>"));
}

#[tokio::test]
async fn resources_read_unknown_uri_is_an_error() {
    let err = dispatch(&server(), "resources.read", &json!({ "uri": "ui://missing" }))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), -32601);
}

#[tokio::test]
async fn tools_list_reports_registered_tools() {
    let result = dispatch(&server(), "tools.list", &Value::Null).await.unwrap();
    assert_eq!(result["tools"][0]["name"], json!("echo"));
}

#[tokio::test]
async fn tools_execute_dispatches_and_wraps_result() {
    let result = dispatch(
        &server(),
        "tools.execute",
        &json!({ "name": "echo", "arguments": { "x": 1 } }),
    )
    .await
    .unwrap();
    assert_eq!(result["success"], json!(true));
    assert_eq!(result["data"]["result"], json!({ "x": 1 }));
}

#[tokio::test]
async fn unknown_method_is_rejected() {
    let err = dispatch(&server(), "not.a.method", &Value::Null).await.unwrap_err();
    assert_eq!(err.error_code(), -32601);
}
