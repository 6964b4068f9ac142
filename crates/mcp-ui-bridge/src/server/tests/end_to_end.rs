use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::server::{
    ExecuteToolOutcome, InputSchema, McpServer, PropertySchema, SchemaKind, ServerConfig, Tool,
    ToolResult, UIResource,
};

struct AddCount;

#[async_trait]
impl Tool for AddCount {
    fn name(&self) -> &str {
        "add_count"
    }
    fn description(&self) -> &str {
        "increments a counter by `amount`"
    }
    fn input_schema(&self) -> &InputSchema {
        static SCHEMA: std::sync::OnceLock<InputSchema> = std::sync::OnceLock::new();
        SCHEMA.get_or_init(|| InputSchema {
            properties: vec![PropertySchema::typed("amount", SchemaKind::Number)],
            required: vec!["amount".to_string()],
        })
    }
    async fn execute(&self, arguments: &Value) -> ToolResult {
        let amount = arguments["amount"].as_f64().unwrap_or(0.0);
        Ok(json!({ "total": amount + 1.0 }))
    }
}

#[tokio::test]
async fn server_serves_resources_and_executes_registered_tools() {
    let mut server = McpServer::new(ServerConfig::default());
    server.register_tool(Arc::new(AddCount)).unwrap();
    server
        .add_resource(
            UIResource::new("ui://dashboard", "text/html", "<div>dashboard</div>", None).unwrap(),
        )
        .unwrap();

    server.start().unwrap();

    assert_eq!(server.resource_count(), 1);
    let resource = server.get_resource("ui://dashboard").unwrap();
    assert_eq!(resource.text(), "<div>dashboard</div>");

    let tools = server.available_tools();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "add_count");

    let outcome = server.execute_tool("add_count", json!({ "amount": 4 })).await;
    match outcome {
        ExecuteToolOutcome::Success { data, .. } => {
            assert_eq!(data.result, json!({ "total": 5.0 }));
        }
        ExecuteToolOutcome::Failure { error, .. } => panic!("unexpected failure: {error}"),
    }

    server.stop().unwrap();
}
