//! Built-in [`Tool`] implementations that ship with the server core,
//! rather than being left for every consumer to write from scratch.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{InputSchema, PropertySchema, SchemaKind, StreamSink, Tool, ToolResult};

#[derive(Debug, Deserialize)]
struct ProgressArgs {
    #[serde(default = "default_steps")]
    steps: u32,
}

const fn default_steps() -> u32 {
    5
}

/// Reports progress over `steps` ticks, one `{ "step": n, "of": steps }`
/// chunk per tick, before resolving with `{ "completed": steps }`.
///
/// A template for tools whose work is long enough to warrant reporting
/// partial progress over the WebSocket transport's `stream` frames,
/// rather than leaving a caller staring at a single pending request.
pub struct ProgressTool {
    schema: InputSchema,
}

impl ProgressTool {
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: InputSchema {
                properties: vec![PropertySchema::typed("steps", SchemaKind::Number)],
                required: vec![],
            },
        }
    }
}

impl Default for ProgressTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ProgressTool {
    fn name(&self) -> &str {
        "progress"
    }

    fn description(&self) -> &str {
        "reports incremental progress over `steps` ticks, streaming each one"
    }

    fn input_schema(&self) -> &InputSchema {
        &self.schema
    }

    fn is_streaming(&self) -> bool {
        true
    }

    async fn execute(&self, arguments: &Value) -> ToolResult {
        let args: ProgressArgs = serde_json::from_value(arguments.clone()).map_err(|e| e.to_string())?;
        Ok(json!({ "completed": args.steps }))
    }

    async fn execute_streaming(&self, arguments: &Value, sink: &StreamSink) -> ToolResult {
        let args: ProgressArgs = serde_json::from_value(arguments.clone()).map_err(|e| e.to_string())?;
        for step in 1..=args.steps {
            let _ = sink.send(json!({ "step": step, "of": args.steps })).await;
        }
        Ok(json!({ "completed": args.steps }))
    }
}
