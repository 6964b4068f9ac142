//! Registry of tools available for dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use super::{ServerError, Tool};

/// Owns the server's registered tools, keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tool`. Last write wins unless `strict` is set, in which
    /// case re-registering an existing name fails.
    pub fn register(&mut self, tool: Arc<dyn Tool>, strict: bool) -> Result<(), ServerError> {
        if strict && self.tools.contains_key(tool.name()) {
            return Err(ServerError::InvalidState(format!(
                "tool already registered: {}",
                tool.name()
            )));
        }
        self.tools.insert(tool.name().to_string(), tool);
        Ok(())
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// All registered tools, in no particular order.
    #[must_use]
    pub fn list(&self) -> Vec<&Arc<dyn Tool>> {
        self.tools.values().collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{InputSchema, ToolResult};
    use async_trait::async_trait;
    use serde_json::Value;

    struct Echo(InputSchema);

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes its arguments"
        }
        fn input_schema(&self) -> &InputSchema {
            &self.0
        }
        async fn execute(&self, arguments: &Value) -> ToolResult {
            Ok(arguments.clone())
        }
    }

    #[test]
    fn last_write_wins_by_default() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo(InputSchema::new())), false).unwrap();
        registry.register(Arc::new(Echo(InputSchema::new())), false).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn strict_mode_rejects_duplicate_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo(InputSchema::new())), true).unwrap();
        let err = registry
            .register(Arc::new(Echo(InputSchema::new())), true)
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidState(_)));
    }

    #[test]
    fn get_and_list_reflect_registered_tools() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());
        registry.register(Arc::new(Echo(InputSchema::new())), false).unwrap();
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.list().len(), 1);
    }
}
