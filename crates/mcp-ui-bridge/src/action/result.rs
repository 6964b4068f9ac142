//! `ActionResult`: the value a [`crate::handler::ToolExecutor`] resolves
//! with, and what eventually becomes a [`super::ResponseMessage`].

use serde_json::Value;

/// Outcome of executing a tool action.
#[derive(Debug, Clone)]
pub struct ActionResult {
    /// Whether execution succeeded.
    pub success: bool,
    /// Result payload, present on success.
    pub data: Option<Value>,
    /// Error message, present on failure.
    pub error: Option<String>,
}

/// Build a successful [`ActionResult`] carrying `data`.
#[must_use]
pub fn success(data: Value) -> ActionResult {
    ActionResult {
        success: true,
        data: Some(data),
        error: None,
    }
}

/// Build a failed [`ActionResult`] carrying `message`.
#[must_use]
pub fn error(message: impl Into<String>) -> ActionResult {
    ActionResult {
        success: false,
        data: None,
        error: Some(message.into()),
    }
}
