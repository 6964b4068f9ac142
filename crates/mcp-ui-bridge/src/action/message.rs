//! Message envelopes crossing the iframe boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Primitive;

/// Severity level carried by a `notify` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    /// Informational message.
    Info,
    /// Success confirmation.
    Success,
    /// Non-fatal warning.
    Warn,
    /// Error condition.
    Error,
}

/// Where a `link` action should open its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkTarget {
    /// Open in a new browsing context.
    #[serde(rename = "_blank")]
    Blank,
    /// Open in the current browsing context.
    #[serde(rename = "_self")]
    SelfTarget,
}

/// Payload of a `tool` action: a request to execute a named server-side
/// tool with sanitized parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPayload {
    /// Name of the tool to execute.
    pub tool_name: String,
    /// Raw parameters for the tool, not yet sanitized. [`crate::handler`]
    /// runs these through [`super::sanitize_params`] before invoking a
    /// [`crate::handler::ToolExecutor`] — `is_tool_action` deliberately
    /// doesn't check value types, so this field has to accept anything
    /// that parses as a JSON object.
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Correlation id used to match the eventual [`super::ResponseMessage`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Every legal message a sandboxed frame may post to its host.
///
/// Tagged on `type` per the wire shape in the spec's external-interfaces
/// section. Unknown variants fail to deserialize, which is exactly
/// "unknown variants are rejected by construction."
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum ActionMessage {
    /// Invoke a server-side tool.
    Tool(ToolPayload),
    /// Surface a transient notification in the host UI.
    Notify {
        /// Severity.
        level: NotifyLevel,
        /// Human-readable message text.
        message: String,
    },
    /// Ask the host to navigate somewhere.
    Link {
        /// Destination URL.
        url: String,
        /// Optional navigation target.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<LinkTarget>,
    },
    /// Ask the host to prompt the user for text input.
    Prompt {
        /// Prompt text shown to the user.
        text: String,
        /// Pre-filled default value.
        #[serde(default, skip_serializing_if = "Option::is_none", rename = "defaultValue")]
        default_value: Option<String>,
    },
    /// A free-form, application-defined signal.
    Intent {
        /// Intent name.
        intent: String,
        /// Optional structured data, primitives only.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<BTreeMap<String, Primitive>>,
    },
}

impl ActionMessage {
    /// The `requestId` the sender wants an (optional) response correlated
    /// against, if it supplied one.
    ///
    /// Only `tool` actions carry a mandatory-for-response id in the base
    /// protocol; the other variants carry one only when the sender wants
    /// an acknowledgement (see the Design Notes' fire-and-forget rule).
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Tool(p) => p.request_id.as_deref(),
            Self::Notify { .. } | Self::Link { .. } | Self::Prompt { .. } | Self::Intent { .. } => {
                None
            }
        }
    }
}

/// Message posted back from host into the sandboxed frame, resolving a
/// frame-side pending `tool` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    /// Always `"response"`; kept as a field (rather than folded into a
    /// bare struct) so the wire shape round-trips through `serde_json`
    /// exactly as documented.
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    /// Correlates with the originating [`ToolPayload::request_id`].
    pub request_id: String,
    /// Whether the tool call succeeded.
    pub success: bool,
    /// Result payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Error message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Discriminator for [`ResponseMessage`]; always `Response`, modeled as an
/// enum so the literal `"response"` string can't silently drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// The only variant.
    Response,
}

impl ResponseMessage {
    /// Build a success response.
    #[must_use]
    pub fn success(request_id: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: ResponseKind::Response,
            request_id: request_id.into(),
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Build a failure response.
    #[must_use]
    pub fn failure(request_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Response,
            request_id: request_id.into(),
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
