//! Structural validators for incoming postMessage payloads.
//!
//! These operate on raw [`serde_json::Value`] rather than a pre-parsed
//! [`ActionMessage`], because the whole point of validation is to decide
//! whether arbitrary, possibly-hostile input is even shaped like a message
//! before anything tries to deserialize it into a typed value.

use serde_json::Value;

use super::{ActionMessage, Primitive};

fn payload(msg: &Value) -> Option<&Value> {
    msg.get("payload")
}

fn field_is_string(payload: &Value, key: &str) -> bool {
    payload.get(key).is_some_and(Value::is_string)
}

/// Does `msg` look like a valid `tool` action?
///
/// Requires `type: "tool"` and a payload with a string `toolName`. `params`
/// and `requestId` are optional at this layer — sanitization happens later,
/// in [`super::sanitize_params`].
#[must_use]
pub fn is_tool_action(msg: &Value) -> bool {
    msg.get("type").and_then(Value::as_str) == Some("tool")
        && payload(msg).is_some_and(|p| field_is_string(p, "toolName"))
}

/// Does `msg` look like a valid `notify` action?
#[must_use]
pub fn is_notify_action(msg: &Value) -> bool {
    msg.get("type").and_then(Value::as_str) == Some("notify")
        && payload(msg).is_some_and(|p| {
            let level_ok = p
                .get("level")
                .and_then(Value::as_str)
                .is_some_and(|l| matches!(l, "info" | "success" | "warn" | "error"));
            level_ok && field_is_string(p, "message")
        })
}

/// Does `msg` look like a valid `link` action?
#[must_use]
pub fn is_link_action(msg: &Value) -> bool {
    msg.get("type").and_then(Value::as_str) == Some("link")
        && payload(msg).is_some_and(|p| {
            field_is_string(p, "url")
                && p.get("target").is_none_or(|t| {
                    t.as_str().is_some_and(|s| matches!(s, "_blank" | "_self"))
                })
        })
}

/// Does `msg` look like a valid `prompt` action?
#[must_use]
pub fn is_prompt_action(msg: &Value) -> bool {
    msg.get("type").and_then(Value::as_str) == Some("prompt")
        && payload(msg).is_some_and(|p| field_is_string(p, "text"))
}

/// Does `msg` look like a valid `intent` action?
#[must_use]
pub fn is_intent_action(msg: &Value) -> bool {
    msg.get("type").and_then(Value::as_str) == Some("intent")
        && payload(msg).is_some_and(|p| {
            let intent_ok = field_is_string(p, "intent");
            let data_ok = p.get("data").is_none_or(|d| {
                d.as_object()
                    .is_some_and(|m| m.values().all(|v| Primitive::from_value(v).is_some()))
            });
            intent_ok && data_ok
        })
}

/// Does `msg` satisfy at least one of the five variant predicates?
///
/// This is the single entry point [`crate::handler`] calls before doing
/// anything else with an incoming message. A `true` result guarantees
/// `serde_json::from_value::<ActionMessage>(msg.clone())` will succeed.
#[must_use]
pub fn is_valid_action(msg: &Value) -> bool {
    if !msg.is_object() {
        return false;
    }
    is_tool_action(msg)
        || is_notify_action(msg)
        || is_link_action(msg)
        || is_prompt_action(msg)
        || is_intent_action(msg)
}

/// Validate and parse `msg` in one step, returning `None` on any failure.
///
/// Used by [`crate::handler::InteractiveHandler`] so that validation and
/// parsing can never disagree with each other.
#[must_use]
pub fn parse_valid_action(msg: &Value) -> Option<ActionMessage> {
    if !is_valid_action(msg) {
        return None;
    }
    serde_json::from_value(msg.clone()).ok()
}
