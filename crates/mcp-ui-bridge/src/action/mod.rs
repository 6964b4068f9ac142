//! The postMessage action protocol.
//!
//! Every message that crosses the iframe boundary is one of the
//! [`ActionMessage`] variants on the way in, or a [`ResponseMessage`] on the
//! way out. This module defines those shapes, the origin whitelist
//! ([`validate_origin`]), and parameter sanitization ([`sanitize_params`]).
//! Everything here is pure and side-effect free: validators return `bool`,
//! sanitization never panics, and nothing here talks to a frame or a
//! transport directly. [`crate::handler`] is the caller that enforces these
//! rules at the boundary.

mod error;
mod message;
mod origin;
mod primitive;
mod result;
mod sanitize;
mod validate;

#[cfg(test)]
mod tests;

pub use error::ActionError;
pub use message::{ActionMessage, LinkTarget, NotifyLevel, ResponseMessage, ToolPayload};
pub use origin::validate_origin;
pub use primitive::Primitive;
pub use result::{error, success, ActionResult};
pub use sanitize::sanitize_params;
pub use validate::{
    is_intent_action, is_link_action, is_notify_action, is_prompt_action, is_tool_action,
    is_valid_action,
};
