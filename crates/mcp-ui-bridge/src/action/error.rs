//! Error taxonomy for the action protocol.
//!
//! Validation failures are never exceptions at the point of validation —
//! [`super::is_valid_action`] and [`super::validate_origin`] return `bool`.
//! `ActionError` exists only so callers that *do* want to log or surface a
//! reason (rather than a silent drop) have a typed value to log.

use thiserror::Error;

/// Reasons a message never reached dispatch.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The message failed structural validation.
    #[error("invalid action message: {0}")]
    InvalidMessage(String),

    /// The message's origin was not on the whitelist.
    #[error("origin rejected: {0}")]
    OriginRejected(String),
}
