//! Errors surfaced by the interactive handler and its iframe-side runtime.

use thiserror::Error;

/// Failure modes for frame-side requests and handler lifecycle operations.
#[derive(Debug, Error, Clone)]
pub enum HandlerError {
    /// A frame-side `executeTool` call did not receive a response within
    /// its timeout.
    #[error("request timed out waiting for a response")]
    Timeout,

    /// The handler was detached (or the frame channel closed) while a
    /// request was outstanding.
    #[error("request cancelled: handler detached")]
    Cancelled,

    /// An operation was attempted against a frame that is not currently
    /// attached.
    #[error("frame is not attached")]
    Detached,

    /// The underlying frame channel closed unexpectedly.
    #[error("frame channel closed")]
    ChannelClosed,

    /// The host executed the tool but reported failure.
    #[error("tool execution failed: {0}")]
    ToolFailed(String),
}
