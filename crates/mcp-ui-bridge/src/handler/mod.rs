//! The interactive handler: binds a single sandboxed frame to the host,
//! validating and dispatching every message that crosses the boundary.
//!
//! Rust has no `window`, no real `postMessage`, and no `iframe` element, so
//! [`FrameChannel`] stands in for "a postMessage-style channel bound to one
//! sandboxed frame." [`ChannelFrame`] is an in-process implementation
//! backed by a pair of `tokio::mpsc` channels, used by this crate's own
//! tests and by any host that doesn't need a real browser. A browser host
//! (out of scope per the crate's purpose) implements [`FrameChannel`]
//! against real `postMessage` traffic.

mod dispatcher;
mod error;
mod executor;
mod frame;
mod iframe_runtime;

#[cfg(test)]
mod tests;

pub use dispatcher::{Callbacks, InteractiveHandler};
pub use error::HandlerError;
pub use executor::ToolExecutor;
pub use frame::{channel_pair, ChannelFrame, FrameChannel, FrameHandle, FrameId, FrameMessage};
pub use iframe_runtime::IframeRuntime;

/// Default per-request timeout enforced by [`IframeRuntime::execute_tool`],
/// matching the spec's "default 30 s."
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
