//! [`FrameChannel`]: the Rust stand-in for "a postMessage channel bound to
//! one sandboxed frame."

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use super::HandlerError;

/// Identity of a sandboxed frame, standing in for `iframe.contentWindow`.
///
/// Two messages with different `source` ids could arrive on a host that
/// multiplexes several frames over one bus; [`super::InteractiveHandler`]
/// drops anything whose source doesn't match the frame it was attached to,
/// mirroring the spec's `event.source !== iframe.contentWindow` check.
pub type FrameId = u64;

/// A message posted from a sandboxed frame toward its host.
#[derive(Debug, Clone)]
pub struct FrameMessage {
    /// Identity of the frame that posted this message.
    pub source: FrameId,
    /// The message's origin, as the host would read `event.origin`.
    pub origin: String,
    /// The raw, not-yet-validated payload.
    pub data: Value,
}

/// A channel bound to a single sandboxed frame.
///
/// Implementations receive messages the frame posts toward the host and
/// can post messages back into the frame. The host never posts into a
/// frame it has detached from — see [`super::InteractiveHandler::detach`].
#[async_trait]
pub trait FrameChannel: Send {
    /// Identity of the bound frame.
    fn id(&self) -> FrameId;

    /// Wait for the next message posted by the frame, or `None` once the
    /// frame side has gone away.
    async fn recv(&mut self) -> Option<FrameMessage>;

    /// Post `data` into the frame.
    fn post_to_frame(&self, data: Value) -> Result<(), HandlerError>;
}

/// An in-process [`FrameChannel`] backed by `tokio::mpsc` channels,
/// pairing with a [`FrameHandle`] on the simulated frame side.
pub struct ChannelFrame {
    id: FrameId,
    to_frame: mpsc::UnboundedSender<Value>,
    from_frame: mpsc::UnboundedReceiver<FrameMessage>,
}

/// The frame-side half of an in-process channel pair, held by whatever
/// code is standing in for the sandboxed frame (typically
/// [`super::IframeRuntime`] in this crate's own tests).
pub struct FrameHandle {
    id: FrameId,
    origin: String,
    to_host: mpsc::UnboundedSender<FrameMessage>,
    from_host: mpsc::UnboundedReceiver<Value>,
}

/// Create a bound pair: a host-side [`ChannelFrame`] and a frame-side
/// [`FrameHandle`], as if a new sandboxed frame with identity `id` and
/// origin `origin` had just been created.
#[must_use]
pub fn channel_pair(id: FrameId, origin: impl Into<String>) -> (ChannelFrame, FrameHandle) {
    let (to_frame_tx, to_frame_rx) = mpsc::unbounded_channel();
    let (to_host_tx, to_host_rx) = mpsc::unbounded_channel();

    (
        ChannelFrame {
            id,
            to_frame: to_frame_tx,
            from_frame: to_host_rx,
        },
        FrameHandle {
            id,
            origin: origin.into(),
            to_host: to_host_tx,
            from_host: to_frame_rx,
        },
    )
}

#[async_trait]
impl FrameChannel for ChannelFrame {
    fn id(&self) -> FrameId {
        self.id
    }

    async fn recv(&mut self) -> Option<FrameMessage> {
        self.from_frame.recv().await
    }

    fn post_to_frame(&self, data: Value) -> Result<(), HandlerError> {
        self.to_frame
            .send(data)
            .map_err(|_| HandlerError::ChannelClosed)
    }
}

impl FrameHandle {
    /// Post a raw message toward the host, as if `window.parent.postMessage`
    /// had been called from inside the frame.
    pub fn post_to_host(&self, data: Value) -> Result<(), HandlerError> {
        self.to_host
            .send(FrameMessage {
                source: self.id,
                origin: self.origin.clone(),
                data,
            })
            .map_err(|_| HandlerError::ChannelClosed)
    }

    /// Wait for the next message the host posts back into this frame.
    pub async fn recv_from_host(&mut self) -> Option<Value> {
        self.from_host.recv().await
    }

    /// This frame's identity.
    #[must_use]
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// The origin this frame reports on every outgoing message.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// A cloneable sender for posting toward the host, independent of this
    /// handle's `&mut self` receive half. [`super::IframeRuntime`] hands the
    /// handle itself to its background reader task and keeps one of these
    /// for posting.
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<FrameMessage> {
        self.to_host.clone()
    }
}
