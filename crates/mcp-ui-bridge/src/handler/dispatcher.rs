//! [`InteractiveHandler`]: binds one [`FrameChannel`] to a host, validating
//! and dispatching every message that crosses it.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::action::{
    is_valid_action, parse_valid_action, sanitize_params, ActionMessage, ResponseMessage,
};

use super::{FrameChannel, FrameId, ToolExecutor};

/// User-supplied reactions to the non-`tool` action variants.
///
/// Each callback is optional; a missing one means "drop the action after
/// validating it," which mirrors a host that simply doesn't support that
/// action kind yet.
#[derive(Clone, Default)]
pub struct Callbacks {
    /// Invoked for a `notify` action.
    pub on_notify: Option<Arc<dyn Fn(crate::action::NotifyLevel, String) + Send + Sync>>,
    /// Invoked for a `link` action.
    pub on_link: Option<Arc<dyn Fn(String, Option<crate::action::LinkTarget>) + Send + Sync>>,
    /// Invoked for a `prompt` action.
    pub on_prompt: Option<Arc<dyn Fn(String, Option<String>) + Send + Sync>>,
    /// Invoked for an `intent` action.
    pub on_intent:
        Option<Arc<dyn Fn(String, Option<std::collections::BTreeMap<String, crate::action::Primitive>>) + Send + Sync>>,
}

struct Attachment {
    frame_id: FrameId,
    task: JoinHandle<()>,
}

/// Binds a single sandboxed frame to a host, implementing the dispatch
/// algorithm that validates every inbound message before it touches
/// anything else: origin check, structural shape check, then dispatch by
/// action kind.
pub struct InteractiveHandler {
    executor: Arc<dyn ToolExecutor>,
    callbacks: Callbacks,
    attachment: Mutex<Option<Attachment>>,
}

impl InteractiveHandler {
    /// Build a handler around a tool executor and a set of callbacks for
    /// the non-`tool` action kinds.
    #[must_use]
    pub fn new(executor: Arc<dyn ToolExecutor>, callbacks: Callbacks) -> Self {
        Self {
            executor,
            callbacks,
            attachment: Mutex::new(None),
        }
    }

    /// Attach to `frame`, spawning a task that owns it for the lifetime of
    /// the attachment.
    ///
    /// Idempotent per iframe instance: attaching the same frame id twice is
    /// a no-op. Attaching a different frame while one is already attached
    /// detaches the old one first.
    pub async fn attach<F>(&self, frame: F)
    where
        F: FrameChannel + 'static,
    {
        let frame_id = frame.id();
        let mut guard = self.attachment.lock().await;

        if let Some(existing) = guard.as_ref() {
            if existing.frame_id == frame_id {
                return;
            }
        }
        if let Some(old) = guard.take() {
            old.task.abort();
        }

        let executor = Arc::clone(&self.executor);
        let callbacks = self.callbacks.clone();
        let task = tokio::spawn(Self::dispatch_loop(frame_id, frame, executor, callbacks));

        *guard = Some(Attachment { frame_id, task });
    }

    /// Detach from whatever frame is currently attached, if any. Dropping
    /// the dispatch task drops its [`FrameChannel`], which signals closure
    /// to the other side of the bus.
    pub async fn detach(&self) {
        let mut guard = self.attachment.lock().await;
        if let Some(attachment) = guard.take() {
            attachment.task.abort();
        }
    }

    /// Is a frame currently attached?
    pub async fn is_attached(&self) -> bool {
        self.attachment.lock().await.is_some()
    }

    async fn dispatch_loop<F>(
        frame_id: FrameId,
        mut frame: F,
        executor: Arc<dyn ToolExecutor>,
        callbacks: Callbacks,
    ) where
        F: FrameChannel + 'static,
    {
        while let Some(message) = frame.recv().await {
            if message.source != frame_id {
                debug!(?frame_id, source = ?message.source, "dropping message from unrelated source");
                continue;
            }
            if !crate::action::validate_origin(&message.origin) {
                debug!(origin = %message.origin, "dropping message with rejected origin");
                continue;
            }
            if !is_valid_action(&message.data) {
                debug!("dropping structurally invalid action message");
                continue;
            }
            let Some(action) = parse_valid_action(&message.data) else {
                warn!("action passed validation but failed to parse; dropping");
                continue;
            };

            Self::dispatch_one(&frame, action, &executor, &callbacks).await;
        }
    }

    async fn dispatch_one(
        frame: &impl FrameChannel,
        action: ActionMessage,
        executor: &Arc<dyn ToolExecutor>,
        callbacks: &Callbacks,
    ) {
        match action {
            ActionMessage::Tool(payload) => {
                let sanitized = sanitize_params(&payload.params);
                let result = executor.execute(&payload.tool_name, sanitized).await;

                if let Some(request_id) = payload.request_id {
                    let response = if result.success {
                        ResponseMessage::success(request_id, result.data.unwrap_or(json!(null)))
                    } else {
                        ResponseMessage::failure(
                            request_id,
                            result.error.unwrap_or_else(|| "tool execution failed".into()),
                        )
                    };
                    Self::post_response(frame, &response);
                }
            }
            ActionMessage::Notify { level, message } => {
                if let Some(cb) = &callbacks.on_notify {
                    cb(level, message);
                }
            }
            ActionMessage::Link { url, target } => {
                if let Some(cb) = &callbacks.on_link {
                    cb(url, target);
                }
            }
            ActionMessage::Prompt { text, default_value } => {
                if let Some(cb) = &callbacks.on_prompt {
                    cb(text, default_value);
                }
            }
            ActionMessage::Intent { intent, data } => {
                if let Some(cb) = &callbacks.on_intent {
                    cb(intent, data);
                }
            }
        }
    }

    fn post_response(frame: &impl FrameChannel, response: &ResponseMessage) {
        match serde_json::to_value(response) {
            Ok(value) => {
                if let Err(err) = frame.post_to_frame(value) {
                    warn!(%err, "failed to post response into frame");
                }
            }
            Err(err) => warn!(%err, "failed to serialize response message"),
        }
    }
}

impl std::fmt::Debug for InteractiveHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractiveHandler").finish_non_exhaustive()
    }
}
