//! [`IframeRuntime`]: the frame-side stand-in for the injected
//! `window.UIInteractive` library.
//!
//! A real sandboxed frame has no access to this crate; it only ever sees
//! the small JS surface the host injects into it (`executeTool`, `notify`,
//! `navigateTo`, `sendIntent`). [`IframeRuntime`] is that surface,
//! reimplemented against a [`super::FrameHandle`] instead of `window.parent`,
//! for use by this crate's own tests and by any non-browser frame-side
//! host.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::debug;

use crate::action::{LinkTarget, NotifyLevel, ResponseMessage};

use super::{FrameHandle, FrameId, HandlerError, DEFAULT_TIMEOUT};

type PendingTable = Arc<Mutex<HashMap<String, oneshot::Sender<ResponseMessage>>>>;

/// Frame-side handle for invoking host tools and firing notifications,
/// mirroring the JS library a real sandboxed frame would have injected into
/// it.
///
/// Owns a background task that reads everything the host posts back and
/// resolves the matching entry in its pending-request table. Dropping the
/// runtime ends that task; any request still outstanding resolves to
/// [`HandlerError::Cancelled`] once its sender is dropped.
pub struct IframeRuntime {
    frame_id: FrameId,
    origin: String,
    to_host: tokio::sync::mpsc::UnboundedSender<super::FrameMessage>,
    pending: PendingTable,
    next_id: AtomicU64,
    timeout: Duration,
    reader: JoinHandle<()>,
}

impl IframeRuntime {
    /// Build a runtime around `handle`, using the default per-request
    /// timeout.
    #[must_use]
    pub fn new(handle: FrameHandle) -> Self {
        Self::with_timeout(handle, DEFAULT_TIMEOUT)
    }

    /// Build a runtime with a caller-supplied per-request timeout.
    #[must_use]
    pub fn with_timeout(handle: FrameHandle, timeout: Duration) -> Self {
        let frame_id = handle.id();
        let origin = handle.origin().to_owned();
        let to_host = handle.sender();
        let pending: PendingTable = Arc::new(Mutex::new(HashMap::new()));

        let reader = tokio::spawn(Self::read_loop(handle, Arc::clone(&pending)));

        Self {
            frame_id,
            origin,
            to_host,
            pending,
            next_id: AtomicU64::new(1),
            timeout,
            reader,
        }
    }

    async fn read_loop(mut handle: FrameHandle, pending: PendingTable) {
        while let Some(value) = handle.recv_from_host().await {
            let response: ResponseMessage = match serde_json::from_value(value) {
                Ok(r) => r,
                Err(err) => {
                    debug!(%err, "host posted a non-response message; ignoring");
                    continue;
                }
            };
            if let Some(tx) = pending.lock().await.remove(&response.request_id) {
                let _ = tx.send(response);
            }
        }
        // Host channel closed: every sender left in the table gets dropped
        // here, which resolves its paired receiver with a recv error —
        // `execute_tool` maps that to `HandlerError::Cancelled`.
        pending.lock().await.clear();
    }

    fn post(&self, data: Value) -> Result<(), HandlerError> {
        self.to_host
            .send(super::FrameMessage {
                source: self.frame_id,
                origin: self.origin.clone(),
                data,
            })
            .map_err(|_| HandlerError::ChannelClosed)
    }

    /// Invoke a host tool by name with already-primitive parameters,
    /// waiting up to this runtime's timeout for a response.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Timeout`] if no response arrives in time, or
    /// [`HandlerError::Cancelled`] if the host channel closes while the
    /// request is outstanding.
    pub async fn execute_tool(&self, tool_name: &str, params: Value) -> Result<Value, HandlerError> {
        let request_id = format!("req-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(request_id.clone(), tx);

        if let Err(err) = self.post(json!({
            "type": "tool",
            "payload": {
                "toolName": tool_name,
                "params": params,
                "requestId": request_id,
            }
        })) {
            self.pending.lock().await.remove(&request_id);
            return Err(err);
        }

        match timeout(self.timeout, rx).await {
            Ok(Ok(response)) if response.success => Ok(response.data.unwrap_or(Value::Null)),
            Ok(Ok(response)) => Err(HandlerError::ToolFailed(
                response.error.unwrap_or_else(|| "tool execution failed".into()),
            )),
            Ok(Err(_)) => Err(HandlerError::Cancelled),
            Err(_) => {
                self.pending.lock().await.remove(&request_id);
                Err(HandlerError::Timeout)
            }
        }
    }

    /// Fire-and-forget a `notify` action; never waits for a response.
    pub fn notify(&self, level: NotifyLevel, message: impl Into<String>) -> Result<(), HandlerError> {
        self.post(json!({
            "type": "notify",
            "payload": { "level": level, "message": message.into() }
        }))
    }

    /// Fire-and-forget a `link` action.
    pub fn navigate_to(
        &self,
        url: impl Into<String>,
        target: Option<LinkTarget>,
    ) -> Result<(), HandlerError> {
        self.post(json!({
            "type": "link",
            "payload": { "url": url.into(), "target": target }
        }))
    }

    /// Fire-and-forget an `intent` action.
    pub fn intent(&self, intent: impl Into<String>, data: Option<Value>) -> Result<(), HandlerError> {
        self.post(json!({
            "type": "intent",
            "payload": { "intent": intent.into(), "data": data }
        }))
    }
}

impl Drop for IframeRuntime {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
