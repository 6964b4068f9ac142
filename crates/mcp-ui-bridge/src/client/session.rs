//! [`McpClient`]: a durable session to an MCP server, per §4.D.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as SyncMutex};

use serde_json::Value;
use tokio::sync::{broadcast, oneshot, Mutex};
use tokio::task::JoinHandle;

use super::config::{ClientConfig, ConnectionState};
use super::transport::{Frame, MCPRequest, Transport};
use super::ClientError;

type PendingTable = SyncMutex<HashMap<String, oneshot::Sender<Result<Value, ClientError>>>>;
type StreamSubscribers = SyncMutex<HashMap<String, Box<dyn Fn(Value) + Send + Sync>>>;

struct Shared {
    config: ClientConfig,
    /// The transport instance, when it isn't currently owned by the
    /// running [`io_loop`] task. Moved out for [`McpClient::ensure_connected`]
    /// and handed back once the loop exits, so a reconnect attempt can
    /// reuse the same transport object.
    transport: Mutex<Option<Box<dyn Transport>>>,
    state: Mutex<ConnectionState>,
    state_tx: broadcast::Sender<ConnectionState>,
    pending: PendingTable,
    stream_subscribers: StreamSubscribers,
    next_request_id: AtomicU64,
    reconnect_attempt: AtomicU32,
    connect_lock: Mutex<()>,
    io_task: Mutex<Option<JoinHandle<()>>>,
    outgoing_tx: Mutex<Option<tokio::sync::mpsc::UnboundedSender<MCPRequest>>>,
    /// Fired by [`McpClient::disconnect`] to ask the running [`io_loop`] to
    /// stop; the loop itself calls [`Transport::close`] before returning,
    /// so disconnect never has to race an aborted task for that call.
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    streaming_supported: AtomicBool,
    intentional_disconnect: AtomicBool,
}

/// A durable session to an MCP server, with pluggable transport, request/
/// response correlation, reconnection, and streaming subscriptions.
///
/// Cheaply cloneable: every clone shares the same connection, pending
/// request table, and background I/O task.
#[derive(Clone)]
pub struct McpClient {
    shared: Arc<Shared>,
}

impl McpClient {
    /// Build a client over `transport`, not yet connected.
    #[must_use]
    pub fn new(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        let (state_tx, _) = broadcast::channel(16);
        Self {
            shared: Arc::new(Shared {
                config,
                transport: Mutex::new(Some(Box::new(transport))),
                state: Mutex::new(ConnectionState::Disconnected),
                state_tx,
                pending: SyncMutex::new(HashMap::new()),
                stream_subscribers: SyncMutex::new(HashMap::new()),
                next_request_id: AtomicU64::new(0),
                reconnect_attempt: AtomicU32::new(0),
                connect_lock: Mutex::new(()),
                io_task: Mutex::new(None),
                outgoing_tx: Mutex::new(None),
                shutdown_tx: Mutex::new(None),
                streaming_supported: AtomicBool::new(true),
                intentional_disconnect: AtomicBool::new(false),
            }),
        }
    }

    /// The current connection state.
    pub async fn state(&self) -> ConnectionState {
        *self.shared.state.lock().await
    }

    /// Subscribe to connection state transitions (`connected`,
    /// `disconnected`, `error`), per §4.D's `on(event, cb)`.
    #[must_use]
    pub fn on_state_change(&self) -> broadcast::Receiver<ConnectionState> {
        self.shared.state_tx.subscribe()
    }

    async fn set_state(&self, state: ConnectionState) {
        *self.shared.state.lock().await = state;
        let _ = self.shared.state_tx.send(state);
        tracing::info!(?state, "connection state changed");
    }

    /// Await an in-flight connect, or start one, per step 1 of the
    /// request lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Timeout`] if `connect_timeout` elapses, or
    /// whatever [`Transport::connect`] itself reports.
    async fn ensure_connected(&self) -> Result<(), ClientError> {
        if self.state().await == ConnectionState::Connected {
            return Ok(());
        }

        let _guard = self.shared.connect_lock.lock().await;
        if self.state().await == ConnectionState::Connected {
            return Ok(());
        }

        self.set_state(ConnectionState::Connecting).await;

        let mut transport = self
            .shared
            .transport
            .lock()
            .await
            .take()
            .ok_or_else(|| ClientError::Transport("transport already running".to_string()))?;

        let connected =
            tokio::time::timeout(self.shared.config.connect_timeout, transport.connect()).await;

        match connected {
            Ok(Ok(())) => {
                self.shared.intentional_disconnect.store(false, Ordering::SeqCst);
                self.shared.reconnect_attempt.store(0, Ordering::SeqCst);
                self.shared
                    .streaming_supported
                    .store(transport.supports_streaming(), Ordering::SeqCst);
                self.spawn_io_loop(transport).await;
                self.set_state(ConnectionState::Connected).await;
                Ok(())
            }
            Ok(Err(e)) => {
                *self.shared.transport.lock().await = Some(transport);
                self.set_state(ConnectionState::Error).await;
                Err(e)
            }
            Err(_) => {
                *self.shared.transport.lock().await = Some(transport);
                self.set_state(ConnectionState::Error).await;
                Err(ClientError::Timeout)
            }
        }
    }

    async fn spawn_io_loop(&self, transport: Box<dyn Transport>) {
        let (outgoing_tx, outgoing_rx) = tokio::sync::mpsc::unbounded_channel();
        *self.shared.outgoing_tx.lock().await = Some(outgoing_tx);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        *self.shared.shutdown_tx.lock().await = Some(shutdown_tx);

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(io_loop(shared, transport, outgoing_rx, shutdown_rx));
        *self.shared.io_task.lock().await = Some(handle);
    }

    fn next_request_id(&self) -> String {
        let counter = self.shared.next_request_id.fetch_add(1, Ordering::SeqCst);
        let millis = chrono::Utc::now().timestamp_millis();
        format!("req-{millis}-{counter}")
    }

    /// Steps 2-7 of the request lifecycle: generate an id, register a
    /// pending entry, send, and wait for resolution or timeout.
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, ClientError> {
        self.ensure_connected().await?;

        let id = self.next_request_id();
        let (tx, rx) = oneshot::channel();
        self.shared.pending.lock().unwrap().insert(id.clone(), tx);

        if self.shared.config.verbose {
            tracing::debug!(id = %id, method, "request registered");
        }

        let outgoing = self
            .shared
            .outgoing_tx
            .lock()
            .await
            .clone()
            .ok_or_else(|| ClientError::Transport("not connected".to_string()))?;

        let mcp_request = MCPRequest {
            id: id.clone(),
            method: method.to_string(),
            params,
        };

        if outgoing.send(mcp_request).is_err() {
            self.shared.pending.lock().unwrap().remove(&id);
            return Err(ClientError::Transport("send channel closed".to_string()));
        }

        match tokio::time::timeout(self.shared.config.request_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ClientError::Cancelled),
            Err(_) => {
                self.shared.pending.lock().unwrap().remove(&id);
                Err(ClientError::Timeout)
            }
        }
    }

    /// `resources.list`.
    ///
    /// # Errors
    ///
    /// See the request lifecycle's failure modes in §7.
    pub async fn list_resources(&self) -> Result<Value, ClientError> {
        self.request("resources.list", None).await
    }

    /// `resources.read { uri }`.
    ///
    /// # Errors
    ///
    /// See the request lifecycle's failure modes in §7.
    pub async fn read_resource(&self, uri: &str) -> Result<Value, ClientError> {
        self.request("resources.read", Some(serde_json::json!({ "uri": uri }))).await
    }

    /// `tools.list`.
    ///
    /// # Errors
    ///
    /// See the request lifecycle's failure modes in §7.
    pub async fn list_tools(&self) -> Result<Value, ClientError> {
        self.request("tools.list", None).await
    }

    /// `tools.execute { name, arguments }`.
    ///
    /// # Errors
    ///
    /// See the request lifecycle's failure modes in §7.
    pub async fn execute_tool(&self, name: &str, arguments: Value) -> Result<Value, ClientError> {
        self.request(
            "tools.execute",
            Some(serde_json::json!({ "name": name, "arguments": arguments })),
        )
        .await
    }

    /// Register `callback` for every `stream` frame whose id matches
    /// `request_id`, returning an unsubscribe function.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::StreamingUnsupported`] if the current
    /// transport doesn't carry stream frames (see
    /// [`super::HttpTransport`]).
    pub fn subscribe_to_stream(
        &self,
        request_id: impl Into<String>,
        callback: impl Fn(Value) + Send + Sync + 'static,
    ) -> Result<Box<dyn Fn() + Send>, ClientError> {
        if !self.shared.streaming_supported.load(Ordering::SeqCst) {
            return Err(ClientError::StreamingUnsupported);
        }

        let id = request_id.into();
        self.shared
            .stream_subscribers
            .lock()
            .unwrap()
            .insert(id.clone(), Box::new(callback));

        let subscribers = Arc::clone(&self.shared.stream_subscribers);
        Ok(Box::new(move || {
            subscribers.lock().unwrap().remove(&id);
        }))
    }

    /// Idempotent: cancels all pending timers, rejects all pending
    /// requests with [`ClientError::Cancelled`], closes the transport, and
    /// transitions to [`ConnectionState::Disconnected`].
    ///
    /// Asks the running [`io_loop`] to stop rather than aborting it, so the
    /// loop's own `transport.close().await` — a real close handshake for
    /// transports like [`super::WebSocketTransport`] — always runs before
    /// this returns.
    pub async fn disconnect(&self) -> Result<(), ClientError> {
        if self.state().await == ConnectionState::Disconnected {
            return Ok(());
        }

        self.shared.intentional_disconnect.store(true, Ordering::SeqCst);

        if let Some(shutdown_tx) = self.shared.shutdown_tx.lock().await.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(handle) = self.shared.io_task.lock().await.take() {
            let _ = handle.await;
        }

        reject_all_pending(&self.shared, || ClientError::Cancelled);
        self.shared.stream_subscribers.lock().unwrap().clear();

        self.set_state(ConnectionState::Disconnected).await;
        Ok(())
    }
}

/// Owns the transport exclusively for as long as the connection is live,
/// interleaving outgoing sends with incoming frames via `select!` so
/// neither starves the other — the standard way to drive a half-duplex
/// trait object from one task without a lock held across an indefinite
/// `recv`. Also listens for a shutdown signal from
/// [`McpClient::disconnect`], so `transport.close()` always runs here
/// rather than racing an aborted task.
async fn io_loop(
    shared: Arc<Shared>,
    mut transport: Box<dyn Transport>,
    mut outgoing_rx: tokio::sync::mpsc::UnboundedReceiver<MCPRequest>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let closed_with = loop {
        tokio::select! {
            _ = &mut shutdown_rx => break None,
            maybe_request = outgoing_rx.recv() => {
                match maybe_request {
                    Some(request) => {
                        if let Err(e) = transport.send(&request).await {
                            reject_pending(&shared, &request.id, ClientError::Transport(e.to_string()));
                        }
                    }
                    None => break None,
                }
            }
            frame = transport.recv() => {
                match frame {
                    Ok(Frame::Response { id, result }) => {
                        resolve_pending(&shared, &id, result.map_err(ClientError::Server));
                    }
                    Ok(Frame::Stream { id, frame, done }) => {
                        dispatch_stream(&shared, &id, frame, done);
                    }
                    Err(e) => break Some(e),
                }
            }
        }
    };

    let _ = transport.close().await;
    *shared.outgoing_tx.lock().await = None;
    *shared.transport.lock().await = Some(transport);

    let Some(err) = closed_with else { return };
    if shared.intentional_disconnect.load(Ordering::SeqCst) {
        return;
    }

    tracing::warn!(error = %err, "transport closed unexpectedly");
    *shared.state.lock().await = ConnectionState::Error;
    let _ = shared.state_tx.send(ConnectionState::Error);
    reject_all_pending(&shared, || ClientError::Transport(err.to_string()));

    if shared.config.auto_reconnect {
        spawn_reconnect(shared);
    }
}

fn resolve_pending(shared: &Shared, id: &str, result: Result<Value, ClientError>) {
    if let Some(tx) = shared.pending.lock().unwrap().remove(id) {
        let _ = tx.send(result);
    }
}

fn reject_pending(shared: &Shared, id: &str, err: ClientError) {
    if let Some(tx) = shared.pending.lock().unwrap().remove(id) {
        let _ = tx.send(Err(err));
    }
}

fn reject_all_pending(shared: &Shared, make_err: impl Fn() -> ClientError) {
    let mut pending = shared.pending.lock().unwrap();
    for (_, tx) in pending.drain() {
        let _ = tx.send(Err(make_err()));
    }
}

fn dispatch_stream(shared: &Shared, id: &str, frame: Value, done: bool) {
    let mut subscribers = shared.stream_subscribers.lock().unwrap();
    if let Some(callback) = subscribers.get(id) {
        callback(frame);
    }
    if done {
        subscribers.remove(id);
    }
}

/// `reconnectDelay * 2^(attempt-1)`, capped at `max_reconnect_attempts`,
/// resetting the counter on success — §4.D's "Reconnection" algorithm.
fn spawn_reconnect(shared: Arc<Shared>) {
    tokio::spawn(async move {
        loop {
            let attempt = shared.reconnect_attempt.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt > shared.config.max_reconnect_attempts {
                tracing::warn!(attempts = attempt - 1, "giving up reconnecting");
                *shared.state.lock().await = ConnectionState::Disconnected;
                let _ = shared.state_tx.send(ConnectionState::Disconnected);
                return;
            }

            let delay = shared.config.reconnect_delay * 2u32.pow(attempt - 1);
            tracing::warn!(attempt, ?delay, "reconnecting");
            tokio::time::sleep(delay).await;

            let client = McpClient {
                shared: Arc::clone(&shared),
            };
            if client.ensure_connected().await.is_ok() {
                tracing::info!("reconnected");
                return;
            }
        }
    });
}
