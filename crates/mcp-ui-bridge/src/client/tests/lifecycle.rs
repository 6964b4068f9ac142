use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc;

use crate::client::{ClientConfig, ClientError, Frame, MCPRequest, McpClient, Transport};

struct FakeTransport {
    incoming_rx: mpsc::UnboundedReceiver<Frame>,
    sent_tx: mpsc::UnboundedSender<MCPRequest>,
    connect_ok: bool,
    streaming: bool,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl Transport for FakeTransport {
    async fn connect(&mut self) -> Result<(), ClientError> {
        if self.connect_ok {
            Ok(())
        } else {
            Err(ClientError::Transport("refused".to_string()))
        }
    }

    async fn send(&mut self, request: &MCPRequest) -> Result<(), ClientError> {
        let _ = self.sent_tx.send(request.clone());
        Ok(())
    }

    async fn recv(&mut self) -> Result<Frame, ClientError> {
        self.incoming_rx
            .recv()
            .await
            .ok_or_else(|| ClientError::Transport("closed".to_string()))
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn supports_streaming(&self) -> bool {
        self.streaming
    }
}

fn harness(streaming: bool) -> (McpClient, mpsc::UnboundedSender<Frame>, mpsc::UnboundedReceiver<MCPRequest>) {
    let (client, incoming_tx, sent_rx, _closed) = harness_with_close_flag(streaming);
    (client, incoming_tx, sent_rx)
}

fn harness_with_close_flag(
    streaming: bool,
) -> (McpClient, mpsc::UnboundedSender<Frame>, mpsc::UnboundedReceiver<MCPRequest>, Arc<AtomicBool>) {
    let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
    let (sent_tx, sent_rx) = mpsc::unbounded_channel();
    let closed = Arc::new(AtomicBool::new(false));
    let transport = FakeTransport {
        incoming_rx,
        sent_tx,
        connect_ok: true,
        streaming,
        closed: Arc::clone(&closed),
    };

    let mut config = ClientConfig::new("fake://test");
    config.connect_timeout = Duration::from_millis(200);
    config.request_timeout = Duration::from_millis(200);
    config.auto_reconnect = false;

    (McpClient::new(config, transport), incoming_tx, sent_rx, closed)
}

#[tokio::test]
async fn resolves_a_response_by_matching_request_id() {
    let (client, incoming_tx, mut sent_rx) = harness(true);

    let call = tokio::spawn({
        let client = client.clone();
        async move { client.list_resources().await }
    });

    let sent = sent_rx.recv().await.expect("request was sent");
    assert_eq!(sent.method, "resources.list");
    incoming_tx
        .send(Frame::Response {
            id: sent.id,
            result: Ok(json!({ "resources": [] })),
        })
        .unwrap();

    let result = call.await.unwrap().unwrap();
    assert_eq!(result, json!({ "resources": [] }));
}

#[tokio::test]
async fn a_server_error_frame_surfaces_as_client_error_server() {
    let (client, incoming_tx, mut sent_rx) = harness(true);

    let call = tokio::spawn({
        let client = client.clone();
        async move { client.execute_tool("echo", json!({})).await }
    });

    let sent = sent_rx.recv().await.expect("request was sent");
    incoming_tx
        .send(Frame::Response {
            id: sent.id,
            result: Err("tool not found".to_string()),
        })
        .unwrap();

    match call.await.unwrap().unwrap_err() {
        ClientError::Server(message) => assert_eq!(message, "tool not found"),
        other => panic!("expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn a_request_with_no_response_times_out() {
    let (client, _incoming_tx, mut sent_rx) = harness(true);

    let call = tokio::spawn({
        let client = client.clone();
        async move { client.list_tools().await }
    });

    sent_rx.recv().await.expect("request was sent");
    assert!(matches!(call.await.unwrap().unwrap_err(), ClientError::Timeout));
}

#[tokio::test]
async fn disconnect_cancels_every_in_flight_request() {
    let (client, _incoming_tx, mut sent_rx) = harness(true);

    let call = tokio::spawn({
        let client = client.clone();
        async move { client.list_resources().await }
    });

    sent_rx.recv().await.expect("request was sent");
    client.disconnect().await.unwrap();

    assert!(matches!(call.await.unwrap().unwrap_err(), ClientError::Cancelled));
}

#[tokio::test]
async fn disconnect_closes_the_transport() {
    let (client, _incoming_tx, mut sent_rx, closed) = harness_with_close_flag(true);

    let call = tokio::spawn({
        let client = client.clone();
        async move { client.list_resources().await }
    });
    sent_rx.recv().await.expect("request was sent");

    client.disconnect().await.unwrap();

    assert!(closed.load(Ordering::SeqCst), "transport.close() was never called");
    assert!(matches!(call.await.unwrap().unwrap_err(), ClientError::Cancelled));
}

#[tokio::test]
async fn subscribing_over_a_non_streaming_transport_is_rejected() {
    let (client, incoming_tx, mut sent_rx) = harness(false);

    let call = tokio::spawn({
        let client = client.clone();
        async move { client.list_resources().await }
    });
    let sent = sent_rx.recv().await.expect("request was sent");
    incoming_tx
        .send(Frame::Response {
            id: sent.id,
            result: Ok(json!({ "resources": [] })),
        })
        .unwrap();
    call.await.unwrap().unwrap();

    assert!(matches!(
        client.subscribe_to_stream("req-1", |_| {}),
        Err(ClientError::StreamingUnsupported)
    ));
}

#[tokio::test]
async fn stream_frames_are_delivered_until_done() {
    let (client, incoming_tx, mut sent_rx) = harness(true);

    let call = tokio::spawn({
        let client = client.clone();
        async move { client.execute_tool("render", json!({})).await }
    });
    let sent = sent_rx.recv().await.expect("request was sent");

    let (received_tx, mut received_rx) = mpsc::unbounded_channel();
    let unsubscribe = client
        .subscribe_to_stream(sent.id.clone(), move |frame| {
            let _ = received_tx.send(frame);
        })
        .unwrap();

    incoming_tx
        .send(Frame::Stream {
            id: sent.id.clone(),
            frame: json!("chunk-1"),
            done: false,
        })
        .unwrap();
    incoming_tx
        .send(Frame::Stream {
            id: sent.id.clone(),
            frame: json!("chunk-2"),
            done: true,
        })
        .unwrap();

    assert_eq!(received_rx.recv().await.unwrap(), json!("chunk-1"));
    assert_eq!(received_rx.recv().await.unwrap(), json!("chunk-2"));
    unsubscribe();

    incoming_tx
        .send(Frame::Response {
            id: sent.id,
            result: Ok(json!({ "ok": true })),
        })
        .unwrap();
    call.await.unwrap().unwrap();
}
