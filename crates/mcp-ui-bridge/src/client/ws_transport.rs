//! [`WebSocketTransport`]: carries request/response/stream frames over one
//! `tokio-tungstenite` connection, per §6's wire protocol.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::transport::{parse_frame, Frame, MCPRequest, Transport};
use super::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// A [`Transport`] over one WebSocket connection.
pub struct WebSocketTransport {
    url: String,
    socket: Option<WsStream>,
}

impl WebSocketTransport {
    /// Build a transport that will connect to `url` (`ws://` or `wss://`)
    /// on the first call to [`Transport::connect`].
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            socket: None,
        }
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn connect(&mut self) -> Result<(), ClientError> {
        let (socket, _response) = tokio_tungstenite::connect_async(&self.url)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        self.socket = Some(socket);
        Ok(())
    }

    async fn send(&mut self, request: &MCPRequest) -> Result<(), ClientError> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| ClientError::Transport("not connected".to_string()))?;
        let text = serde_json::to_string(request)?;
        socket
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Frame, ClientError> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| ClientError::Transport("not connected".to_string()))?;

        loop {
            match socket.next().await {
                Some(Ok(Message::Text(text))) => return parse_frame(&text),
                Some(Ok(Message::Close(_))) | None => {
                    return Err(ClientError::Transport("connection closed".to_string()))
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(ClientError::Transport(e.to_string())),
            }
        }
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        if let Some(mut socket) = self.socket.take() {
            let _ = socket.close(None).await;
        }
        Ok(())
    }
}
