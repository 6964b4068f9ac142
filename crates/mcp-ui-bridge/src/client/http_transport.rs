//! [`HttpTransport`]: maps each MCP method to its own POST endpoint, per
//! §6's "HTTP maps each method to a POST endpoint." No persistent
//! connection and no streaming — see [`Transport::supports_streaming`].

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use super::transport::{Frame, MCPRequest, Transport};
use super::ClientError;

/// A [`Transport`] that issues one HTTP POST per request. Each
/// [`Transport::send`] fires the POST in the background; [`Transport::recv`]
/// drains whichever response lands first, so requests can pipeline the
/// same way they do over [`super::WebSocketTransport`].
pub struct HttpTransport {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
    results_tx: mpsc::UnboundedSender<Frame>,
    results_rx: mpsc::UnboundedReceiver<Frame>,
}

impl HttpTransport {
    /// Build a transport against `base_url` (e.g. `http://localhost:8080`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            base_url: base_url.into(),
            api_key: None,
            client: reqwest::Client::new(),
            results_tx,
            results_rx,
        }
    }

    /// Build a transport that presents `api_key` as a bearer token on
    /// every request, matching [`crate::transport::HttpConfig`] on the
    /// server side.
    #[must_use]
    pub fn with_api_key(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::new(base_url)
        }
    }

    fn endpoint_for(method: &str) -> Result<&'static str, ClientError> {
        match method {
            "resources.list" => Ok("/resources/list"),
            "resources.read" => Ok("/resources/read"),
            "tools.list" => Ok("/tools/list"),
            "tools.execute" => Ok("/tools/execute"),
            other => Err(ClientError::Transport(format!("no HTTP endpoint for method {other}"))),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn connect(&mut self) -> Result<(), ClientError> {
        url::Url::parse(&self.base_url)?;
        Ok(())
    }

    async fn send(&mut self, request: &MCPRequest) -> Result<(), ClientError> {
        let endpoint = Self::endpoint_for(&request.method)?;
        let url = format!("{}{endpoint}", self.base_url);
        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let body = request.params.clone().unwrap_or(Value::Null);
        let id = request.id.clone();
        let tx = self.results_tx.clone();

        tokio::spawn(async move {
            let mut builder = client.post(&url).json(&body);
            if let Some(key) = &api_key {
                builder = builder.bearer_auth(key);
            }

            let frame = match builder.send().await {
                Ok(response) => match response.json::<Value>().await {
                    Ok(value) => Frame::Response {
                        id,
                        result: extract_result(value),
                    },
                    Err(e) => Frame::Response {
                        id,
                        result: Err(e.to_string()),
                    },
                },
                Err(e) => Frame::Response {
                    id,
                    result: Err(e.to_string()),
                },
            };

            let _ = tx.send(frame);
        });

        Ok(())
    }

    async fn recv(&mut self) -> Result<Frame, ClientError> {
        self.results_rx
            .recv()
            .await
            .ok_or_else(|| ClientError::Transport("connection closed".to_string()))
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        Ok(())
    }

    fn supports_streaming(&self) -> bool {
        false
    }
}

fn extract_result(value: Value) -> Result<Value, String> {
    match value.get("error").and_then(|e| e.get("message")).and_then(Value::as_str) {
        Some(message) => Err(message.to_string()),
        None => Ok(value),
    }
}
