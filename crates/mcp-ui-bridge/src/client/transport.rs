//! [`Transport`]: the carrier a [`super::McpClient`] sends requests
//! through and receives frames from, per §6's wire protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ClientError;

/// One MCP request sent over the wire: `{ id, method, params? }`.
#[derive(Debug, Clone, Serialize)]
pub struct MCPRequest {
    pub id: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// The `error` half of a response frame.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameError {
    pub message: String,
}

/// Wire shape shared by both response and stream frames; which one a
/// given line represents is decided by whether `frame` is present, not by
/// an explicit tag — matching §6's grammar:
/// `response = { id, result? } | { id, error }` vs.
/// `stream = { id, frame, done? }`.
#[derive(Debug, Clone, Deserialize)]
struct RawFrame {
    id: String,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<FrameError>,
    #[serde(default)]
    frame: Option<Value>,
    #[serde(default)]
    done: bool,
}

/// One frame received from the transport.
#[derive(Debug, Clone)]
pub enum Frame {
    /// A terminal response to a request previously sent with the same id.
    Response { id: String, result: Result<Value, String> },
    /// A streamed chunk; `done` marks the last one for this id.
    Stream { id: String, frame: Value, done: bool },
}

/// Parse one wire line into a [`Frame`], shared by every [`Transport`]
/// implementation so frame classification only exists in one place.
///
/// # Errors
///
/// Returns [`ClientError::Serialization`] if `text` isn't a well-formed
/// frame.
pub fn parse_frame(text: &str) -> Result<Frame, ClientError> {
    let raw: RawFrame = serde_json::from_str(text)?;
    Ok(if let Some(frame) = raw.frame {
        Frame::Stream {
            id: raw.id,
            frame,
            done: raw.done,
        }
    } else {
        Frame::Response {
            id: raw.id,
            result: match raw.error {
                Some(err) => Err(err.message),
                None => Ok(raw.result.unwrap_or(Value::Null)),
            },
        }
    })
}

/// A carrier for the MCP wire protocol.
///
/// Implemented by [`super::WebSocketTransport`] (one full-duplex
/// connection, supports streaming) and [`super::HttpTransport`] (one POST
/// per method, no streaming — see [`Transport::supports_streaming`]).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish the underlying connection.
    async fn connect(&mut self) -> Result<(), ClientError>;

    /// Send one request. Does not wait for its response — [`McpClient`]
    /// correlates responses with requests by id via [`Transport::recv`].
    ///
    /// [`McpClient`]: super::McpClient
    async fn send(&mut self, request: &MCPRequest) -> Result<(), ClientError>;

    /// Wait for the next frame, whichever request or stream it belongs to.
    async fn recv(&mut self) -> Result<Frame, ClientError>;

    /// Tear down the connection. Idempotent.
    async fn close(&mut self) -> Result<(), ClientError>;

    /// `false` for transports that can't carry `stream` frames.
    fn supports_streaming(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_success_response() {
        let frame = parse_frame(r#"{"id":"req-1","result":{"ok":true}}"#).unwrap();
        match frame {
            Frame::Response { id, result } => {
                assert_eq!(id, "req-1");
                assert_eq!(result.unwrap(), json!({ "ok": true }));
            }
            other => panic!("expected Response, got {other:?}"),
        }
    }

    #[test]
    fn parses_error_response() {
        let frame = parse_frame(r#"{"id":"req-1","error":{"message":"boom"}}"#).unwrap();
        match frame {
            Frame::Response { result, .. } => assert_eq!(result.unwrap_err(), "boom"),
            other => panic!("expected Response, got {other:?}"),
        }
    }

    #[test]
    fn parses_stream_frame() {
        let frame = parse_frame(r#"{"id":"req-1","frame":"chunk","done":false}"#).unwrap();
        match frame {
            Frame::Stream { id, frame, done } => {
                assert_eq!(id, "req-1");
                assert_eq!(frame, json!("chunk"));
                assert!(!done);
            }
            other => panic!("expected Stream, got {other:?}"),
        }
    }
}
