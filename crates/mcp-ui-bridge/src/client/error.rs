//! Errors the client's request lifecycle and transports can surface.

use thiserror::Error;

/// Failure modes for [`super::McpClient`] operations, per the error
/// taxonomy's `D` row. Every public operation rejects with one of these
/// rather than panicking or leaving a request unresolved.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A request's `requestTimeout` elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// The transport itself failed (connect, send, or an unexpected close).
    #[error("transport error: {0}")]
    Transport(String),

    /// The request was rejected because [`super::McpClient::disconnect`]
    /// was called while it was in flight.
    #[error("request cancelled")]
    Cancelled,

    /// `subscribe_to_stream` was called against a transport that can't
    /// carry streamed frames (see [`super::HttpTransport`]).
    #[error("streaming is not supported over this transport")]
    StreamingUnsupported,

    /// The server's response itself carried an `error` frame.
    #[error("server reported an error: {0}")]
    Server(String),

    /// A request or response frame failed to (de)serialize.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// `ClientConfig::url` failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}
