//! Errors raised by [`super::RemoteDomComponent`] and [`super::RemoteDomRenderer`].

use thiserror::Error;

/// Failure modes for remote-DOM serialization, reconciliation, and
/// rendering, per the error taxonomy's `C` row.
#[derive(Debug, Error)]
pub enum RemoteDomError {
    /// `deserialize` was given something that doesn't parse as a
    /// well-formed component tree.
    #[error("malformed component: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The same id appeared twice while walking a tree top-down.
    #[error("duplicate component id in tree: {0}")]
    DuplicateId(String),

    /// A diff referenced a component id that reconciliation's own bookkeeping
    /// can't account for — an internal-consistency failure, not a user error.
    #[error("reconciliation diff referenced unknown component id: {0}")]
    ReconcileMalformed(String),

    /// `renderRemote` was asked to create an element for a `type` that
    /// isn't a valid DOM element name.
    #[error("component type {0:?} is not a valid element name")]
    InvalidElementType(String),

    /// The renderer has been disposed; no further operations are honored.
    #[error("renderer has been disposed")]
    DisposedRenderer,

    /// The underlying [`super::RenderSink`] reported a failure.
    #[error("render sink error: {0}")]
    Sink(String),
}
