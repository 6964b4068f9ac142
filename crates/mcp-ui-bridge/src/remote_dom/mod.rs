//! The remote-DOM renderer: materializes a serialized component tree
//! (the payload of an `application/vnd.mcp-ui.remote-dom+javascript`
//! resource) against a [`RenderSink`], diffs successive trees by id, and
//! exposes per-component subscribers.
//!
//! There is no real DOM inside this crate — see `SPEC_FULL.md` §1 for why
//! [`RenderSink`] exists and what a real browser host implements instead
//! of [`RecordingSink`].

mod component;
mod error;
mod format;
mod reconcile;
mod render;

#[cfg(test)]
mod tests;

pub use component::{Children, ComponentMeta, PreferredFrameSize, RemoteDomComponent};
pub use error::RemoteDomError;
pub use format::{decode_stream, encode_stream};
pub use reconcile::{apply_diffs, reconcile_tree, Diff};
pub use render::{IntentCallback, RecordedElement, RecordingSink, RemoteDomRenderer, RenderSink};
