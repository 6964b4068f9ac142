//! `UIResource`: a renderable unit produced by the server and consumed by
//! the host, plus the store that owns them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ServerError;

/// How a [`UIResource`]'s `text` payload should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeKind {
    /// Inline sandboxed HTML.
    Html,
    /// One candidate external URL per line.
    UriList,
    /// A serialized remote-DOM component tree.
    RemoteDom,
}

impl MimeKind {
    /// Parse a resource's `mimeType` string into a [`MimeKind`].
    #[must_use]
    pub fn parse(mime_type: &str) -> Option<Self> {
        match mime_type {
            "text/html" => Some(Self::Html),
            "text/uri-list" => Some(Self::UriList),
            "application/vnd.mcp-ui.remote-dom+javascript" => Some(Self::RemoteDom),
            _ => None,
        }
    }

    /// The canonical `mimeType` string for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::UriList => "text/uri-list",
            Self::RemoteDom => "application/vnd.mcp-ui.remote-dom+javascript",
        }
    }
}

/// Dimensions the host should prefer when sizing the sandboxed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredFrameSize {
    /// Preferred width in CSS pixels.
    pub width: u32,
    /// Preferred height in CSS pixels.
    pub height: u32,
}

/// Recognized entries of a [`UIResource`]'s `meta` map.
#[derive(Debug, Clone, Default)]
pub struct ResourceMeta {
    /// `preferredFrameSize`, if the publisher supplied one.
    pub preferred_frame_size: Option<PreferredFrameSize>,
    /// `remoteDom: true`, a hint that this resource's `text` is a
    /// remote-DOM payload even when the mime type alone wouldn't say so.
    pub remote_dom: bool,
}

impl ResourceMeta {
    fn from_value(meta: &Value) -> Self {
        let Some(obj) = meta.as_object() else {
            return Self::default();
        };
        let preferred_frame_size = obj
            .get("preferredFrameSize")
            .and_then(|v| serde_json::from_value(v.clone()).ok());
        let remote_dom = obj.get("remoteDom").and_then(Value::as_bool).unwrap_or(false);
        Self {
            preferred_frame_size,
            remote_dom,
        }
    }
}

/// A renderable unit published by the server.
///
/// Immutable once constructed: there is no setter, matching the data
/// model's "resources are immutable once published" invariant.
#[derive(Debug, Clone)]
pub struct UIResource {
    uri: String,
    mime_kind: MimeKind,
    mime_type: String,
    text: String,
    meta: ResourceMeta,
}

impl UIResource {
    /// Build a resource, rejecting an unrecognized `mime_type`.
    pub fn new(
        uri: impl Into<String>,
        mime_type: impl Into<String>,
        text: impl Into<String>,
        meta: Option<Value>,
    ) -> Result<Self, ServerError> {
        let mime_type = mime_type.into();
        let mime_kind = MimeKind::parse(&mime_type).ok_or_else(|| {
            ServerError::ArgumentValidation(format!("Unrecognized mimeType: {mime_type}"))
        })?;
        Ok(Self {
            uri: uri.into(),
            mime_kind,
            mime_type,
            text: text.into(),
            meta: meta.as_ref().map(ResourceMeta::from_value).unwrap_or_default(),
        })
    }

    /// The resource's stable identifier (`ui://...`).
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// How this resource's `text` should be rendered.
    #[must_use]
    pub const fn mime_kind(&self) -> MimeKind {
        self.mime_kind
    }

    /// The raw `mimeType` string.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The resource payload: HTML, a URI list, or a serialized component
    /// tree, depending on [`Self::mime_kind`].
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Recognized `meta` hints.
    #[must_use]
    pub const fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
}

/// Owns the server's published resources, keyed by `uri`.
#[derive(Default)]
pub struct ResourceStore {
    resources: HashMap<String, UIResource>,
}

impl ResourceStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `resource`, rejecting a `uri` that's already in use.
    pub fn add_resource(&mut self, resource: UIResource) -> Result<(), ServerError> {
        if self.resources.contains_key(resource.uri()) {
            return Err(ServerError::ResourceExists(resource.uri().to_string()));
        }
        self.resources.insert(resource.uri().to_string(), resource);
        Ok(())
    }

    /// All published resources, in no particular order.
    #[must_use]
    pub fn list_resources(&self) -> Vec<&UIResource> {
        self.resources.values().collect()
    }

    /// Look up a resource by `uri`.
    pub fn get_resource(&self, uri: &str) -> Result<&UIResource, ServerError> {
        self.resources
            .get(uri)
            .ok_or_else(|| ServerError::ResourceNotFound(uri.to_string()))
    }

    /// Number of published resources.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_recognized_mime_type() {
        assert_eq!(MimeKind::parse("text/html"), Some(MimeKind::Html));
        assert_eq!(MimeKind::parse("text/uri-list"), Some(MimeKind::UriList));
        assert_eq!(
            MimeKind::parse("application/vnd.mcp-ui.remote-dom+javascript"),
            Some(MimeKind::RemoteDom)
        );
        assert_eq!(MimeKind::parse("application/json"), None);
    }

    #[test]
    fn rejects_unrecognized_mime_type_at_construction() {
        let err = UIResource::new("ui://x", "application/json", "{}", None).unwrap_err();
        assert!(matches!(err, ServerError::ArgumentValidation(_)));
    }

    #[test]
    fn store_rejects_duplicate_uri() {
        let mut store = ResourceStore::new();
        let a = UIResource::new("ui://a", "text/html", "<p>a</p>", None).unwrap();
        let b = UIResource::new("ui://a", "text/html", "<p>b</p>", None).unwrap();
        store.add_resource(a).unwrap();
        let err = store.add_resource(b).unwrap_err();
        assert!(matches!(err, ServerError::ResourceExists(uri) if uri == "ui://a"));
        assert_eq!(store.resource_count(), 1);
    }

    #[test]
    fn get_resource_reports_not_found() {
        let store = ResourceStore::new();
        let err = store.get_resource("ui://missing").unwrap_err();
        assert!(matches!(err, ServerError::ResourceNotFound(uri) if uri == "ui://missing"));
    }

    #[test]
    fn parses_preferred_frame_size_and_remote_dom_hint() {
        let resource = UIResource::new(
            "ui://a",
            "text/html",
            "<p>a</p>",
            Some(serde_json::json!({
                "preferredFrameSize": { "width": 400, "height": 300 },
                "remoteDom": true,
            })),
        )
        .unwrap();
        let meta = resource.meta();
        assert_eq!(
            meta.preferred_frame_size,
            Some(PreferredFrameSize {
                width: 400,
                height: 300
            })
        );
        assert!(meta.remote_dom);
    }
}
