//! [`RemoteDomComponent`]: the serialized shape of one remote-DOM node.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RemoteDomError;

/// `meta.preferredFrameSize` — width/height hints for the element a
/// component renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredFrameSize {
    pub width: u32,
    pub height: u32,
}

/// Optional metadata carried alongside a component's own fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_frame_size: Option<PreferredFrameSize>,
}

/// A component's children: a text leaf, or a recursively-serialized list
/// of child components.
///
/// Untagged: the wire format distinguishes the two cases by shape (string
/// vs. array), matching `typeof children === 'string'` in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    Text(String),
    Nodes(Vec<RemoteDomComponent>),
}

/// One node in a serialized remote-DOM tree, per §4.C's public contract.
///
/// `id`, `type`, `props`, and `children` are all required on the wire —
/// [`RemoteDomComponent::deserialize`] rejects anything missing one of
/// them, matching "rejects malformed input."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDomComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub props: Map<String, Value>,
    pub children: Children,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ComponentMeta>,
}

impl RemoteDomComponent {
    /// A leaf text node: `type` with no props and a single text child.
    #[must_use]
    pub fn text(id: impl Into<String>, kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            props: Map::new(),
            children: Children::Text(text.into()),
            meta: None,
        }
    }

    /// A container node with `children` as its sub-tree.
    #[must_use]
    pub fn container(
        id: impl Into<String>,
        kind: impl Into<String>,
        children: Vec<RemoteDomComponent>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            props: Map::new(),
            children: Children::Nodes(children),
            meta: None,
        }
    }

    /// JSON-serialize this component tree.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteDomError::Malformed`] if serialization fails (only
    /// possible for non-UTF-8 map keys, which `serde_json` itself forbids
    /// at construction).
    pub fn serialize(&self) -> Result<String, RemoteDomError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a component tree from JSON text.
    ///
    /// Every node must carry `id`/`type`/`props`/`children`; an id
    /// encountered twice while walking the tree top-down is rejected as a
    /// cycle guard (trees are asserted acyclic — see Design Notes).
    ///
    /// # Errors
    ///
    /// Returns [`RemoteDomError::Malformed`] if `text` doesn't parse, or
    /// [`RemoteDomError::DuplicateId`] if an id repeats.
    pub fn deserialize(text: &str) -> Result<Self, RemoteDomError> {
        let component: RemoteDomComponent = serde_json::from_str(text)?;
        let mut seen = HashSet::new();
        check_acyclic(&component, &mut seen)?;
        Ok(component)
    }

    /// All descendant ids plus this node's own id, depth-first.
    pub(super) fn walk_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.id);
        if let Children::Nodes(children) = &self.children {
            for child in children {
                child.walk_ids(out);
            }
        }
    }
}

fn check_acyclic(component: &RemoteDomComponent, seen: &mut HashSet<String>) -> Result<(), RemoteDomError> {
    if !seen.insert(component.id.clone()) {
        return Err(RemoteDomError::DuplicateId(component.id.clone()));
    }
    if let Children::Nodes(children) = &component.children {
        for child in children {
            check_acyclic(child, seen)?;
        }
    }
    Ok(())
}
