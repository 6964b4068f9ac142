//! Id-keyed reconciliation between two component trees.

use std::collections::HashMap;

use super::RemoteDomComponent;

/// One step of a reconciliation diff, keyed by component id.
///
/// Reconciliation is position-independent — only `id` matters, so there's
/// no `path` field; a flat id is enough to locate the affected node in
/// the renderer's internal component map.
#[derive(Debug, Clone, PartialEq)]
pub enum Diff {
    /// `id` is present in the new tree but absent from the old one.
    Insert {
        id: String,
        component: RemoteDomComponent,
    },
    /// `id` is present in both trees, but the components differ.
    Update {
        id: String,
        component: RemoteDomComponent,
    },
    /// `id` is present in the old tree but absent from the new one.
    Remove { id: String },
}

impl Diff {
    /// The id this diff step is keyed on, regardless of variant.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Insert { id, .. } | Self::Update { id, .. } | Self::Remove { id } => id,
        }
    }
}

/// Flatten a forest into an id-keyed map, depth-first, including every
/// descendant — not just the top-level roots. Reconciliation operates on
/// the whole tree, not just its top level.
fn flatten(roots: &[RemoteDomComponent]) -> HashMap<&str, &RemoteDomComponent> {
    let mut map = HashMap::new();
    let mut stack: Vec<&RemoteDomComponent> = roots.iter().collect();
    while let Some(component) = stack.pop() {
        map.insert(component.id.as_str(), component);
        if let super::Children::Nodes(children) = &component.children {
            stack.extend(children.iter());
        }
    }
    map
}

/// Flatten a forest into depth-first order, for diff ordering.
fn flatten_ordered(roots: &[RemoteDomComponent]) -> Vec<&RemoteDomComponent> {
    let mut out = Vec::new();
    fn visit<'a>(component: &'a RemoteDomComponent, out: &mut Vec<&'a RemoteDomComponent>) {
        out.push(component);
        if let super::Children::Nodes(children) = &component.children {
            for child in children {
                visit(child, out);
            }
        }
    }
    for root in roots {
        visit(root, &mut out);
    }
    out
}

/// Compute the diff that turns `old` into `new`, by id.
///
/// Structural equality between components of the same id uses derived
/// `PartialEq` (field-by-field, recursive) rather than re-serializing both
/// sides to compare strings — same observable result as the canonical
/// `JSON.stringify` comparison the original algorithm used, without the
/// repeated re-serialization cost.
#[must_use]
pub fn reconcile_tree(old: &[RemoteDomComponent], new: &[RemoteDomComponent]) -> Vec<Diff> {
    let old_map = flatten(old);
    let new_map = flatten(new);

    let mut diffs = Vec::new();

    for component in flatten_ordered(new) {
        match old_map.get(component.id.as_str()) {
            None => diffs.push(Diff::Insert {
                id: component.id.clone(),
                component: component.clone(),
            }),
            Some(old_component) if *old_component != component => diffs.push(Diff::Update {
                id: component.id.clone(),
                component: component.clone(),
            }),
            Some(_) => {}
        }
    }

    for component in flatten_ordered(old) {
        if !new_map.contains_key(component.id.as_str()) {
            diffs.push(Diff::Remove {
                id: component.id.clone(),
            });
        }
    }

    diffs
}

/// Apply `diffs` to a flattened id-keyed component map, as
/// [`super::RemoteDomRenderer`] does to its internal state after
/// reconciling. Exposed so tests can assert
/// `apply_diffs(flatten(old), reconcile_tree(old, new)) == flatten(new)`.
pub fn apply_diffs(map: &mut HashMap<String, RemoteDomComponent>, diffs: &[Diff]) {
    for diff in diffs {
        match diff {
            Diff::Insert { id, component } | Diff::Update { id, component } => {
                map.insert(id.clone(), component.clone());
            }
            Diff::Remove { id } => {
                map.remove(id);
            }
        }
    }
}
