//! [`RenderSink`]: the Rust stand-in for "a thing that can create
//! elements, set attributes, set text, and reorder/remove children" (see
//! `SPEC_FULL.md` §1). [`RemoteDomRenderer`] drives a sink from a
//! serialized component tree.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::action::{sanitize_params, ActionMessage};

use super::reconcile::{apply_diffs, reconcile_tree, Diff};
use super::{Children, RemoteDomComponent, RemoteDomError};

/// A thing that can create elements, set attributes, set text, and
/// remove children — the minimal surface [`RemoteDomRenderer`] needs from
/// a real DOM or an in-memory stand-in.
///
/// Deliberately synchronous: DOM mutation is single-threaded in every host
/// this crate targets (see `SPEC_FULL.md` §1).
pub trait RenderSink: Send {
    /// Create an element of the given kind, addressable by `id` in every
    /// later call.
    fn create_element(&mut self, id: &str, kind: &str) -> Result<(), RemoteDomError>;

    /// Set a non-event attribute on an existing element.
    fn set_attribute(&mut self, id: &str, key: &str, value: &Value) -> Result<(), RemoteDomError>;

    /// Set an element's text content, replacing any children.
    fn set_text(&mut self, id: &str, text: &str) -> Result<(), RemoteDomError>;

    /// Set an element's child element ids, in order.
    fn set_children(&mut self, id: &str, child_ids: &[String]) -> Result<(), RemoteDomError>;

    /// Remove an element and everything it owns.
    fn remove(&mut self, id: &str) -> Result<(), RemoteDomError>;
}

/// One element as [`RecordingSink`] materializes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedElement {
    pub kind: String,
    pub attributes: Map<String, Value>,
    pub text: Option<String>,
    pub children: Vec<String>,
}

/// An in-memory [`RenderSink`] that mirrors what a real DOM would look
/// like, for tests and for any host without a real browser.
#[derive(Debug, Default)]
pub struct RecordingSink {
    elements: HashMap<String, RecordedElement>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded element at `id`, if any.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&RecordedElement> {
        self.elements.get(id)
    }

    /// How many elements are currently recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl RenderSink for RecordingSink {
    fn create_element(&mut self, id: &str, kind: &str) -> Result<(), RemoteDomError> {
        self.elements.insert(
            id.to_string(),
            RecordedElement {
                kind: kind.to_string(),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn set_attribute(&mut self, id: &str, key: &str, value: &Value) -> Result<(), RemoteDomError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| RemoteDomError::ReconcileMalformed(id.to_string()))?;
        element.attributes.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), RemoteDomError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| RemoteDomError::ReconcileMalformed(id.to_string()))?;
        element.text = Some(text.to_string());
        element.children.clear();
        Ok(())
    }

    fn set_children(&mut self, id: &str, child_ids: &[String]) -> Result<(), RemoteDomError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| RemoteDomError::ReconcileMalformed(id.to_string()))?;
        element.children = child_ids.to_vec();
        element.text = None;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<(), RemoteDomError> {
        self.elements.remove(id);
        Ok(())
    }
}

/// `true` if `name` is a valid DOM element name: an ASCII letter followed
/// by letters, digits, or hyphens (covers both plain tags like `div` and
/// custom-element names like `my-widget`).
fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// `true` if `key` follows the `on*` event-handler naming convention
/// (`onClick`, `onSubmit`, ...): `on` followed by an uppercase letter.
/// Excludes ordinary props that merely start with "on" (`once`, `online`).
fn is_event_prop(key: &str) -> bool {
    key.len() > 2 && key.starts_with("on") && key.as_bytes()[2].is_ascii_uppercase()
}

type Subscriber = Box<dyn Fn(&RemoteDomComponent) + Send + Sync>;
type SubscriberMap = Arc<Mutex<HashMap<String, HashMap<u64, Subscriber>>>>;

/// Receives an [`ActionMessage::Intent`] whenever a bound `on*` handler
/// fires, standing in for "emit Intents through the host bridge."
pub type IntentCallback = Box<dyn Fn(ActionMessage) + Send + Sync>;

/// Drives a [`RenderSink`] from serialized component trees: creates
/// elements, applies reconciliation diffs, and notifies per-id
/// subscribers, per §4.C's public contract.
pub struct RemoteDomRenderer<S: RenderSink> {
    sink: S,
    components: HashMap<String, RemoteDomComponent>,
    subscribers: SubscriberMap,
    next_subscriber_id: AtomicU64,
    intent_sink: Option<IntentCallback>,
    disposed: AtomicBool,
}

impl<S: RenderSink> RemoteDomRenderer<S> {
    /// Build a renderer over `sink` with no intent callback attached.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            components: HashMap::new(),
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_subscriber_id: AtomicU64::new(0),
            intent_sink: None,
            disposed: AtomicBool::new(false),
        }
    }

    /// Build a renderer that routes `on*` handler firings to `intent_sink`.
    #[must_use]
    pub fn with_intent_sink(sink: S, intent_sink: IntentCallback) -> Self {
        Self {
            intent_sink: Some(intent_sink),
            ..Self::new(sink)
        }
    }

    fn check_not_disposed(&self) -> Result<(), RemoteDomError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(RemoteDomError::DisposedRenderer);
        }
        Ok(())
    }

    /// Recursively create elements for `root` and its descendants,
    /// returning the root element's id. Props are applied as attributes,
    /// except `on*` handlers, which are bound for later intent dispatch
    /// instead, and `meta.preferredFrameSize`, which sets `width`/`height`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteDomError::DisposedRenderer`] if called after
    /// [`Self::dispose`], or [`RemoteDomError::InvalidElementType`] if a
    /// component's `type` isn't a valid element name.
    pub fn render_remote(&mut self, root: &RemoteDomComponent) -> Result<String, RemoteDomError> {
        self.check_not_disposed()?;
        self.materialize(root)?;
        Ok(root.id.clone())
    }

    fn materialize(&mut self, component: &RemoteDomComponent) -> Result<(), RemoteDomError> {
        if !is_valid_element_name(&component.kind) {
            return Err(RemoteDomError::InvalidElementType(component.kind.clone()));
        }

        self.sink.create_element(&component.id, &component.kind)?;

        for (key, value) in &component.props {
            if is_event_prop(key) {
                continue;
            }
            self.sink.set_attribute(&component.id, key, value)?;
        }

        if let Some(meta) = &component.meta {
            if let Some(size) = meta.preferred_frame_size {
                self.sink
                    .set_attribute(&component.id, "width", &Value::from(size.width))?;
                self.sink
                    .set_attribute(&component.id, "height", &Value::from(size.height))?;
            }
        }

        match &component.children {
            Children::Text(text) => self.sink.set_text(&component.id, text)?,
            Children::Nodes(children) => {
                for child in children {
                    self.materialize(child)?;
                }
                let child_ids: Vec<String> = children.iter().map(|c| c.id.clone()).collect();
                self.sink.set_children(&component.id, &child_ids)?;
            }
        }

        self.components.insert(component.id.clone(), component.clone());
        Ok(())
    }

    /// Reconcile `old` against `new`, apply the resulting diffs to the
    /// sink and the internal component map, and notify subscribers of
    /// every changed id. Returns the diffs applied.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteDomError::DisposedRenderer`] if called after
    /// [`Self::dispose`].
    pub fn reconcile_and_apply(
        &mut self,
        old: &[RemoteDomComponent],
        new: &[RemoteDomComponent],
    ) -> Result<Vec<Diff>, RemoteDomError> {
        self.check_not_disposed()?;
        let diffs = reconcile_tree(old, new);

        for diff in &diffs {
            match diff {
                Diff::Insert { component, .. } => self.materialize(component)?,
                Diff::Update { id, component } => {
                    self.materialize(component)?;
                    self.notify(id, component);
                }
                Diff::Remove { id } => {
                    self.sink.remove(id)?;
                    self.components.remove(id);
                    self.subscribers.lock().unwrap().remove(id);
                }
            }
        }

        Ok(diffs)
    }

    /// Shallow-merge `partial` into the component at `id`'s props, apply
    /// the merged props to the sink, and notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteDomError::DisposedRenderer`] if disposed, or
    /// [`RemoteDomError::ReconcileMalformed`] if `id` isn't known.
    pub fn update_component(&mut self, id: &str, partial: Map<String, Value>) -> Result<(), RemoteDomError> {
        self.check_not_disposed()?;
        let component = self
            .components
            .get_mut(id)
            .ok_or_else(|| RemoteDomError::ReconcileMalformed(id.to_string()))?;

        for (key, value) in partial {
            if is_event_prop(&key) {
                continue;
            }
            component.props.insert(key, value);
        }

        let updated = component.clone();
        for (key, value) in &updated.props {
            if !is_event_prop(key) {
                self.sink.set_attribute(id, key, value)?;
            }
        }

        self.notify(id, &updated);
        Ok(())
    }

    /// Subscribe to updates on `id`, returning an unsubscribe closure.
    pub fn on_update(
        &self,
        id: impl Into<String>,
        callback: impl Fn(&RemoteDomComponent) + Send + Sync + 'static,
    ) -> Box<dyn Fn() + Send> {
        let id = id.into();
        let subscriber_id = self.next_subscriber_id.fetch_add(1, Ordering::SeqCst);

        self.subscribers
            .lock()
            .unwrap()
            .entry(id.clone())
            .or_default()
            .insert(subscriber_id, Box::new(callback));

        let subscribers = Arc::clone(&self.subscribers);
        Box::new(move || {
            if let Some(by_id) = subscribers.lock().unwrap().get_mut(&id) {
                by_id.remove(&subscriber_id);
            }
        })
    }

    fn notify(&self, id: &str, component: &RemoteDomComponent) {
        if let Some(by_id) = self.subscribers.lock().unwrap().get(id) {
            for callback in by_id.values() {
                callback(component);
            }
        }
    }

    /// Dispatch a DOM event a host observed on a bound `on*` handler,
    /// routing it to the intent callback (if any) as
    /// [`ActionMessage::Intent`].
    pub fn dispatch_event(&self, event: &str, data: Option<Map<String, Value>>) {
        if let Some(intent_sink) = &self.intent_sink {
            let data = data.map(|obj| {
                sanitize_params(&obj)
                    .into_iter()
                    .collect::<std::collections::BTreeMap<_, _>>()
            });
            intent_sink(ActionMessage::Intent {
                intent: event.to_string(),
                data,
            });
        }
    }

    /// Drop every tracked component and element reference without
    /// disposing the renderer.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteDomError::DisposedRenderer`] if already disposed.
    pub fn clear(&mut self) -> Result<(), RemoteDomError> {
        self.check_not_disposed()?;
        let ids: Vec<String> = self.components.keys().cloned().collect();
        for id in ids {
            self.sink.remove(&id)?;
        }
        self.components.clear();
        self.subscribers.lock().unwrap().clear();
        Ok(())
    }

    /// Terminal: clear everything and mark the renderer disposed. Every
    /// subsequent operation short-circuits with
    /// [`RemoteDomError::DisposedRenderer`].
    ///
    /// # Errors
    ///
    /// Returns [`RemoteDomError::DisposedRenderer`] if already disposed.
    pub fn dispose(&mut self) -> Result<(), RemoteDomError> {
        self.clear()?;
        self.disposed.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// `true` once [`Self::dispose`] has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// The sink this renderer drives, for tests that want to inspect what
    /// was recorded.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
