//! Node types: NodeKind, Node.
//!
//! A [`Node`] carries everything the renderer and dispatcher need: an id,
//! a kind tag, a property bag, an event table, and ordered children. Builder
//! methods consume and return the same node so trees can be written as one
//! fluent expression.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use ulid::Ulid;

use super::attrs::{join_style, Attr};
use super::child::Child;
use crate::event::handler::EventBinding;
use crate::render::payload::{EventInstruction, Payload};
use crate::render::renderer::render_children;
use crate::render::RenderError;

/// Prefix used for generated node ids.
pub const ID_PREFIX: &str = "node_";

/// Property key holding the space-separated CSS class list.
pub const CLASS_KEY: &str = "class";

/// Property key holding the inline style string.
pub const STYLE_KEY: &str = "style";

/// Generate a fresh node id: [`ID_PREFIX`] followed by 8 random characters.
pub fn generate_id() -> String {
    let ulid = Ulid::new().to_string().to_lowercase();
    // The last 16 characters of a ULID are its random component.
    format!("{ID_PREFIX}{}", &ulid[ulid.len() - 8..])
}

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// What a node renders as on the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A pre-built UI library element, emitted as `el-<name>`.
    Element(String),
    /// A raw structural HTML element, emitted under its tag name.
    Html(String),
}

impl NodeKind {
    /// The identifying tag written into the payload's `component` field.
    pub fn component_name(&self) -> String {
        match self {
            Self::Element(name) => format!("el-{name}"),
            Self::Html(tag) => tag.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single component in the server-side UI tree.
#[derive(Debug)]
pub struct Node {
    id: String,
    kind: NodeKind,
    props: Map<String, Value>,
    events: BTreeMap<String, EventBinding>,
    children: Vec<Child>,
}

impl Node {
    /// Create an empty node of the given kind with a generated id.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: generate_id(),
            kind,
            props: Map::new(),
            events: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a UI library element node (`el-<name>`).
    pub fn element(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Element(name.into()))
    }

    /// Create a raw HTML node.
    pub fn html(tag: impl Into<String>) -> Self {
        Self::new(NodeKind::Html(tag.into()))
    }

    /// Create a node from an attribute list.
    ///
    /// `id`, `class` and `style` are handled specially. Keys starting with
    /// `on_` are moved into the event table with the prefix stripped; every
    /// other key lands in the property bag.
    pub fn with_attrs<K, I>(kind: NodeKind, attrs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Attr)>,
    {
        let mut node = Self::new(kind);
        for (key, attr) in attrs {
            node.apply_attr(key.into(), attr);
        }
        node
    }

    fn apply_attr(&mut self, key: String, attr: Attr) {
        if let Some(event) = key.strip_prefix("on_") {
            match attr {
                Attr::Event(binding) => self.set_event(event, binding),
                Attr::Value(Value::String(code)) => {
                    self.set_event(event, EventBinding::Script(code))
                }
                other => {
                    tracing::debug!(key = %key, "non-handler value under an event key, storing as property");
                    self.props.insert(key.clone(), other.into_value());
                }
            }
            return;
        }

        if let Attr::Event(binding) = attr {
            self.set_event(&key, binding);
            return;
        }

        match key.as_str() {
            "id" => self.id = attr.into_text(),
            CLASS_KEY => match attr {
                Attr::Classes(classes) => self.add_classes(classes),
                other => {
                    let text = other.into_text();
                    self.add_classes(text.split_whitespace());
                }
            },
            STYLE_KEY => match attr {
                Attr::Style(pairs) => self.append_style(&join_style(pairs)),
                other => self.append_style(&other.into_text()),
            },
            _ => {
                self.props.insert(key.clone(), attr.into_value());
            }
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The node id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The node kind.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The property bag.
    pub fn properties(&self) -> &Map<String, Value> {
        &self.props
    }

    /// A single property value.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// The event table.
    pub fn events(&self) -> &BTreeMap<String, EventBinding> {
        &self.events
    }

    /// The ordered children.
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// The CSS classes, in insertion order.
    pub fn classes(&self) -> Vec<&str> {
        self.props
            .get(CLASS_KEY)
            .and_then(Value::as_str)
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// The inline style string, if any.
    pub fn style_text(&self) -> Option<&str> {
        self.props.get(STYLE_KEY).and_then(Value::as_str)
    }

    /// Whether this node has a given CSS class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().contains(&class)
    }

    // ── Builders ─────────────────────────────────────────────────────

    /// Set the id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set one property (builder). Last write wins.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Set several properties (builder).
    pub fn props<K, V>(mut self, props: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in props {
            self.props.insert(key.into(), value.into());
        }
        self
    }

    /// Add CSS classes (builder). Duplicates and empty names are ignored.
    pub fn css<S: AsRef<str>>(mut self, classes: impl IntoIterator<Item = S>) -> Self {
        self.add_classes(classes);
        self
    }

    /// Append style declarations (builder).
    pub fn style<K, V>(mut self, styles: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = styles.into_iter().map(|(k, v)| (k.into(), v.into()));
        self.append_style(&join_style(pairs));
        self
    }

    /// Append a raw style string (builder).
    pub fn style_str(mut self, style: impl AsRef<str>) -> Self {
        self.append_style(style.as_ref());
        self
    }

    /// Append a child (builder). Empty children are dropped.
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.push_child(child);
        self
    }

    /// Append several children (builder).
    pub fn with_children<C: Into<Child>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
        for child in children {
            self.push_child(child);
        }
        self
    }

    /// Bind an event (builder). Replaces any existing binding for `event`.
    pub fn on(mut self, event: impl AsRef<str>, binding: impl Into<EventBinding>) -> Self {
        self.set_event(event.as_ref(), binding.into());
        self
    }

    // ── In-place mutation ────────────────────────────────────────────

    /// Replace the id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Set one property in place.
    pub fn set_prop(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.props.insert(key.into(), value.into());
    }

    /// Bind an event in place.
    pub fn set_event(&mut self, event: &str, binding: impl Into<EventBinding>) {
        self.events.insert(event.to_owned(), binding.into());
    }

    /// Append a child in place. Empty children are dropped.
    pub fn push_child(&mut self, child: impl Into<Child>) {
        let child = child.into();
        if !child.is_empty() {
            self.children.push(child);
        }
    }

    /// Add a CSS class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        self.add_classes([class]);
    }

    /// Remove a CSS class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        let remaining: Vec<String> = self
            .classes()
            .into_iter()
            .filter(|c| *c != class)
            .map(str::to_owned)
            .collect();
        self.props
            .insert(CLASS_KEY.to_owned(), Value::String(remaining.join(" ")));
    }

    fn add_classes<S: AsRef<str>>(&mut self, classes: impl IntoIterator<Item = S>) {
        let mut current: Vec<String> = self.classes().into_iter().map(str::to_owned).collect();
        for class in classes {
            let class = class.as_ref().trim();
            if !class.is_empty() && !current.iter().any(|c| c == class) {
                current.push(class.to_owned());
            }
        }
        self.props
            .insert(CLASS_KEY.to_owned(), Value::String(current.join(" ")));
    }

    fn append_style(&mut self, style: &str) {
        let style = style.trim().trim_end_matches(';').trim();
        if style.is_empty() {
            return;
        }
        let merged = match self.style_text() {
            Some(current) if !current.is_empty() => format!("{current}; {style}"),
            _ => style.to_owned(),
        };
        self.props.insert(STYLE_KEY.to_owned(), Value::String(merged));
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Produce the payload record for this node, rendering children recursively.
    ///
    /// Children that fail to render are logged and skipped.
    pub fn render_payload(&self) -> Result<Payload, RenderError> {
        Ok(Payload {
            id: self.id.clone(),
            component: self.kind.component_name(),
            props: self.props.clone(),
            events: self.event_instructions(),
            children: render_children(&self.children),
        })
    }

    /// Translate the event table into client instructions.
    pub fn event_instructions(&self) -> BTreeMap<String, EventInstruction> {
        self.events
            .iter()
            .map(|(name, binding)| {
                let instruction = match binding {
                    EventBinding::Handler(_) => EventInstruction::Dispatch {
                        component_id: self.id.clone(),
                        event: name.clone(),
                    },
                    EventBinding::Script(code) => EventInstruction::Script { code: code.clone() },
                };
                (name.clone(), instruction)
            })
            .collect()
    }
}
