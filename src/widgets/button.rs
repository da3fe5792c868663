//! Button widget: an Element Plus `el-button`.

use crate::component::Node;

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// A clickable button with a text label.
///
/// # Examples
///
/// ```ignore
/// let save = Button::primary("Save").with_id("save").on("click", handler);
/// let locked = Button::new("Locked").disabled(true);
/// ```
#[derive(Debug)]
pub struct Button {
    node: Node,
}

impl Button {
    /// A default-styled button. An empty label adds no text child.
    pub fn new(text: impl Into<String>) -> Self {
        let node = Node::element("button")
            .prop("type", "default")
            .prop("size", "default")
            .prop("disabled", false)
            .prop("loading", false)
            .prop("plain", false)
            .prop("round", false)
            .prop("circle", false)
            .child(text.into());
        Self { node }
    }

    pub fn primary(text: impl Into<String>) -> Self {
        Self::new(text).kind("primary")
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text).kind("success")
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text).kind("warning")
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self::new(text).kind("danger")
    }

    /// Button type: primary, success, warning, danger, info, text, default.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.node.set_prop("type", kind.into());
        self
    }

    /// large, default, small.
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.node.set_prop("size", size.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.node.set_prop("disabled", disabled);
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.node.set_prop("loading", loading);
        self
    }

    pub fn plain(mut self, plain: bool) -> Self {
        self.node.set_prop("plain", plain);
        self
    }

    pub fn round(mut self, round: bool) -> Self {
        self.node.set_prop("round", round);
        self
    }

    pub fn circle(mut self, circle: bool) -> Self {
        self.node.set_prop("circle", circle);
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.node.set_prop("icon", icon.into());
        self
    }

    /// Whether the button is disabled.
    pub fn is_disabled(&self) -> bool {
        self.node
            .property("disabled")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

node_widget!(Button);
