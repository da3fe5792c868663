//! Input widget: an Element Plus `el-input`.

use serde_json::Value;

use crate::component::Node;

/// Property carrying the current value, bound on the client as `v-model`.
pub const MODEL_VALUE: &str = "model-value";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single-line text field.
///
/// The value shown is whatever the server last rendered. Bind an `input` or
/// `change` handler and write the new value into state to keep them in sync.
///
/// # Examples
///
/// ```ignore
/// let name = Input::new()
///     .with_id("name")
///     .placeholder("Your name")
///     .value(state.get_or("name", json!("")))
///     .on("change", set_name);
/// ```
#[derive(Debug)]
pub struct Input {
    node: Node,
}

impl Input {
    pub fn new() -> Self {
        let node = Node::element("input")
            .prop("type", "text")
            .prop("size", "default")
            .prop("disabled", false)
            .prop("readonly", false)
            .prop("clearable", false)
            .prop("show-password", false)
            .prop(MODEL_VALUE, "");
        Self { node }
    }

    /// A password field with a reveal toggle.
    pub fn password() -> Self {
        Self::new().kind("password").prop("show-password", true)
    }

    /// A multi-line text area.
    pub fn textarea() -> Self {
        Self::new().kind("textarea")
    }

    /// text, password, textarea, number, email.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.node.set_prop("type", kind.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.node.set_prop(MODEL_VALUE, value);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        if !placeholder.is_empty() {
            self.node.set_prop("placeholder", placeholder);
        }
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.node.set_prop("size", size.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.node.set_prop("disabled", disabled);
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.node.set_prop("readonly", readonly);
        self
    }

    pub fn clearable(mut self, clearable: bool) -> Self {
        self.node.set_prop("clearable", clearable);
        self
    }

    pub fn maxlength(mut self, max: u32) -> Self {
        self.node.set_prop("maxlength", max);
        self
    }

    pub fn minlength(mut self, min: u32) -> Self {
        self.node.set_prop("minlength", min);
        self
    }

    pub fn prefix_icon(mut self, icon: impl Into<String>) -> Self {
        self.node.set_prop("prefix-icon", icon.into());
        self
    }

    pub fn suffix_icon(mut self, icon: impl Into<String>) -> Self {
        self.node.set_prop("suffix-icon", icon.into());
        self
    }

    /// The rendered value.
    pub fn current_value(&self) -> &Value {
        self.node.property(MODEL_VALUE).unwrap_or(&Value::Null)
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

node_widget!(Input);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Renderable;
    use crate::event::handler::Handler;
    use crate::event::HandlerRegistry;
    use crate::component::Child;
    use serde_json::json;

    #[test]
    fn defaults() {
        let input = Input::new();
        assert_eq!(input.current_value(), &json!(""));
        assert_eq!(input.node().kind().component_name(), "el-input");
        assert_eq!(input.node().property("type"), Some(&json!("text")));
        assert!(input.node().property("placeholder").is_none());
    }

    #[test]
    fn value_and_placeholder() {
        let input = Input::new().value("ada").placeholder("Name").placeholder("");
        assert_eq!(input.current_value(), &json!("ada"));
        assert_eq!(input.node().property("placeholder"), Some(&json!("Name")));
    }

    #[test]
    fn password_variant() {
        let node = Input::password().maxlength(32).into_node();
        assert_eq!(node.property("type"), Some(&json!("password")));
        assert_eq!(node.property("show-password"), Some(&json!(true)));
        assert_eq!(node.property("maxlength"), Some(&json!(32)));
    }

    #[test]
    fn change_handler_is_collected() {
        let roots: Vec<Child> = vec![Input::new()
            .with_id("name")
            .on("change", Handler::new(|_, _| Ok(None)).param("value"))
            .into()];
        let registry = HandlerRegistry::collect(&roots);
        assert!(registry.lookup("name", "change").is_some());
        let payload = roots[0].as_component().unwrap().render().unwrap();
        assert!(payload.events.contains_key("change"));
    }
}
