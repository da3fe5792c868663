//! Construction attributes.
//!
//! [`Attr`] is the value side of the attribute list accepted by
//! [`Node::with_attrs`](super::Node::with_attrs): plain JSON values, class
//! lists, style mappings, and event bindings all travel through the same list
//! and are sorted into the right table at construction time.

use serde_json::Value;

use crate::event::handler::{EventBinding, Handler};

/// A single construction attribute value.
#[derive(Debug, Clone)]
pub enum Attr {
    /// A plain property value.
    Value(Value),
    /// A list of CSS classes.
    Classes(Vec<String>),
    /// A style mapping, kept in the order given.
    Style(Vec<(String, String)>),
    /// An event binding.
    Event(EventBinding),
}

impl Attr {
    /// A class-list attribute.
    pub fn classes<S: Into<String>>(classes: impl IntoIterator<Item = S>) -> Self {
        Self::Classes(classes.into_iter().map(Into::into).collect())
    }

    /// A style-mapping attribute.
    pub fn style<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Style(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Collapse into a JSON value for the property bag.
    pub fn into_value(self) -> Value {
        match self {
            Self::Value(value) => value,
            Self::Classes(classes) => Value::String(classes.join(" ")),
            Self::Style(pairs) => Value::String(join_style(pairs)),
            Self::Event(EventBinding::Script(code)) => Value::String(code),
            Self::Event(EventBinding::Handler(_)) => Value::Null,
        }
    }

    /// Collapse into text. Strings are taken verbatim, other values use their
    /// JSON form.
    pub fn into_text(self) -> String {
        match self.into_value() {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }
}

/// Join a style mapping into `key: value; key: value` form.
pub fn join_style(pairs: impl IntoIterator<Item = (String, String)>) -> String {
    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Value> for Attr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Attr {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_owned()))
    }
}

impl From<String> for Attr {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<&String> for Attr {
    fn from(value: &String) -> Self {
        Self::Value(Value::String(value.clone()))
    }
}

macro_rules! attr_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Attr {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

attr_from_scalar!(bool, i32, i64, u32, u64, usize, f64);

impl From<Handler> for Attr {
    fn from(handler: Handler) -> Self {
        Self::Event(EventBinding::Handler(handler))
    }
}

impl From<EventBinding> for Attr {
    fn from(binding: EventBinding) -> Self {
        Self::Event(binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_style_keeps_order() {
        let s = join_style(vec![
            ("color".to_owned(), "red".to_owned()),
            ("margin".to_owned(), "0".to_owned()),
        ]);
        assert_eq!(s, "color: red; margin: 0");
    }

    #[test]
    fn into_value_collapses_lists() {
        assert_eq!(Attr::classes(["a", "b"]).into_value(), json!("a b"));
        assert_eq!(Attr::style([("top", "1px")]).into_value(), json!("top: 1px"));
    }

    #[test]
    fn into_text_uses_json_for_non_strings() {
        assert_eq!(Attr::from(7).into_text(), "7");
        assert_eq!(Attr::from("x").into_text(), "x");
        assert_eq!(Attr::from(true).into_text(), "true");
    }

    #[test]
    fn scalar_conversions() {
        assert!(matches!(Attr::from(1.5), Attr::Value(Value::Number(_))));
        assert!(matches!(Attr::from(false), Attr::Value(Value::Bool(false))));
    }
}
