//! Built-in widgets: Button, Text, Title, Paragraph, Row, Col, Card, Divider,
//! Input.
//!
//! Every widget wraps a [`Node`](crate::component::Node), implements
//! [`Renderable`](crate::component::Renderable), and converts into a
//! [`Child`](crate::component::Child).

/// Implement the shared widget plumbing for a struct with a `node: Node` field.
macro_rules! node_widget {
    ($ty:ty) => {
        impl $ty {
            /// Set the id (builder).
            pub fn with_id(mut self, id: impl Into<String>) -> Self {
                self.node.set_id(id);
                self
            }

            /// Add CSS classes (builder).
            pub fn css<S: AsRef<str>>(mut self, classes: impl IntoIterator<Item = S>) -> Self {
                self.node = self.node.css(classes);
                self
            }

            /// Append style declarations (builder).
            pub fn style<K, V>(mut self, styles: impl IntoIterator<Item = (K, V)>) -> Self
            where
                K: Into<String>,
                V: Into<String>,
            {
                self.node = self.node.style(styles);
                self
            }

            /// Set an arbitrary property (builder).
            pub fn prop(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
                self.node.set_prop(key, value);
                self
            }

            /// Bind an event (builder).
            pub fn on(
                mut self,
                event: impl AsRef<str>,
                binding: impl Into<$crate::event::handler::EventBinding>,
            ) -> Self {
                self.node.set_event(event.as_ref(), binding);
                self
            }

            /// Unwrap the backing node.
            pub fn into_node(self) -> $crate::component::Node {
                self.node
            }
        }

        impl $crate::component::Renderable for $ty {
            fn node(&self) -> &$crate::component::Node {
                &self.node
            }
        }

        impl From<$ty> for $crate::component::Child {
            fn from(widget: $ty) -> Self {
                $crate::component::Child::component(widget)
            }
        }
    };
}

pub mod button;
pub mod input;
pub mod layout;
pub mod text;

pub use button::Button;
pub use input::Input;
pub use layout::{Card, Col, Divider, Row};
pub use text::{Paragraph, Text, Title};
