//! The closed set of things a node can hold as a child.

use std::fmt;

use serde_json::Number;

use super::node::Node;
use super::traits::Renderable;

/// One entry in a node's child list.
pub enum Child {
    /// A nested component.
    Component(Box<dyn Renderable>),
    /// A literal text leaf.
    Text(String),
    /// A literal numeric leaf.
    Number(Number),
    /// A literal boolean leaf.
    Bool(bool),
    /// A nested sequence, flattened into the parent at render time.
    Fragment(Vec<Child>),
    /// Nothing. Dropped at render time.
    Empty,
}

impl Child {
    /// Wrap any renderable value.
    pub fn component<R: Renderable + 'static>(component: R) -> Self {
        Self::Component(Box::new(component))
    }

    /// Whether this child renders to nothing: `Empty`, an empty string, or a
    /// fragment whose entries are all empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Fragment(items) => items.iter().all(Child::is_empty),
            Self::Component(_) | Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// The component, if this child is one.
    pub fn as_component(&self) -> Option<&dyn Renderable> {
        match self {
            Self::Component(component) => Some(component.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Debug for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component(component) => f.debug_tuple("Component").field(component.node()).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Fragment(items) => f.debug_tuple("Fragment").field(items).finish(),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Self::Component(Box::new(node))
    }
}

impl From<Box<dyn Renderable>> for Child {
    fn from(component: Box<dyn Renderable>) -> Self {
        Self::Component(component)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for Child {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl From<bool> for Child {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! child_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Child {
                fn from(value: $ty) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

child_from_integer!(i32, i64, u32, u64, usize);

impl From<f64> for Child {
    /// Non-finite values have no JSON form and become `Empty`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Empty, Self::Number)
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(items: Vec<T>) -> Self {
        Self::Fragment(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl From<()> for Child {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}
