//! Component model: nodes, children, attributes, the `Renderable` trait.
//!
//! A UI is a forest of [`Child`] values. Component children wrap a
//! [`Renderable`], which in turn exposes its backing [`Node`].

pub mod attrs;
pub mod child;
pub mod node;
pub mod traits;
pub mod tree;

pub use attrs::Attr;
pub use child::Child;
pub use node::{generate_id, Node, NodeKind};
pub use traits::Renderable;
pub use tree::{duplicate_ids, find_by_id, walk_depth_first};
