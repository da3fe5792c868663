//! The `Renderable` trait.
//!
//! Anything that can sit in a component tree implements `Renderable`: it
//! exposes its backing [`Node`] (used for tree walks and handler collection)
//! and renders itself into a payload record. Widgets usually only implement
//! [`Renderable::node`] and inherit the default `render`.

use super::node::Node;
use crate::render::payload::Payload;
use crate::render::RenderError;

// ---------------------------------------------------------------------------
// Renderable
// ---------------------------------------------------------------------------

/// Core trait implemented by every component in a trellis tree.
///
/// Object-safe so trees can hold `Box<dyn Renderable>`. `Send + Sync` so a
/// built tree can be handed across tokio tasks.
pub trait Renderable: Send + Sync {
    /// The node backing this component.
    fn node(&self) -> &Node;

    /// Produce the payload record for this component.
    ///
    /// The default renders the backing node. Overrides may post-process the
    /// payload or fail; a failure causes the surrounding collector to skip
    /// this component.
    fn render(&self) -> Result<Payload, RenderError> {
        self.node().render_payload()
    }
}

impl Renderable for Node {
    fn node(&self) -> &Node {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Child;

    struct Broken(Node);

    impl Renderable for Broken {
        fn node(&self) -> &Node {
            &self.0
        }

        fn render(&self) -> Result<Payload, RenderError> {
            Err(RenderError::Component {
                id: self.0.id().to_owned(),
                message: "boom".into(),
            })
        }
    }

    #[test]
    fn node_renders_itself() {
        let node = Node::html("p").with_id("p1");
        assert_eq!(Renderable::render(&node).unwrap().id, "p1");
    }

    #[test]
    fn failing_child_is_skipped_but_siblings_render() {
        let parent = Node::html("div")
            .child(Node::html("span").with_id("ok1"))
            .child(Child::component(Broken(Node::html("span").with_id("bad"))))
            .child(Node::html("span").with_id("ok2"));
        let payload = parent.render_payload().unwrap();
        let ids: Vec<_> = payload
            .children
            .iter()
            .filter_map(|c| c.as_node().map(|p| p.id.as_str()))
            .collect();
        assert_eq!(ids, vec!["ok1", "ok2"]);
    }
}
