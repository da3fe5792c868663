//! Typography widgets: Text, Title, Paragraph.

use crate::component::{Child, Node};

/// Inline font styles applied to titles, indexed by level - 1.
const TITLE_STYLES: [&str; 6] = [
    "font-size: 2em; margin: 0.67em 0; font-weight: bold",
    "font-size: 1.5em; margin: 0.83em 0; font-weight: bold",
    "font-size: 1.17em; margin: 1em 0; font-weight: bold",
    "font-size: 1em; margin: 1.33em 0; font-weight: bold",
    "font-size: 0.83em; margin: 1.67em 0; font-weight: bold",
    "font-size: 0.67em; margin: 2.33em 0; font-weight: bold",
];

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// An inline run of text, rendered as a `span`.
///
/// # Examples
///
/// ```ignore
/// let label = Text::new(format!("Count: {count}")).with_id("label");
/// ```
#[derive(Debug)]
pub struct Text {
    node: Node,
}

impl Text {
    pub fn new(content: impl Into<Child>) -> Self {
        Self {
            node: Node::html("span").child(content),
        }
    }

    /// Render in bold.
    pub fn bold(mut self) -> Self {
        self.node = self.node.style([("font-weight", "bold")]);
        self
    }

    /// Set the text colour.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.node = self.node.style([("color", color.into())]);
        self
    }
}

node_widget!(Text);

// ---------------------------------------------------------------------------
// Title
// ---------------------------------------------------------------------------

/// A heading, rendered as `h1` through `h6`.
#[derive(Debug)]
pub struct Title {
    node: Node,
    level: u8,
}

impl Title {
    /// A heading at `level`, clamped to 1..=6.
    pub fn new(content: impl Into<Child>, level: u8) -> Self {
        let level = level.clamp(1, 6);
        let node = Node::html(format!("h{level}"))
            .style_str(TITLE_STYLES[usize::from(level - 1)])
            .child(content);
        Self { node, level }
    }

    pub fn h1(content: impl Into<Child>) -> Self {
        Self::new(content, 1)
    }

    pub fn h2(content: impl Into<Child>) -> Self {
        Self::new(content, 2)
    }

    pub fn h3(content: impl Into<Child>) -> Self {
        Self::new(content, 3)
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}

node_widget!(Title);

// ---------------------------------------------------------------------------
// Paragraph
// ---------------------------------------------------------------------------

/// A block of text, rendered as `p`.
#[derive(Debug)]
pub struct Paragraph {
    node: Node,
}

impl Paragraph {
    pub fn new(content: impl Into<Child>) -> Self {
        Self {
            node: Node::html("p").child(content),
        }
    }

    /// Append more inline content.
    pub fn push(mut self, content: impl Into<Child>) -> Self {
        self.node.push_child(content);
        self
    }
}

node_widget!(Paragraph);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Renderable;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_is_a_span() {
        let payload = Text::new("hello").with_id("t").bold().render().unwrap();
        assert_eq!(payload.component, "span");
        assert_eq!(payload.text(), "hello");
        assert_eq!(payload.props["style"], "font-weight: bold");
    }

    #[test]
    fn numbers_render_as_literals() {
        let payload = Text::new(7).render().unwrap();
        assert_eq!(payload.children[0].as_literal(), Some(&serde_json::json!(7)));
    }

    #[test]
    fn title_levels_clamp() {
        assert_eq!(Title::new("x", 0).level(), 1);
        assert_eq!(Title::new("x", 9).level(), 6);
        let payload = Title::h2("Section").render().unwrap();
        assert_eq!(payload.component, "h2");
        assert!(payload.props["style"]
            .as_str()
            .is_some_and(|style| style.starts_with("font-size: 1.5em")));
    }

    #[test]
    fn paragraph_collects_inline_content() {
        let payload = Paragraph::new("a ")
            .push(Text::new("b").with_id("b"))
            .push(" c")
            .render()
            .unwrap();
        assert_eq!(payload.component, "p");
        assert_eq!(payload.children.len(), 3);
        assert_eq!(payload.text(), "a b c");
        assert_eq!(payload.find("b").map(|b| b.text()), Some("b".to_owned()));
    }
}
