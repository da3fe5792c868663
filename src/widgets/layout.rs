//! Layout widgets: Row, Col, Card, Divider.
//!
//! These map onto the Element Plus grid (`el-row`, `el-col`) and container
//! elements. A row is divided into 24 columns.

use crate::component::{Child, Node};

/// Number of grid columns in a row.
pub const GRID_COLUMNS: u32 = 24;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// A horizontal grid row.
///
/// # Examples
///
/// ```ignore
/// let row = Row::new()
///     .gutter(20)
///     .child(Col::new(12).child(Text::new("left")))
///     .child(Col::new(12).child(Text::new("right")));
/// ```
#[derive(Debug)]
pub struct Row {
    node: Node,
}

impl Row {
    pub fn new() -> Self {
        let node = Node::element("row")
            .prop("gutter", 0)
            .prop("justify", "start")
            .prop("align", "top");
        Self { node }
    }

    /// Spacing between columns, in pixels.
    pub fn gutter(mut self, gutter: u32) -> Self {
        self.node.set_prop("gutter", gutter);
        self
    }

    /// start, end, center, space-around, space-between, space-evenly.
    pub fn justify(mut self, justify: impl Into<String>) -> Self {
        self.node.set_prop("justify", justify.into());
        self
    }

    /// top, middle, bottom.
    pub fn align(mut self, align: impl Into<String>) -> Self {
        self.node.set_prop("align", align.into());
        self
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.node.push_child(child);
        self
    }

    pub fn with_children<C: Into<Child>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
        self.node = self.node.with_children(children);
        self
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

node_widget!(Row);

// ---------------------------------------------------------------------------
// Col
// ---------------------------------------------------------------------------

/// A grid column spanning `span` of the row's 24 columns.
#[derive(Debug)]
pub struct Col {
    node: Node,
}

impl Col {
    /// A column of the given span, clamped to 1..=24.
    pub fn new(span: u32) -> Self {
        let node = Node::element("col")
            .prop("span", span.clamp(1, GRID_COLUMNS))
            .prop("offset", 0);
        Self { node }
    }

    /// A column spanning the whole row.
    pub fn full() -> Self {
        Self::new(GRID_COLUMNS)
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.node.set_prop("offset", offset.min(GRID_COLUMNS));
        self
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.node.push_child(child);
        self
    }
}

node_widget!(Col);

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A bordered container with an optional header.
#[derive(Debug)]
pub struct Card {
    node: Node,
}

impl Card {
    pub fn new() -> Self {
        Self {
            node: Node::element("card").prop("shadow", "always"),
        }
    }

    /// Header text shown above the body.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.node.set_prop("header", header.into());
        self
    }

    /// always, hover, never.
    pub fn shadow(mut self, shadow: impl Into<String>) -> Self {
        self.node.set_prop("shadow", shadow.into());
        self
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.node.push_child(child);
        self
    }

    pub fn with_children<C: Into<Child>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
        self.node = self.node.with_children(children);
        self
    }
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

node_widget!(Card);

// ---------------------------------------------------------------------------
// Divider
// ---------------------------------------------------------------------------

/// A horizontal or vertical rule, optionally with a label.
#[derive(Debug)]
pub struct Divider {
    node: Node,
}

impl Divider {
    pub fn new() -> Self {
        let node = Node::element("divider")
            .prop("direction", "horizontal")
            .prop("content-position", "center")
            .prop("border-style", "solid");
        Self { node }
    }

    /// A horizontal divider with centred label text.
    pub fn labeled(label: impl Into<Child>) -> Self {
        let mut divider = Self::new();
        divider.node.push_child(label);
        divider
    }

    pub fn vertical(mut self) -> Self {
        self.node.set_prop("direction", "vertical");
        self
    }

    /// left, center, right.
    pub fn content_position(mut self, position: impl Into<String>) -> Self {
        self.node.set_prop("content-position", position.into());
        self
    }

    /// Any CSS border style: solid, dashed, dotted.
    pub fn border_style(mut self, style: impl Into<String>) -> Self {
        self.node.set_prop("border-style", style.into());
        self
    }
}

impl Default for Divider {
    fn default() -> Self {
        Self::new()
    }
}

node_widget!(Divider);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{duplicate_ids, find_by_id, Renderable};
    use crate::widgets::{Button, Text};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn row_defaults_and_gutter() {
        let row = Row::new().gutter(20).justify("center");
        let node = row.node();
        assert_eq!(node.kind().component_name(), "el-row");
        assert_eq!(node.property("gutter"), Some(&json!(20)));
        assert_eq!(node.property("justify"), Some(&json!("center")));
        assert_eq!(node.property("align"), Some(&json!("top")));
    }

    #[test]
    fn col_span_clamps() {
        assert_eq!(Col::new(0).node().property("span"), Some(&json!(1)));
        assert_eq!(Col::new(40).node().property("span"), Some(&json!(24)));
        assert_eq!(Col::full().offset(30).node().property("offset"), Some(&json!(24)));
    }

    #[test]
    fn nested_layout_renders_and_finds() {
        let roots: Vec<Child> = vec![Card::new()
            .with_id("card")
            .header("Totals")
            .child(
                Row::new()
                    .child(Col::new(12).child(Text::new("a").with_id("a")))
                    .child(Col::new(12).child(Button::new("b").with_id("b"))),
            )
            .into()];
        assert!(duplicate_ids(&roots).is_empty());
        assert_eq!(find_by_id(&roots, "b").map(|n| n.kind().component_name()), Some("el-button".into()));

        let payload = roots[0].as_component().unwrap().render().unwrap();
        assert_eq!(payload.component, "el-card");
        assert_eq!(payload.props["header"], "Totals");
        assert_eq!(payload.text(), "ab");
    }

    #[test]
    fn divider_label_and_direction() {
        let payload = Divider::labeled("or").vertical().render().unwrap();
        assert_eq!(payload.component, "el-divider");
        assert_eq!(payload.props["direction"], "vertical");
        assert_eq!(payload.text(), "or");
        assert!(Divider::new().node().children().is_empty());
    }
}
