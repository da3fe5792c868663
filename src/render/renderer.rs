//! The render collector: turns a forest of children into payload records and
//! the host page.

use serde_json::{Map, Value};

use super::page;
use super::payload::{Payload, PayloadChild};
use super::RenderError;
use crate::component::tree::duplicate_ids;
use crate::component::Child;
use crate::config::PageConfig;

/// Render a child list into payload children.
///
/// Fragments are flattened in place at every depth, so a fragment nested in
/// a fragment contributes its entries directly rather than a nested list.
/// Empty entries are dropped. A component
/// whose `render` fails is logged and skipped; its siblings still render.
pub fn render_children(children: &[Child]) -> Vec<PayloadChild> {
    let mut out = Vec::with_capacity(children.len());
    render_into(children, &mut out);
    out
}

fn render_into(children: &[Child], out: &mut Vec<PayloadChild>) {
    for child in children {
        match child {
            Child::Component(component) => match component.render() {
                Ok(payload) => out.push(PayloadChild::Node(payload)),
                Err(error) => {
                    tracing::warn!(id = component.node().id(), "skipping component: {error}");
                }
            },
            Child::Text(text) if text.is_empty() => {}
            Child::Text(text) => out.push(PayloadChild::Literal(Value::String(text.clone()))),
            Child::Number(n) => out.push(PayloadChild::Literal(Value::Number(n.clone()))),
            Child::Bool(b) => out.push(PayloadChild::Literal(Value::Bool(*b))),
            Child::Fragment(items) => render_into(items, out),
            Child::Empty => {}
        }
    }
}

/// Text form of a top-level scalar.
fn scalar_text(child: &Child) -> Option<String> {
    match child {
        Child::Text(text) if !text.is_empty() => Some(text.clone()),
        Child::Number(n) => Some(n.to_string()),
        Child::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Output of one successful render.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub payload: Vec<Payload>,
    pub html: String,
}

/// Collects payload records for the top-level forest and wraps them in the
/// host page.
#[derive(Debug, Clone)]
pub struct Renderer {
    page: PageConfig,
    strict_ids: bool,
}

impl Renderer {
    pub fn new(page: PageConfig) -> Self {
        Self {
            page,
            strict_ids: true,
        }
    }

    /// Whether duplicate ids fail the render (builder).
    pub fn strict_ids(mut self, strict: bool) -> Self {
        self.strict_ids = strict;
        self
    }

    pub fn page(&self) -> &PageConfig {
        &self.page
    }

    /// Render each root in order.
    ///
    /// A top-level scalar becomes a `span` record with id `text_<n>`, where
    /// `n` is the number of records collected so far. A failing root is
    /// logged and skipped.
    pub fn collect(&self, roots: &[Child]) -> Vec<Payload> {
        let mut out = Vec::with_capacity(roots.len());
        self.collect_into(roots, &mut out);
        out
    }

    fn collect_into(&self, roots: &[Child], out: &mut Vec<Payload>) {
        for root in roots {
            match root {
                Child::Component(component) => match component.render() {
                    Ok(payload) => out.push(payload),
                    Err(error) => {
                        tracing::warn!(id = component.node().id(), "skipping root component: {error}");
                    }
                },
                Child::Fragment(items) => self.collect_into(items, out),
                scalar => {
                    if let Some(text) = scalar_text(scalar) {
                        out.push(Payload::text_leaf(out.len(), text));
                    }
                }
            }
        }
    }

    /// Validate ids, collect the payload, and produce the page.
    pub fn render(
        &self,
        roots: &[Child],
        context: &Map<String, Value>,
        title: &str,
    ) -> Result<Rendered, RenderError> {
        let duplicates = duplicate_ids(roots);
        if !duplicates.is_empty() {
            if self.strict_ids {
                return Err(RenderError::DuplicateIds(duplicates));
            }
            tracing::warn!(ids = %duplicates.join(", "), "duplicate component ids, last registration wins");
        }
        let payload = self.collect(roots);
        let html = page::render_page(&self.page, title, &payload, context)?;
        Ok(Rendered { payload, html })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Node, Renderable};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Failing(Node);

    impl Renderable for Failing {
        fn node(&self) -> &Node {
            &self.0
        }

        fn render(&self) -> Result<Payload, RenderError> {
            Err(RenderError::Component {
                id: self.0.id().to_owned(),
                message: "broken widget".into(),
            })
        }
    }

    #[test]
    fn children_flatten_and_drop_empties() {
        let children = vec![
            Child::from("a"),
            Child::from(vec![Child::from(1), Child::from(vec![Child::from(true)])]),
            Child::Empty,
            Child::from(""),
        ];
        let rendered = render_children(&children);
        assert_eq!(
            rendered,
            vec![
                PayloadChild::Literal(json!("a")),
                PayloadChild::Literal(json!(1)),
                PayloadChild::Literal(json!(true)),
            ]
        );
    }

    #[test]
    fn nested_fragment_flattens_to_its_entries() {
        let children = vec![Child::Fragment(vec![Child::Fragment(vec![
            Child::from("a"),
            Child::from("b"),
        ])])];
        assert_eq!(
            render_children(&children),
            vec![
                PayloadChild::Literal(json!("a")),
                PayloadChild::Literal(json!("b")),
            ]
        );
    }

    #[test]
    fn scalar_roots_become_text_spans() {
        let roots = vec![
            Node::html("div").with_id("d").into(),
            Child::from("hello"),
            Child::from(7),
        ];
        let payload = Renderer::default().collect(&roots);
        assert_eq!(payload.len(), 3);
        assert_eq!(payload[1], Payload::text_leaf(1, "hello"));
        assert_eq!(payload[2], Payload::text_leaf(2, "7"));
    }

    #[test]
    fn failing_root_is_skipped_and_indices_follow_collected_count() {
        let roots = vec![
            Child::component(Failing(Node::html("div"))),
            Child::from("after"),
        ];
        let payload = Renderer::default().collect(&roots);
        assert_eq!(payload, vec![Payload::text_leaf(0, "after")]);
    }

    #[test]
    fn strict_renderer_rejects_duplicate_ids() {
        let roots: Vec<Child> = vec![
            Node::html("p").with_id("same").into(),
            Node::html("p").with_id("same").into(),
        ];
        let err = Renderer::new(PageConfig::default())
            .render(&roots, &Map::new(), "t")
            .unwrap_err();
        assert!(matches!(err, RenderError::DuplicateIds(ref ids) if ids == &["same".to_owned()]));
    }

    #[test]
    fn lenient_renderer_allows_duplicate_ids() {
        let roots: Vec<Child> = vec![
            Node::html("p").with_id("same").into(),
            Node::html("p").with_id("same").into(),
        ];
        let rendered = Renderer::new(PageConfig::default())
            .strict_ids(false)
            .render(&roots, &Map::new(), "t")
            .unwrap();
        assert_eq!(rendered.payload.len(), 2);
        assert!(rendered.html.contains("\"same\""));
    }
}
