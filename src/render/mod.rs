//! Rendering pipeline: payload records, the render collector, the host page,
//! error pages.

pub mod error_page;
pub mod page;
pub mod payload;
pub mod renderer;

pub use payload::{EventInstruction, Payload, PayloadChild};
pub use renderer::{render_children, Rendered, Renderer};

/// Errors raised while rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Two or more nodes in one render pass share an id.
    #[error("duplicate component ids: {}", .0.join(", "))]
    DuplicateIds(Vec<String>),
    /// A component refused to render.
    #[error("component '{id}' failed to render: {message}")]
    Component { id: String, message: String },
    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
