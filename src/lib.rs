//! # trellis
//!
//! A server-side UI component framework. Build a component tree in Rust,
//! render it to a JSON payload consumed by a reactive browser client, and
//! dispatch the client's events back to Rust handlers that mutate a central
//! state store.
//!
//! ## Core Systems
//!
//! - **[`component`]**: Node, Child, attribute values, tree walks
//! - **[`widgets`]**: Built-in widgets: Button, Text, Title, Paragraph, Row, Col, Card, Divider, Input
//! - **[`state`]**: Path-addressed state store with watchers and undo history
//! - **[`event`]**: Handlers, per-render registry, three-tier dispatch, wire types
//! - **[`render`]**: Payload records, the page shell, error pages
//! - **[`app`]**: The application trait and the shell that ties everything together
//! - **[`server`]**: Minimal HTTP/1.1 front end on tokio
//! - **[`config`]**: YAML-loadable application configuration
//! - **[`testing`]**: Headless pilot and snapshot helpers

// `view!` expansions name `::trellis`, which must resolve inside this crate too.
extern crate self as trellis;

// Foundation
pub mod component;
pub mod config;
pub mod logging;

// Core systems
pub mod event;
pub mod render;
pub mod state;

// Widget system
pub mod widgets;

// Application
pub mod app;
pub mod server;
pub mod testing;

pub use app::{App, Application, BuildContext, SetupContext};
pub use component::{Child, Node, NodeKind, Renderable};
pub use config::AppConfig;
pub use event::{AppHandler, EventContext, EventRequest, Handler, MethodTable, Params, Response};
pub use state::StateStore;

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use trellis_macros::view;
