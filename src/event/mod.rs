//! Event system: handlers, registries, dispatch, wire types.

pub mod binding;
pub mod context;
pub mod dispatch;
pub mod handler;
pub mod message;
pub mod registry;

pub use binding::{GlobalHandlers, MethodTable};
pub use context::EventContext;
pub use dispatch::{DispatchError, DispatchOutcome, Dispatcher, Resolution};
pub use handler::{AppHandler, EventBinding, Handler, HandlerResult, ParamSpec, Params};
pub use message::{EventRequest, RequestError, Response};
pub use registry::HandlerRegistry;
