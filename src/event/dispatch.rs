//! Three-tier event dispatch.
//!
//! An incoming event is resolved, first match wins, against:
//!
//! 1. the component-scoped handler in the current [`HandlerRegistry`],
//! 2. the application's `on_<event>` method in its [`MethodTable`],
//! 3. the [`GlobalHandlers`] registered during setup.
//!
//! Nothing matching is a [`DispatchOutcome::NoOp`], not an error.

use std::fmt;

use serde_json::{Map, Value};

use super::binding::{GlobalHandlers, MethodTable, METHOD_PREFIX};
use super::context::EventContext;
use super::handler::{AppHandler, Handler};
use super::message::{EventRequest, Response};
use super::registry::HandlerRegistry;
use crate::state::StateStore;

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Which tier produced the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Component,
    Method,
    Global,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Component => "component",
            Self::Method => "method",
            Self::Global => "global",
        })
    }
}

/// Result of a dispatch that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A handler ran. `response` is what it returned, or the error response
    /// built from its failure outside debug mode.
    Handled {
        via: Resolution,
        response: Option<Response>,
    },
    /// No handler matched.
    NoOp,
}

impl DispatchOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }

    /// The response to send: the handler's own, or a generic success.
    pub fn into_response(self) -> Response {
        match self {
            Self::Handled {
                response: Some(response),
                ..
            } => response,
            _ => Response::success("Event handled"),
        }
    }
}

/// A handler failed while running in debug mode.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{via} handler for '{event}' failed: {error:#}")]
    Handler {
        event: String,
        via: Resolution,
        error: anyhow::Error,
    },
}

impl DispatchError {
    /// The full error chain, one cause per line.
    pub fn traceback(&self) -> String {
        match self {
            Self::Handler { error, .. } => error
                .chain()
                .enumerate()
                .map(|(depth, cause)| format!("{depth}: {cause}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// A resolved handler, borrowed from the table it was found in.
pub enum Resolved<'r, A> {
    Component(&'r Handler),
    Method(&'r AppHandler<A>),
    Global(&'r AppHandler<A>),
}

impl<A> Resolved<'_, A> {
    pub fn resolution(&self) -> Resolution {
        match self {
            Self::Component(_) => Resolution::Component,
            Self::Method(_) => Resolution::Method,
            Self::Global(_) => Resolution::Global,
        }
    }
}

/// Borrowed view of everything needed to route one event.
pub struct Dispatcher<'r, A> {
    pub registry: &'r HandlerRegistry,
    pub methods: &'r MethodTable<A>,
    pub globals: &'r GlobalHandlers<A>,
    pub debug: bool,
}

impl<'r, A> Dispatcher<'r, A> {
    /// Find the handler for `event`, first tier first.
    pub fn resolve(&self, component_id: Option<&str>, event: &str) -> Option<Resolved<'r, A>> {
        let registry = self.registry;
        let methods = self.methods;
        let globals = self.globals;
        component_id
            .and_then(|id| registry.lookup(id, event))
            .map(Resolved::Component)
            .or_else(|| methods.for_event(event).map(Resolved::Method))
            .or_else(|| globals.resolve(event).map(Resolved::Global))
    }

    /// Resolve and run the handler for `request`.
    ///
    /// A handler error is returned as [`DispatchError`] in debug mode. Outside
    /// debug mode it becomes an error [`Response`] inside a `Handled` outcome.
    pub fn dispatch(
        &self,
        app: &mut A,
        state: &mut StateStore,
        context: &mut Map<String, Value>,
        request: &EventRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        let event = request.handler_name();
        let component_id = request.component_id.as_deref();

        let Some(resolved) = self.resolve(component_id, event) else {
            tracing::debug!(event, component_id, "no handler matched");
            return Ok(DispatchOutcome::NoOp);
        };
        let via = resolved.resolution();
        tracing::debug!(event, component_id, %via, "dispatching");

        let mut cx = EventContext::new(state, context, event, component_id.map(str::to_owned));
        let result = match resolved {
            Resolved::Component(handler) => handler.call(&mut cx, &request.params),
            Resolved::Method(handler) | Resolved::Global(handler) => {
                handler.call(app, &mut cx, &request.params)
            }
        };

        match result {
            Ok(response) => Ok(DispatchOutcome::Handled { via, response }),
            Err(error) => {
                tracing::error!(event, %via, "handler failed: {error:#}");
                if self.debug {
                    return Err(DispatchError::Handler {
                        event: event.to_owned(),
                        via,
                        error,
                    });
                }
                let message = match via {
                    Resolution::Method => format!("Error calling {METHOD_PREFIX}{event}: {error}"),
                    _ => format!("Error calling handler: {error}"),
                };
                Ok(DispatchOutcome::Handled {
                    via,
                    response: Some(Response::error(message)),
                })
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
