//! Event handlers and their declared parameters.
//!
//! A [`Handler`] is a shared callback plus an explicit list of the parameters
//! it accepts. Incoming parameters are filtered down to that list before the
//! call, so a client sending extra keys never reaches the handler with them.
//! [`AppHandler`] is the same shape for callbacks that also receive the
//! application value (method-table and global handlers).

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::context::EventContext;
use super::message::Response;

/// What a handler returns: an optional response, or an error.
///
/// `Ok(None)` means "handled, nothing to say"; the shell answers with a
/// generic success.
pub type HandlerResult = anyhow::Result<Option<Response>>;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// One declared handler parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub default: Option<Value>,
}

impl ParamSpec {
    /// A parameter with no default. Absent from the call when the client omits it.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// A parameter that falls back to `default` when the client omits it.
    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// Keep only the declared parameters, filling in defaults for absent ones.
pub fn filter_params(specs: &[ParamSpec], raw: &Map<String, Value>) -> Params {
    let mut out = Map::new();
    for spec in specs {
        match (raw.get(&spec.name), &spec.default) {
            (Some(value), _) => {
                out.insert(spec.name.clone(), value.clone());
            }
            (None, Some(default)) => {
                out.insert(spec.name.clone(), default.clone());
            }
            (None, None) => {}
        }
    }
    Params(out)
}

/// The filtered parameters passed to a handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn i64(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }

    pub fn f64(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(Value::as_bool)
    }

    /// Deserialize the whole parameter set into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

type Callback = dyn Fn(&mut EventContext<'_>, Params) -> HandlerResult + Send + Sync;

/// A component-scoped server handler.
///
/// Cheap to clone; the callback is shared.
#[derive(Clone)]
pub struct Handler {
    params: Vec<ParamSpec>,
    callback: Arc<Callback>,
}

impl Handler {
    /// Wrap a callback. The handler starts with no declared parameters.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut EventContext<'_>, Params) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            params: Vec::new(),
            callback: Arc::new(callback),
        }
    }

    /// Declare a parameter with no default (builder).
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec::required(name));
        self
    }

    /// Declare a parameter with a default (builder).
    pub fn param_or(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(ParamSpec::with_default(name, default));
        self
    }

    /// The declared parameters.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Filter `raw` and invoke the callback.
    pub fn call(&self, cx: &mut EventContext<'_>, raw: &Map<String, Value>) -> HandlerResult {
        let params = filter_params(&self.params, raw);
        (self.callback)(cx, params)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// AppHandler
// ---------------------------------------------------------------------------

type AppCallback<A> = dyn Fn(&mut A, &mut EventContext<'_>, Params) -> HandlerResult + Send + Sync;

/// A handler that also receives `&mut` application value.
pub struct AppHandler<A> {
    params: Vec<ParamSpec>,
    callback: Arc<AppCallback<A>>,
}

impl<A> AppHandler<A> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut A, &mut EventContext<'_>, Params) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            params: Vec::new(),
            callback: Arc::new(callback),
        }
    }

    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec::required(name));
        self
    }

    pub fn param_or(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(ParamSpec::with_default(name, default));
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Filter `raw` and invoke the callback with the application value.
    pub fn call(
        &self,
        app: &mut A,
        cx: &mut EventContext<'_>,
        raw: &Map<String, Value>,
    ) -> HandlerResult {
        let params = filter_params(&self.params, raw);
        (self.callback)(app, cx, params)
    }
}

// Manual impl: a derive would require `A: Clone`.
impl<A> Clone for AppHandler<A> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<A> fmt::Debug for AppHandler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppHandler")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// EventBinding
// ---------------------------------------------------------------------------

/// What a node's event entry points at.
#[derive(Clone)]
pub enum EventBinding {
    /// A server-side handler, dispatched via `/api/event`.
    Handler(Handler),
    /// Literal client-side code, evaluated in the browser.
    Script(String),
}

impl EventBinding {
    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            Self::Handler(handler) => Some(handler),
            Self::Script(_) => None,
        }
    }
}

impl fmt::Debug for EventBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(h) => write!(f, "Handler({:?})", h.params),
            Self::Script(code) => write!(f, "Script({code:?})"),
        }
    }
}

impl From<Handler> for EventBinding {
    fn from(handler: Handler) -> Self {
        Self::Handler(handler)
    }
}

impl From<&str> for EventBinding {
    fn from(code: &str) -> Self {
        Self::Script(code.to_owned())
    }
}

impl From<String> for EventBinding {
    fn from(code: String) -> Self {
        Self::Script(code)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateStore;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    // ── filter_params ────────────────────────────────────────────────

    #[test]
    fn filter_drops_undeclared() {
        let specs = vec![ParamSpec::required("a")];
        let params = filter_params(&specs, &raw(json!({"a": 1, "b": 2})));
        assert_eq!(params.into_map(), raw(json!({"a": 1})));
    }

    #[test]
    fn filter_applies_defaults_only_when_absent() {
        let specs = vec![
            ParamSpec::with_default("step", 1),
            ParamSpec::with_default("label", "x"),
            ParamSpec::required("missing"),
        ];
        let params = filter_params(&specs, &raw(json!({"step": 5})));
        assert_eq!(params.into_map(), raw(json!({"step": 5, "label": "x"})));
    }

    #[test]
    fn params_typed_access() {
        let params = Params::new(raw(json!({"n": 3, "s": "hi", "b": true, "f": 1.5})));
        assert_eq!(params.i64("n"), Some(3));
        assert_eq!(params.str("s"), Some("hi"));
        assert_eq!(params.bool("b"), Some(true));
        assert_eq!(params.f64("f"), Some(1.5));
        assert_eq!(params.str("n"), None);
        assert!(params.contains("s"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn params_deserialize() {
        #[derive(Deserialize)]
        struct Args {
            n: i64,
        }
        let params = Params::new(raw(json!({"n": 9})));
        let args: Args = params.deserialize().unwrap();
        assert_eq!(args.n, 9);
    }

    // ── Handler ──────────────────────────────────────────────────────

    #[test]
    fn handler_receives_filtered_params() {
        let handler = Handler::new(|cx, params| {
            cx.state.set("seen", Value::Object(params.into_map()));
            Ok(None)
        })
        .param("keep")
        .param_or("fallback", 10);

        let mut state = StateStore::new();
        let mut context = Map::new();
        let mut cx = EventContext::new(&mut state, &mut context, "click", None);
        handler
            .call(&mut cx, &raw(json!({"keep": "y", "drop": "n"})))
            .unwrap();
        assert_eq!(state.get("seen"), Some(&json!({"keep": "y", "fallback": 10})));
    }

    #[test]
    fn change_event_value_arrives_as_target() {
        let handler = Handler::new(|cx, params| {
            let step = params.str("target").and_then(|v| v.parse::<i64>().ok());
            cx.state.set("step", step.unwrap_or(1));
            Ok(None)
        })
        .param_or("target", "1");

        let mut state = StateStore::new();
        let mut context = Map::new();
        let mut cx = EventContext::new(&mut state, &mut context, "change", Some("step".into()));
        handler
            .call(&mut cx, &raw(json!({"target": "4", "timestamp": 1})))
            .unwrap();
        assert_eq!(state.get("step"), Some(&json!(4)));
    }

    #[test]
    fn app_handler_gets_app() {
        let handler: AppHandler<u32> = AppHandler::new(|app, _cx, params| {
            *app += params.i64("by").unwrap_or(1) as u32;
            Ok(None)
        })
        .param_or("by", 1);

        let mut app = 0u32;
        let mut state = StateStore::new();
        let mut context = Map::new();
        let mut cx = EventContext::new(&mut state, &mut context, "inc", None);
        handler.clone().call(&mut app, &mut cx, &Map::new()).unwrap();
        handler.call(&mut app, &mut cx, &raw(json!({"by": 4}))).unwrap();
        assert_eq!(app, 5);
    }

    #[test]
    fn binding_conversions() {
        assert!(matches!(EventBinding::from("x()"), EventBinding::Script(_)));
        let b = EventBinding::from(Handler::new(|_, _| Ok(None)).param("a"));
        assert_eq!(b.as_handler().map(|h| h.params().len()), Some(1));
        assert_eq!(format!("{:?}", EventBinding::from("go()")), "Script(\"go()\")");
    }
}
