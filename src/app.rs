//! Application shell: setup, build, render, dispatch, routing.
//!
//! User code implements [`Application`]. [`App`] owns that value together
//! with the state store, the render context, the handler tables, and the
//! handler registry of the most recent render. Each render produces a fresh
//! registry snapshot; dispatch reads whichever snapshot it is given.

use std::sync::Arc;

use anyhow::Context as _;
use serde_json::{Map, Value};

use crate::component::Child;
use crate::config::AppConfig;
use crate::event::binding::{GlobalHandlers, MethodTable};
use crate::event::context::EventContext;
use crate::event::dispatch::{DispatchError, DispatchOutcome, Dispatcher};
use crate::event::handler::{AppHandler, HandlerResult};
use crate::event::message::{EventRequest, Response};
use crate::event::registry::HandlerRegistry;
use crate::render::error_page::error_page;
use crate::render::payload::Payload;
use crate::render::renderer::Renderer;
use crate::server::http::{HttpRequest, HttpResponse, Method};
use crate::state::StateStore;

/// Route prefix of the state endpoints.
pub const STATE_ROUTE: &str = "/api/state/";

/// Route of the event endpoint.
pub const EVENT_ROUTE: &str = "/api/event";

// ---------------------------------------------------------------------------
// Application trait
// ---------------------------------------------------------------------------

/// Mutable access granted to [`Application::setup`].
pub struct SetupContext<'a, A> {
    pub state: &'a mut StateStore,
    pub context: &'a mut Map<String, Value>,
    pub globals: &'a mut GlobalHandlers<A>,
}

impl<A> SetupContext<'_, A> {
    /// Register a global handler for `event`.
    pub fn on(&mut self, event: impl Into<String>, handler: AppHandler<A>) {
        self.globals.register(event, handler);
    }
}

/// Read-only access granted to [`Application::build`].
pub struct BuildContext<'a> {
    pub state: &'a StateStore,
    pub context: &'a Map<String, Value>,
    pub config: &'a AppConfig,
}

/// A user application.
pub trait Application: Sized + Send + 'static {
    /// Runs once, when the [`App`] is created.
    fn setup(&mut self, _cx: &mut SetupContext<'_, Self>) {}

    /// Build the component forest. Called once per render cycle.
    fn build(&self, cx: &BuildContext<'_>) -> anyhow::Result<Vec<Child>>;

    /// The `on_<event>` methods this application exposes.
    fn methods() -> MethodTable<Self> {
        MethodTable::new()
    }

    /// Runs once, when the app shuts down.
    fn teardown(&mut self) {}
}

// ---------------------------------------------------------------------------
// RenderCycle
// ---------------------------------------------------------------------------

/// Everything one render produced.
#[derive(Debug, Clone)]
pub struct RenderCycle {
    /// The page, or the error page when the cycle failed.
    pub html: String,
    pub payload: Vec<Payload>,
    /// Handler snapshot for dispatching events from this render.
    pub registry: Arc<HandlerRegistry>,
    /// The failure, with its cause chain, when the cycle failed.
    pub error: Option<String>,
}

impl RenderCycle {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// HTTP status for serving this cycle's page.
    pub fn status(&self) -> u16 {
        if self.is_ok() {
            200
        } else {
            500
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The running application shell.
pub struct App<A: Application> {
    app: A,
    state: StateStore,
    context: Map<String, Value>,
    methods: MethodTable<A>,
    globals: GlobalHandlers<A>,
    config: AppConfig,
    renderer: Renderer,
    registry: Arc<HandlerRegistry>,
    rendered: bool,
    shut_down: bool,
}

impl<A: Application> App<A> {
    /// Wrap `app` and run its setup.
    pub fn new(mut app: A, config: AppConfig) -> Self {
        let mut state = StateStore::with_max_history(config.max_history);
        let mut context = Map::new();
        let mut globals = GlobalHandlers::new();
        app.setup(&mut SetupContext {
            state: &mut state,
            context: &mut context,
            globals: &mut globals,
        });
        let renderer = Renderer::new(config.page.clone()).strict_ids(config.strict_ids);
        tracing::debug!(name = %config.name, globals = globals.len(), "application set up");
        Self {
            app,
            state,
            context,
            methods: A::methods(),
            globals,
            config,
            renderer,
            registry: Arc::new(HandlerRegistry::empty()),
            rendered: false,
            shut_down: false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StateStore {
        &mut self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn globals_mut(&mut self) -> &mut GlobalHandlers<A> {
        &mut self.globals
    }

    /// The handler snapshot of the most recently installed render.
    pub fn registry(&self) -> Arc<HandlerRegistry> {
        Arc::clone(&self.registry)
    }

    /// Set a render context value. Chainable.
    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn get_context(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Run one render cycle without installing its registry.
    ///
    /// Any failure (build error, duplicate ids, serialization) yields the
    /// error page and an empty registry.
    pub fn render(&self) -> RenderCycle {
        match self.try_render() {
            Ok(cycle) => cycle,
            Err(error) => {
                tracing::error!("render failed: {error:#}");
                RenderCycle {
                    html: error_page(&self.config.name, self.config.debug, &error),
                    payload: Vec::new(),
                    registry: Arc::new(HandlerRegistry::empty()),
                    error: Some(format!("{error:#}")),
                }
            }
        }
    }

    fn try_render(&self) -> anyhow::Result<RenderCycle> {
        let cx = BuildContext {
            state: &self.state,
            context: &self.context,
            config: &self.config,
        };
        let roots = self.app.build(&cx).context("building the component tree failed")?;
        let rendered = self
            .renderer
            .render(&roots, &self.context, &self.config.name)
            .context("rendering the component tree failed")?;
        let registry = HandlerRegistry::collect(&roots);
        tracing::debug!(
            roots = rendered.payload.len(),
            handlers = registry.len(),
            "render cycle complete"
        );
        Ok(RenderCycle {
            html: rendered.html,
            payload: rendered.payload,
            registry: Arc::new(registry),
            error: None,
        })
    }

    /// Render and install the new registry snapshot.
    pub fn refresh(&mut self) -> RenderCycle {
        let cycle = self.render();
        self.registry = Arc::clone(&cycle.registry);
        self.rendered = true;
        cycle
    }

    /// Render, install the registry, and return the page.
    pub fn render_page(&mut self) -> String {
        self.refresh().html
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Dispatch `request` against an explicit registry snapshot.
    pub fn dispatch(
        &mut self,
        registry: &HandlerRegistry,
        request: &EventRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        let dispatcher = Dispatcher {
            registry,
            methods: &self.methods,
            globals: &self.globals,
            debug: self.config.debug,
        };
        dispatcher.dispatch(&mut self.app, &mut self.state, &mut self.context, request)
    }

    /// Dispatch against the installed snapshot, rendering first if nothing
    /// has been rendered yet.
    pub fn dispatch_current(
        &mut self,
        request: &EventRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        if !self.rendered {
            self.refresh();
        }
        let registry = Arc::clone(&self.registry);
        self.dispatch(&registry, request)
    }

    /// Invoke the global handler for `event` directly, without a client
    /// round trip. `params` are filtered against the handler's declared
    /// parameters. No registered handler yields `Ok(None)`.
    pub fn emit(&mut self, event: &str, params: Map<String, Value>) -> HandlerResult {
        let Some(handler) = self.globals.resolve(event) else {
            tracing::debug!(event, "emit with no global handler");
            return Ok(None);
        };
        let handler = handler.clone();
        let mut cx = EventContext::new(&mut self.state, &mut self.context, event, None);
        handler.call(&mut self.app, &mut cx, &params)
    }

    /// Dispatch and turn the result into a status and response body.
    pub fn event_response(&mut self, request: &EventRequest) -> (u16, Response) {
        match self.dispatch_current(request) {
            Ok(outcome) => (200, outcome.into_response()),
            Err(error) => (
                500,
                Response::error(error.to_string()).with_extra("traceback", error.traceback()),
            ),
        }
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `POST /api/event`.
    pub fn handle_event(&mut self, body: &[u8]) -> HttpResponse {
        match EventRequest::parse(body) {
            Ok(request) => {
                let (status, response) = self.event_response(&request);
                HttpResponse::json(status, &response)
            }
            Err(error) => {
                tracing::debug!("rejected event body: {error}");
                HttpResponse::json(400, &Response::error(error.to_string()))
            }
        }
    }

    /// `GET /api/state/<path>`.
    pub fn handle_state_get(&self, path: &str) -> HttpResponse {
        let value = self.state.get(path).cloned().unwrap_or(Value::Null);
        HttpResponse::json(200, &Response::data(value))
    }

    /// `POST /api/state/<path>` with `{"value": ...}`.
    pub fn handle_state_set(&mut self, path: &str, body: &[u8]) -> HttpResponse {
        let value = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(mut map)) => map.remove("value").unwrap_or(Value::Null),
            Ok(_) => {
                return HttpResponse::json(400, &Response::error("Expected a JSON object"));
            }
            Err(error) => {
                return HttpResponse::json(400, &Response::error(format!("Invalid JSON: {error}")));
            }
        };
        self.state.set(path, value.clone());
        let mut response = Response::data(value);
        response.message = Some("State updated".to_owned());
        HttpResponse::json(200, &response)
    }

    /// Route one request.
    pub fn handle(&mut self, request: &HttpRequest) -> HttpResponse {
        tracing::debug!(method = ?request.method, path = %request.path, "request");
        match (&request.method, request.path.as_str()) {
            (Method::Get | Method::Post, "/") => {
                let cycle = self.refresh();
                HttpResponse::html(cycle.status(), cycle.html)
            }
            (Method::Post, EVENT_ROUTE) => self.handle_event(&request.body),
            (method, path) => match path.strip_prefix(STATE_ROUTE) {
                Some(key) if !key.is_empty() => match method {
                    Method::Get => self.handle_state_get(key),
                    Method::Post => self.handle_state_set(key, &request.body),
                    Method::Other(_) => not_found(),
                },
                _ => not_found(),
            },
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Run the application's teardown. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        tracing::info!(name = %self.config.name, "shutting down");
        self.app.teardown();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::json(404, &Response::error("Not found"))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Node;
    use crate::event::handler::Handler;
    use anyhow::bail;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Default)]
    struct Greeter {
        greeted: u32,
        torn_down: bool,
        fail_build: bool,
    }

    impl Application for Greeter {
        fn setup(&mut self, cx: &mut SetupContext<'_, Self>) {
            cx.state.set("name", "world");
            cx.context.insert("theme".into(), json!("light"));
            cx.on(
                "ping",
                AppHandler::new(|_app: &mut Greeter, _cx, _params| Ok(Some(Response::success("pong")))),
            );
        }

        fn build(&self, cx: &BuildContext<'_>) -> anyhow::Result<Vec<Child>> {
            if self.fail_build {
                bail!("no widgets today");
            }
            let name = cx.state.get_or("name", "nobody");
            Ok(vec![Node::element("button")
                .with_id("greet")
                .child(format!("Hello {}", name.as_str().unwrap_or_default()))
                .on(
                    "click",
                    Handler::new(|cx, _params| Ok(Some(cx.update_state("clicked", true)))),
                )
                .into()])
        }

        fn methods() -> MethodTable<Self> {
            MethodTable::new().method(
                "on_greet",
                AppHandler::new(|app: &mut Greeter, _cx, _params| {
                    app.greeted += 1;
                    Ok(None)
                }),
            )
        }

        fn teardown(&mut self) {
            self.torn_down = true;
        }
    }

    fn app() -> App<Greeter> {
        App::new(Greeter::default(), AppConfig::new().with_name("Greeter"))
    }

    #[test]
    fn setup_runs_once_on_new() {
        let app = app();
        assert_eq!(app.state().get("name"), Some(&json!("world")));
        assert_eq!(app.get_context("theme"), Some(&json!("light")));
    }

    #[test]
    fn render_produces_page_and_registry() {
        let app = app();
        let cycle = app.render();
        assert!(cycle.is_ok());
        assert_eq!(cycle.payload[0].text(), "Hello world");
        assert!(cycle.registry.lookup("greet", "click").is_some());
        assert!(cycle.html.contains("<title>Greeter</title>"));
        assert!(app.registry().is_empty());
    }

    #[test]
    fn failed_build_yields_error_page_and_empty_registry() {
        let mut app = App::new(
            Greeter {
                fail_build: true,
                ..Greeter::default()
            },
            AppConfig::new().with_debug(true),
        );
        let cycle = app.refresh();
        assert_eq!(cycle.status(), 500);
        assert!(cycle.html.contains("no widgets today"));
        assert!(cycle.registry.is_empty());
        assert!(app.registry().is_empty());
    }

    #[test]
    fn dispatch_uses_given_snapshot() {
        let mut app = app();
        let cycle = app.render();
        let request = EventRequest::new("click").component("greet");
        let outcome = app.dispatch(&cycle.registry, &request).unwrap();
        assert!(outcome.is_handled());
        assert_eq!(app.state().get("clicked"), Some(&json!(true)));

        let stale = HandlerRegistry::empty();
        app.state_mut().delete("clicked");
        assert_eq!(app.dispatch(&stale, &request).unwrap(), DispatchOutcome::NoOp);
        assert_eq!(app.state().get("clicked"), None);
    }

    #[test]
    fn emit_calls_global_handler_with_filtered_params() {
        let mut app = app();
        let response = app.emit("ping", Map::new()).unwrap().unwrap();
        assert_eq!(response.message.as_deref(), Some("pong"));
        assert!(app.emit("missing", Map::new()).unwrap().is_none());

        app.globals.register(
            "rename",
            AppHandler::new(|_app: &mut Greeter, cx, params| {
                assert!(!params.contains("extra"));
                let name = params.str("name").unwrap_or_default().to_owned();
                cx.state.set("name", name);
                Ok(None)
            })
            .param("name"),
        );
        let mut params = Map::new();
        params.insert("name".into(), json!("ada"));
        params.insert("extra".into(), json!(1));
        assert!(app.emit("rename", params).unwrap().is_none());
        assert_eq!(app.state().get("name"), Some(&json!("ada")));
    }

    #[test]
    fn dispatch_current_renders_first_when_needed() {
        let mut app = app();
        let (status, response) = app.event_response(&EventRequest::new("click").component("greet"));
        assert_eq!(status, 200);
        assert_eq!(response.data, Some(json!({"state_update": {"clicked": true}})));
    }

    #[test]
    fn method_and_global_tiers() {
        let mut app = app();
        app.event_response(&EventRequest::new("greet"));
        assert_eq!(app.app().greeted, 1);
        let (_, response) = app.event_response(&EventRequest::new("ping"));
        assert_eq!(response.message.as_deref(), Some("pong"));
    }

    #[test]
    fn router_status_codes() {
        let mut app = app();
        assert_eq!(app.handle(&HttpRequest::get("/")).status, 200);
        assert_eq!(app.handle(&HttpRequest::post("/", "")).status, 200);
        assert_eq!(app.handle(&HttpRequest::post(EVENT_ROUTE, "")).status, 400);
        assert_eq!(app.handle(&HttpRequest::post(EVENT_ROUTE, "{oops")).status, 400);
        assert_eq!(app.handle(&HttpRequest::post(EVENT_ROUTE, r#"{"params":{}}"#)).status, 400);
        assert_eq!(app.handle(&HttpRequest::get(EVENT_ROUTE)).status, 404);
        assert_eq!(app.handle(&HttpRequest::get("/nope")).status, 404);
        assert_eq!(app.handle(&HttpRequest::get(STATE_ROUTE)).status, 404);
    }

    #[test]
    fn state_endpoints() {
        let mut app = app();
        let response = app.handle(&HttpRequest::post("/api/state/user.age", r#"{"value": 42}"#));
        assert_eq!(response.status, 200);
        let body = response.json_body().unwrap();
        assert_eq!(body["message"], json!("State updated"));
        assert_eq!(body["data"], json!(42));

        let body = app.handle(&HttpRequest::get("/api/state/user.age")).json_body().unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"], json!(42));

        let body = app.handle(&HttpRequest::get("/api/state/missing")).json_body().unwrap();
        assert_eq!(body["data"], Value::Null);

        assert_eq!(app.handle(&HttpRequest::post("/api/state/x", "[1]")).status, 400);
    }

    #[test]
    fn shutdown_runs_teardown_once() {
        let mut app = app();
        app.shutdown();
        app.shutdown();
        assert!(app.app().torn_down);
        assert!(app.is_shut_down());
    }
}
