//! Pilot: drive an [`App`] headlessly.
//!
//! The `Pilot` renders the application, simulates client events against the
//! installed handler snapshot, and exposes state and payload for assertions.

use serde_json::{Map, Value};

use crate::app::{App, Application, RenderCycle};
use crate::config::AppConfig;
use crate::event::message::{EventRequest, Response};
use crate::render::payload::{find_in, Payload};
use crate::server::http::{HttpRequest, HttpResponse};
use crate::state::StateStore;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// # Examples
///
/// ```ignore
/// use trellis::testing::Pilot;
///
/// let mut pilot = Pilot::new(Counter::default());
/// pilot.render();
/// pilot.click("increment");
/// assert_eq!(pilot.state().get("count"), Some(&serde_json::json!(1)));
/// ```
pub struct Pilot<A: Application> {
    app: App<A>,
    last: Option<RenderCycle>,
}

impl<A: Application> Pilot<A> {
    /// Wrap `app` with a debug-mode default config.
    pub fn new(app: A) -> Self {
        Self::with_config(app, AppConfig::new().with_debug(true))
    }

    pub fn with_config(app: A, config: AppConfig) -> Self {
        Self {
            app: App::new(app, config),
            last: None,
        }
    }

    /// Render and install a fresh handler snapshot.
    pub fn render(&mut self) -> &RenderCycle {
        self.last.insert(self.app.refresh())
    }

    /// The payload of the last render, rendering first if needed.
    pub fn payload(&mut self) -> &[Payload] {
        if self.last.is_none() {
            self.render();
        }
        match &self.last {
            Some(cycle) => &cycle.payload,
            None => &[],
        }
    }

    /// Find a payload record by id in the last render.
    pub fn find(&mut self, id: &str) -> Option<&Payload> {
        find_in(self.payload(), id)
    }

    /// Send a `click` from the component with the given id.
    pub fn click(&mut self, component_id: &str) -> Response {
        self.send(&EventRequest::new("click").component(component_id))
    }

    /// Send `event` from a component with parameters.
    pub fn dispatch(
        &mut self,
        component_id: &str,
        event: &str,
        params: Map<String, Value>,
    ) -> Response {
        let mut request = EventRequest::new(event).component(component_id);
        request.params = params;
        self.send(&request)
    }

    /// Send an arbitrary request through the same path the HTTP endpoint
    /// uses. Debug-mode handler failures come back as error responses.
    pub fn send(&mut self, request: &EventRequest) -> Response {
        if self.last.is_none() {
            self.render();
        }
        self.app.event_response(request).1
    }

    /// Route a raw HTTP request.
    pub fn http(&mut self, request: &HttpRequest) -> HttpResponse {
        self.app.handle(request)
    }

    pub fn state(&self) -> &StateStore {
        self.app.state()
    }

    pub fn app(&self) -> &App<A> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App<A> {
        &mut self.app
    }

    /// Consume the pilot, running teardown.
    pub fn finish(mut self) -> App<A> {
        self.app.shutdown();
        self.app
    }
}
