//! Integration tests for trellis.
//!
//! These tests exercise the public API from outside the crate, verifying that
//! the widgets, state store, dispatcher, app shell and HTTP front end work
//! together correctly.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use trellis::app::{App, Application, BuildContext, SetupContext};
use trellis::component::{Child, Node, Renderable};
use trellis::config::AppConfig;
use trellis::event::{AppHandler, EventRequest, Handler, MethodTable, Response};
use trellis::render::{Payload, RenderError, Renderer};
use trellis::server::http::HttpRequest;
use trellis::server::serve_on;
use trellis::state::StateStore;
use trellis::testing::{outline, Pilot};
use trellis::widgets::*;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// The classic counter: one button, one label.
#[derive(Default)]
struct Counter {
    method_calls: u32,
    global_calls: u32,
}

fn count(state: &StateStore) -> i64 {
    state.get("click_count").and_then(Value::as_i64).unwrap_or(0)
}

impl Application for Counter {
    fn setup(&mut self, cx: &mut SetupContext<'_, Self>) {
        cx.state.set("click_count", 0);
        cx.on(
            "click",
            AppHandler::new(|app: &mut Counter, _cx, _params| {
                app.global_calls += 1;
                Ok(None)
            }),
        );
    }

    fn build(&self, cx: &BuildContext<'_>) -> anyhow::Result<Vec<Child>> {
        let clicks = count(cx.state);
        let increment = Handler::new(|cx, _params| {
            let next = count(cx.state) + 1;
            cx.state.set("click_count", next);
            Ok(Some(Response::notify(
                "Clicked",
                format!("Button clicked {next} times"),
                "success",
            )))
        });
        Ok(vec![Card::new()
            .with_id("counter")
            .header("Counter")
            .child(Text::new(format!("Clicks: {clicks}")).with_id("label"))
            .child(Button::primary("+1").with_id("inc").on("click", increment))
            .child(Button::new("Reset").with_id("reset").on("click", "location.reload()"))
            .into()])
    }

    fn methods() -> MethodTable<Self> {
        MethodTable::new().method(
            "on_click",
            AppHandler::new(|app: &mut Counter, _cx, _params| {
                app.method_calls += 1;
                Ok(None)
            }),
        )
    }
}

/// A widget whose render always fails.
struct Broken {
    node: Node,
}

impl Renderable for Broken {
    fn node(&self) -> &Node {
        &self.node
    }

    fn render(&self) -> Result<Payload, RenderError> {
        Err(RenderError::Component {
            id: self.node.id().to_owned(),
            message: "cannot draw".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Counter scenario
// ---------------------------------------------------------------------------

#[test]
fn counter_three_clicks() {
    let mut pilot = Pilot::new(Counter::default());
    pilot.render();
    for expected in 1..=3 {
        let response = pilot.click("inc");
        assert!(response.success);
        let message = response.data.as_ref().unwrap()["notification"]["message"]
            .as_str()
            .unwrap()
            .to_owned();
        assert!(message.contains(&expected.to_string()), "{message}");
    }
    assert_eq!(pilot.state().get("click_count"), Some(&json!(3)));

    pilot.render();
    assert_eq!(pilot.find("label").unwrap().text(), "Clicks: 3");
}

#[test]
fn component_handler_shadows_method_and_global() {
    let mut pilot = Pilot::new(Counter::default());
    pilot.render();
    pilot.click("inc");
    assert_eq!(pilot.app().app().method_calls, 0);
    assert_eq!(pilot.app().app().global_calls, 0);

    // Without a component id the method tier wins over the global one.
    let response = pilot.send(&EventRequest::new("click"));
    assert_eq!(response.message.as_deref(), Some("Event handled"));
    assert_eq!(pilot.app().app().method_calls, 1);
    assert_eq!(pilot.app().app().global_calls, 0);
}

#[test]
fn script_bindings_are_not_dispatchable() {
    let mut pilot = Pilot::new(Counter::default());
    let reset = pilot.find("reset").unwrap().clone();
    assert_eq!(reset.events["click"], trellis::render::EventInstruction::Script {
        code: "location.reload()".into()
    });
    // Falls through to the method tier.
    pilot.click("reset");
    assert_eq!(pilot.app().app().method_calls, 1);
}

#[test]
fn counter_outline() {
    let mut pilot = Pilot::new(Counter::default());
    insta::assert_snapshot!(outline(pilot.payload()), @r###"
    el-card#counter
      span#label
        "Clicks: 0"
      el-button#inc [click]
        "+1"
      el-button#reset [click*]
        "Reset"
    "###);
}

// ---------------------------------------------------------------------------
// State store scenarios
// ---------------------------------------------------------------------------

#[test]
fn delete_nested_and_missing() {
    let mut state = StateStore::new();
    state.from_dict(json!({"a": {"b": 1, "c": 2}}).as_object().unwrap().clone());

    assert!(state.delete("a.b"));
    assert_eq!(Value::Object(state.to_dict()), json!({"a": {"c": 2}}));

    let before = state.to_dict();
    let history = state.len_history();
    assert!(!state.delete("a.x"));
    assert_eq!(state.to_dict(), before);
    assert_eq!(state.len_history(), history);
}

#[test]
fn undo_after_history_eviction() {
    let mut state = StateStore::with_max_history(2);
    for n in 1..=4 {
        state.set("n", n);
    }
    assert_eq!(state.len_history(), 2);
    assert!(state.undo());
    assert_eq!(state.get("n"), Some(&json!(3)));
    assert!(state.undo());
    assert_eq!(state.get("n"), Some(&json!(2)));
    assert!(!state.undo());
    assert_eq!(state.get("n"), Some(&json!(2)));
}

#[test]
fn set_then_undo_restores_each_snapshot() {
    let mut state = StateStore::new();
    let mut snapshots = Vec::new();
    for i in 0..10 {
        snapshots.push(state.to_dict());
        state.set(&format!("k{}.v", i % 3), i);
    }
    while let Some(expected) = snapshots.pop() {
        assert!(state.undo());
        assert_eq!(state.to_dict(), expected);
    }
}

#[test]
fn json_round_trip_through_store() {
    let mut state = StateStore::new();
    state.set("user.name", "ada");
    state.set("user.tags", json!(["x", "y"]));
    let text = state.to_json().unwrap();

    let mut restored = StateStore::new();
    restored.from_json(&text).unwrap();
    assert_eq!(restored.to_dict(), state.to_dict());
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn broken_widget_is_skipped() {
    let roots: Vec<Child> = vec![
        Text::new("before").with_id("before").into(),
        Child::component(Broken {
            node: Node::html("div").with_id("broken"),
        }),
        Row::new()
            .with_id("row")
            .child(Child::component(Broken {
                node: Node::html("div").with_id("nested-broken"),
            }))
            .child(Col::new(12).with_id("col"))
            .into(),
        Text::new("after").with_id("after").into(),
    ];
    let payload = Renderer::default().collect(&roots);
    let ids: Vec<&str> = payload.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["before", "row", "after"]);
    assert_eq!(payload[1].children.len(), 1);
    assert_eq!(payload[1].children[0].as_node().unwrap().id, "col");
}

#[test]
fn render_is_idempotent() {
    let card = Card::new()
        .with_id("c")
        .child(Title::h2("T").with_id("t"))
        .child(Paragraph::new("body"))
        .child(Divider::new().with_id("d"))
        .child(Input::new().with_id("i").placeholder("type"));
    assert_eq!(card.render().unwrap(), card.render().unwrap());
}

#[test]
fn duplicate_ids_fail_strict_render() {
    struct Dupes;
    impl Application for Dupes {
        fn build(&self, _cx: &BuildContext<'_>) -> anyhow::Result<Vec<Child>> {
            Ok(vec![
                Button::new("a").with_id("same").into(),
                Button::new("b").with_id("same").into(),
            ])
        }
    }

    let strict = App::new(Dupes, AppConfig::new().with_debug(true));
    let cycle = strict.render();
    assert_eq!(cycle.status(), 500);
    assert!(cycle.error.unwrap().contains("same"));

    let lenient = App::new(Dupes, AppConfig::new().with_strict_ids(false));
    let cycle = lenient.render();
    assert!(cycle.is_ok());
    assert_eq!(cycle.payload.len(), 2);
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[test]
fn state_routes_through_pilot() {
    let mut pilot = Pilot::new(Counter::default());
    let response = pilot.http(&HttpRequest::post("/api/state/theme.color", r#"{"value":"dark"}"#));
    assert_eq!(response.status, 200);
    assert_eq!(pilot.state().get("theme.color"), Some(&json!("dark")));

    let response = pilot.http(&HttpRequest::get("/api/state/theme"));
    let body = response.json_body().unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!({"color": "dark"}));
}

#[test]
fn failing_handler_in_production_is_structured() {
    struct Faulty;
    impl Application for Faulty {
        fn build(&self, _cx: &BuildContext<'_>) -> anyhow::Result<Vec<Child>> {
            Ok(vec![Button::new("x")
                .with_id("x")
                .on("click", Handler::new(|_, _| anyhow::bail!("kaboom")))
                .into()])
        }
    }

    let mut app = App::new(Faulty, AppConfig::new());
    let (status, response) = app.event_response(&EventRequest::new("click").component("x"));
    assert_eq!(status, 200);
    assert!(!response.success);
    assert!(response.error.unwrap().contains("kaboom"));

    let mut debug = App::new(Faulty, AppConfig::new().with_debug(true));
    let (status, response) = debug.event_response(&EventRequest::new("click").component("x"));
    assert_eq!(status, 500);
    assert!(response.extra.contains_key("traceback"));
}

// ---------------------------------------------------------------------------
// TCP round trip
// ---------------------------------------------------------------------------

async fn roundtrip(addr: std::net::SocketAddr, request: String) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    raw
}

fn body_of(raw: &str) -> Value {
    let (_, body) = raw.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn serves_page_events_and_state() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shared = Arc::new(Mutex::new(App::new(Counter::default(), AppConfig::new())));
    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(serve_on(listener, Arc::clone(&shared), async {
        let _ = stopped.await;
    }));

    let page = roundtrip(addr, "GET / HTTP/1.1\r\nHost: test\r\n\r\n".into()).await;
    assert!(page.starts_with("HTTP/1.1 200 OK"));
    assert!(page.contains("__TRELLIS_PAYLOAD__"));

    let event = r#"{"event":"click","component_id":"inc","params":{}}"#;
    let raw = roundtrip(
        addr,
        format!(
            "POST /api/event HTTP/1.1\r\nHost: test\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{event}",
            event.len()
        ),
    )
    .await;
    assert!(raw.starts_with("HTTP/1.1 200 OK"), "{raw}");
    assert_eq!(body_of(&raw)["data"]["notification"]["type"], json!("success"));

    let raw = roundtrip(addr, "GET /api/state/click_count HTTP/1.1\r\nHost: test\r\n\r\n".into()).await;
    assert_eq!(body_of(&raw)["data"], json!(1));

    let raw = roundtrip(addr, "GET /missing HTTP/1.1\r\nHost: test\r\n\r\n".into()).await;
    assert!(raw.starts_with("HTTP/1.1 404 Not Found"));

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
    assert_eq!(count(trellis::server::lock(&shared).state()), 1);
}
