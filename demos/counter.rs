//! Counter demo.
//!
//! Run with `cargo run --example counter [config.yaml]` and open
//! http://127.0.0.1:5000.

use serde_json::Value;
use trellis::app::{App, Application, BuildContext, SetupContext};
use trellis::component::Child;
use trellis::config::AppConfig;
use trellis::event::{AppHandler, Handler, MethodTable, Response};
use trellis::widgets::{Button, Card, Col, Divider, Input, Row, Text, Title};

#[derive(Default)]
struct Counter {
    resets: u32,
}

impl Application for Counter {
    fn setup(&mut self, cx: &mut SetupContext<'_, Self>) {
        cx.state.set("count", 0);
        cx.state.set("step", 1);
        cx.on(
            "shortcut",
            AppHandler::new(|_app: &mut Counter, _cx, params| {
                let key = params.str("key").unwrap_or("?").to_owned();
                Ok(Some(Response::notify("Shortcut", format!("Pressed {key}"), "info")))
            })
            .param("key"),
        );
    }

    fn build(&self, cx: &BuildContext<'_>) -> anyhow::Result<Vec<Child>> {
        let count = cx.state.get("count").and_then(Value::as_i64).unwrap_or(0);
        let step = cx.state.get("step").and_then(Value::as_i64).unwrap_or(1);

        let increment = Handler::new(|cx, _params| {
            let step = cx.state.get("step").and_then(Value::as_i64).unwrap_or(1);
            let next = cx.state.get("count").and_then(Value::as_i64).unwrap_or(0) + step;
            cx.state.set("count", next);
            Ok(Some(Response::notify("Counter", format!("Count is now {next}"), "success")))
        });
        let set_step = Handler::new(|cx, params| {
            let step = params
                .str("target")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(1);
            Ok(Some(cx.update_state("step", step)))
        })
        .param_or("target", "1");

        Ok(vec![
            Title::h1("Trellis counter").with_id("title").into(),
            Card::new()
                .with_id("counter")
                .header(format!("Resets so far: {}", self.resets))
                .child(Text::new(format!("Count: {count}")).with_id("count").bold())
                .child(Divider::new())
                .child(
                    Row::new()
                        .gutter(12)
                        .child(
                            Col::new(12).child(
                                Button::primary(format!("+{step}"))
                                    .with_id("increment")
                                    .on("click", increment),
                            ),
                        )
                        .child(Col::new(6).child(Button::danger("Reset").with_id("reset")))
                        .child(
                            Col::new(6).child(
                                Input::new()
                                    .with_id("step")
                                    .placeholder("Step")
                                    .value(step.to_string())
                                    .on("change", set_step),
                            ),
                        ),
                )
                .into(),
        ])
    }

    fn methods() -> MethodTable<Self> {
        // The reset button carries no handler of its own; clicks fall
        // through to `on_click`.
        MethodTable::new().method(
            "on_click",
            AppHandler::new(|app: &mut Counter, cx, _params| {
                if cx.component_id() != Some("reset") {
                    return Ok(None);
                }
                app.resets += 1;
                cx.state.set("count", 0);
                Ok(Some(Response::reload()))
            }),
        )
    }

    fn teardown(&mut self) {
        tracing::info!(resets = self.resets, "counter stopped");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::new().with_name("Counter").with_debug(true),
    };
    trellis::logging::init(config.debug);
    trellis::server::serve(App::new(Counter::default(), config)).await
}
