//! The mutable view a handler gets of the running application.

use serde_json::{Map, Value};

use super::message::Response;
use crate::state::StateStore;

/// Borrowed access to the shell's state store and render context for the
/// duration of one handler call.
#[derive(Debug)]
pub struct EventContext<'a> {
    pub state: &'a mut StateStore,
    pub context: &'a mut Map<String, Value>,
    event: String,
    component_id: Option<String>,
}

impl<'a> EventContext<'a> {
    pub fn new(
        state: &'a mut StateStore,
        context: &'a mut Map<String, Value>,
        event: impl Into<String>,
        component_id: Option<String>,
    ) -> Self {
        Self {
            state,
            context,
            event: event.into(),
            component_id,
        }
    }

    /// The name the handler was resolved under.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The id of the component that fired the event, if the client sent one.
    pub fn component_id(&self) -> Option<&str> {
        self.component_id.as_deref()
    }

    /// Set a state value and build the matching `state_update` response.
    pub fn update_state(&mut self, key: &str, value: impl Into<Value>) -> Response {
        let value = value.into();
        self.state.set(key, value.clone());
        Response::state_update(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_state_sets_and_reports() {
        let mut state = StateStore::new();
        let mut context = Map::new();
        let mut cx = EventContext::new(&mut state, &mut context, "save", Some("b1".into()));
        assert_eq!(cx.event(), "save");
        assert_eq!(cx.component_id(), Some("b1"));

        let response = cx.update_state("user.name", "ada");
        assert!(response.success);
        assert_eq!(response.data, Some(json!({"state_update": {"user.name": "ada"}})));
        assert_eq!(state.get("user.name"), Some(&json!("ada")));
    }
}
