//! Wire types: the event envelope sent by the client and the response the
//! shell sends back.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// EventRequest
// ---------------------------------------------------------------------------

/// Why a submitted event body was rejected.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("No data provided")]
    EmptyBody,
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Missing event name")]
    MissingEvent,
}

/// An event submitted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRequest {
    pub event: String,
    /// Overrides `event` for handler lookup when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
}

#[derive(Deserialize)]
struct RawRequest {
    event: Option<String>,
    action: Option<String>,
    #[serde(default)]
    params: Option<Map<String, Value>>,
    component_id: Option<String>,
}

impl EventRequest {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            action: None,
            params: Map::new(),
            component_id: None,
        }
    }

    pub fn component(mut self, id: impl Into<String>) -> Self {
        self.component_id = Some(id.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// The name used to find a handler: `action` if given, else `event`.
    pub fn handler_name(&self) -> &str {
        self.action.as_deref().unwrap_or(&self.event)
    }

    /// Parse a request body.
    ///
    /// An empty body, `null`, or an empty object is [`RequestError::EmptyBody`];
    /// a missing or empty `event` is [`RequestError::MissingEvent`].
    pub fn parse(body: &[u8]) -> Result<Self, RequestError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(RequestError::EmptyBody);
        }
        let value: Value = serde_json::from_slice(body)?;
        match &value {
            Value::Null => return Err(RequestError::EmptyBody),
            Value::Object(map) if map.is_empty() => return Err(RequestError::EmptyBody),
            _ => {}
        }
        let raw: RawRequest = serde_json::from_value(value)?;
        let event = raw
            .event
            .filter(|e| !e.is_empty())
            .ok_or(RequestError::MissingEvent)?;
        Ok(Self {
            event,
            action: raw.action.filter(|a| !a.is_empty()),
            params: raw.params.unwrap_or_default(),
            component_id: raw.component_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Current time as RFC 3339 with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A structured reply to an event or state request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub timestamp: String,
    /// Additional top-level fields, such as `traceback` in debug mode.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Response {
    fn base(success: bool) -> Self {
        Self {
            success,
            message: None,
            error: None,
            data: None,
            timestamp: timestamp(),
            extra: Map::new(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::base(true)
        }
    }

    /// A success carrying data. `null` data is omitted.
    pub fn success_with(message: impl Into<String>, data: impl Into<Value>) -> Self {
        let data = data.into();
        Self {
            message: Some(message.into()),
            data: (!data.is_null()).then_some(data),
            ..Self::base(true)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::base(false)
        }
    }

    /// A success whose whole point is the data. `data` is always present,
    /// even when `null`.
    pub fn data(data: impl Into<Value>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::base(true)
        }
    }

    /// Show a notification. `kind` is `info`, `success`, `warning`, or `error`.
    pub fn notify(title: impl Into<String>, message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::data(json!({
            "notification": {
                "title": title.into(),
                "message": message.into(),
                "type": kind.into(),
            }
        }))
    }

    /// Show a modal dialog. `kind` is `alert`, `confirm`, or `prompt`.
    pub fn modal(title: impl Into<String>, message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::data(json!({
            "modal": {
                "title": title.into(),
                "message": message.into(),
                "type": kind.into(),
            }
        }))
    }

    pub fn redirect(url: impl Into<String>) -> Self {
        Self::data(json!({ "redirect": url.into() }))
    }

    pub fn reload() -> Self {
        Self::data(json!({ "reload": true }))
    }

    /// Patch the props of the component with the given id on the client.
    pub fn update(component_id: impl Into<String>, updates: Map<String, Value>) -> Self {
        Self::data(json!({
            "component_update": {
                "id": component_id.into(),
                "updates": updates,
            }
        }))
    }

    /// Report a state change to the client.
    pub fn state_update(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut update = Map::new();
        update.insert(key.into(), value.into());
        Self::data(json!({ "state_update": update }))
    }

    /// Attach an extra top-level field (builder).
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The response as a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({ "success": self.success }))
    }
}
