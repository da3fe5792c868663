//! Payload records: the serialized form of a component tree sent to the
//! client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What the client should do when an event fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventInstruction {
    /// POST the event back to the server.
    Dispatch { component_id: String, event: String },
    /// Evaluate literal client-side code.
    Script { code: String },
}

/// One node of the payload tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub id: String,
    pub component: String,
    pub props: Map<String, Value>,
    pub events: BTreeMap<String, EventInstruction>,
    pub children: Vec<PayloadChild>,
}

/// A payload child: a nested record or a literal leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadChild {
    Node(Payload),
    Literal(Value),
}

impl PayloadChild {
    pub fn as_node(&self) -> Option<&Payload> {
        match self {
            Self::Node(payload) => Some(payload),
            Self::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Node(_) => None,
        }
    }
}

impl Payload {
    /// A `span` record wrapping a top-level scalar.
    pub fn text_leaf(index: usize, text: impl Into<String>) -> Self {
        Self {
            id: format!("text_{index}"),
            component: "span".to_owned(),
            props: Map::new(),
            events: BTreeMap::new(),
            children: vec![PayloadChild::Literal(Value::String(text.into()))],
        }
    }

    /// Find a record by id in this subtree, depth first.
    pub fn find(&self, id: &str) -> Option<&Payload> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .iter()
            .filter_map(PayloadChild::as_node)
            .find_map(|child| child.find(id))
    }

    /// Concatenated text of all literal leaves in this subtree.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                PayloadChild::Literal(Value::String(s)) => out.push_str(s),
                PayloadChild::Literal(other) => out.push_str(&other.to_string()),
                PayloadChild::Node(node) => out.push_str(&node.text()),
            }
        }
        out
    }
}

/// Find a record by id across a forest.
pub fn find_in<'a>(forest: &'a [Payload], id: &str) -> Option<&'a Payload> {
    forest.iter().find_map(|root| root.find(id))
}
