//! Snapshot helpers.
//!
//! Turn payload forests into stable strings for `insta` snapshots and
//! assertions.

use crate::render::payload::{EventInstruction, Payload, PayloadChild};

/// Pretty JSON of a payload forest.
pub fn payload_to_string(payload: &[Payload]) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|error| format!("<unserializable: {error}>"))
}

/// An indented outline, one line per record or literal.
///
/// Records print as `component#id`, followed by their events in brackets
/// (`click` for dispatched events, `click*` for scripts). Literals print in
/// JSON form. Generated ids make outlines unstable, so give nodes explicit
/// ids when snapshotting.
pub fn outline(payload: &[Payload]) -> String {
    let mut lines = Vec::new();
    for root in payload {
        outline_into(root, 0, &mut lines);
    }
    lines.join("\n")
}

fn outline_into(node: &Payload, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let mut line = format!("{indent}{}#{}", node.component, node.id);
    if !node.events.is_empty() {
        let events: Vec<String> = node
            .events
            .iter()
            .map(|(name, instruction)| match instruction {
                EventInstruction::Dispatch { .. } => name.clone(),
                EventInstruction::Script { .. } => format!("{name}*"),
            })
            .collect();
        line.push_str(&format!(" [{}]", events.join(", ")));
    }
    lines.push(line);
    for child in &node.children {
        match child {
            PayloadChild::Node(inner) => outline_into(inner, depth + 1, lines),
            PayloadChild::Literal(value) => lines.push(format!("{indent}  {value}")),
        }
    }
}
