//! The per-render handler registry.
//!
//! A [`HandlerRegistry`] is collected from the tree built by one render cycle
//! and is immutable afterwards. The shell keeps the latest one and passes it
//! into dispatch; a new render produces a new registry rather than mutating
//! the old one.

use std::collections::{BTreeMap, HashMap};

use super::handler::{EventBinding, Handler};
use crate::component::tree::walk_depth_first;
use crate::component::Child;

/// Component id → event name → server handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    tables: HashMap<String, BTreeMap<String, Handler>>,
    duplicates: Vec<String>,
}

impl HandlerRegistry {
    /// An empty registry. Installed after a failed render.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Walk `roots` and record every node's server handlers.
    ///
    /// Script bindings are client-side only and are not recorded. A node id
    /// seen twice is reported in [`duplicates`](Self::duplicates). A later
    /// node with server handlers replaces the earlier table; one without
    /// leaves it in place.
    pub fn collect(roots: &[Child]) -> Self {
        let mut registry = Self::default();
        let mut seen = HashMap::new();
        for node in walk_depth_first(roots) {
            let count = seen.entry(node.id()).or_insert(0usize);
            *count += 1;
            if *count == 2 {
                registry.duplicates.push(node.id().to_owned());
            }
            let table: BTreeMap<String, Handler> = node
                .events()
                .iter()
                .filter_map(|(event, binding)| match binding {
                    EventBinding::Handler(handler) => Some((event.clone(), handler.clone())),
                    EventBinding::Script(_) => None,
                })
                .collect();
            if table.is_empty() {
                continue;
            }
            registry.tables.insert(node.id().to_owned(), table);
        }
        registry
    }

    /// The handler bound to `event` on component `component_id`.
    pub fn lookup(&self, component_id: &str, event: &str) -> Option<&Handler> {
        self.tables.get(component_id)?.get(event)
    }

    /// All handlers of one component.
    pub fn table(&self, component_id: &str) -> Option<&BTreeMap<String, Handler>> {
        self.tables.get(component_id)
    }

    pub fn contains(&self, component_id: &str) -> bool {
        self.tables.contains_key(component_id)
    }

    /// Number of components with at least one server handler.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Ids that occurred more than once in the collected tree.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}
