//! Application-level handler tables.
//!
//! [`MethodTable`] holds the `on_<event>` naming-convention handlers an
//! application exposes; [`GlobalHandlers`] holds handlers registered by
//! event name during setup.

use std::collections::{BTreeMap, HashMap};

use super::handler::AppHandler;

/// Prefix of naming-convention handler names.
pub const METHOD_PREFIX: &str = "on_";

// ---------------------------------------------------------------------------
// MethodTable
// ---------------------------------------------------------------------------

/// Named application methods, looked up as `on_<event>`.
#[derive(Debug)]
pub struct MethodTable<A> {
    methods: BTreeMap<String, AppHandler<A>>,
}

impl<A> MethodTable<A> {
    pub fn new() -> Self {
        Self {
            methods: BTreeMap::new(),
        }
    }

    /// Add a method (builder). `name` is the full method name, e.g. `on_click`.
    pub fn method(mut self, name: impl Into<String>, handler: AppHandler<A>) -> Self {
        self.insert(name, handler);
        self
    }

    /// Add or replace a method.
    pub fn insert(&mut self, name: impl Into<String>, handler: AppHandler<A>) {
        self.methods.insert(name.into(), handler);
    }

    /// Look up a method by its full name.
    pub fn get(&self, name: &str) -> Option<&AppHandler<A>> {
        self.methods.get(name)
    }

    /// Look up the method handling `event`, i.e. `on_<event>`.
    pub fn for_event(&self, event: &str) -> Option<&AppHandler<A>> {
        self.get(&format!("{METHOD_PREFIX}{event}"))
    }

    /// Method names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<A> Default for MethodTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// GlobalHandlers
// ---------------------------------------------------------------------------

/// Handlers registered by event name, independent of any component.
#[derive(Debug)]
pub struct GlobalHandlers<A> {
    handlers: HashMap<String, AppHandler<A>>,
}

impl<A> GlobalHandlers<A> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for `event`, replacing any previous one.
    pub fn register(&mut self, event: impl Into<String>, handler: AppHandler<A>) {
        let event = event.into();
        if self.handlers.insert(event.clone(), handler).is_some() {
            tracing::debug!(event = %event, "replaced global handler");
        }
    }

    /// Find the handler for `event`.
    pub fn resolve(&self, event: &str) -> Option<&AppHandler<A>> {
        self.handlers.get(event)
    }

    /// Remove the handler for `event`. Returns whether one existed.
    pub fn unregister(&mut self, event: &str) -> bool {
        self.handlers.remove(event).is_some()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.handlers.contains_key(event)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<A> Default for GlobalHandlers<A> {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
