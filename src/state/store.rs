//! The path-addressed state store.
//!
//! State is a single JSON object. Paths are dot-separated keys (`user.name`).
//! Every effective `set`/`delete` first pushes a full snapshot onto a bounded
//! history ring, so [`StateStore::undo`] can restore it.

use std::collections::VecDeque;

use serde_json::{Map, Value};

use super::watcher::{WatchResult, WatcherId, Watchers};

/// History capacity used when none is configured.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Errors from loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("state snapshot must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Look up a dotted path in `root`.
fn lookup<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = root.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Every proper ancestor of `path`, shallowest first: `a.b.c` → `a`, `a.b`.
fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('.').map(move |(index, _)| &path[..index])
}

// ---------------------------------------------------------------------------
// StateStore
// ---------------------------------------------------------------------------

/// Hierarchical application state with watchers and undo.
#[derive(Debug)]
pub struct StateStore {
    state: Map<String, Value>,
    history: VecDeque<Map<String, Value>>,
    max_history: usize,
    watchers: Watchers,
}

impl StateStore {
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_HISTORY)
    }

    /// A store keeping at most `max_history` snapshots.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            state: Map::new(),
            history: VecDeque::new(),
            max_history,
            watchers: Watchers::new(),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The value at `path`, or `None` if any segment is missing or not an
    /// object.
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.state, path)
    }

    /// The value at `path`, or `default`.
    pub fn get_or(&self, path: &str, default: impl Into<Value>) -> Value {
        self.get(path).cloned().unwrap_or_else(|| default.into())
    }

    /// Whether `path` holds a non-null value.
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some_and(|v| !v.is_null())
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Set `path` to `value`, creating intermediate objects as needed.
    ///
    /// A non-object value sitting on an intermediate segment is replaced with
    /// an empty object. Watchers on `path` see `(path, new, old)`; watchers on
    /// each ancestor see `(ancestor, current, None)`.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let value = value.into();
        self.snapshot();

        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };
        let mut current = &mut self.state;
        for (depth, segment) in segments.iter().enumerate() {
            let slot = current
                .entry((*segment).to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                tracing::warn!(
                    path,
                    segment = %segments[..=depth].join("."),
                    "replacing non-object intermediate with an empty object"
                );
                *slot = Value::Object(Map::new());
            }
            let Some(map) = slot.as_object_mut() else {
                return;
            };
            current = map;
        }
        let old = current.insert(last.to_owned(), value);
        self.notify(path, old.as_ref());
    }

    /// Apply several sets in order.
    pub fn update<K, V>(&mut self, updates: impl IntoIterator<Item = (K, V)>)
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (path, value) in updates {
            self.set(path.as_ref(), value);
        }
    }

    /// Remove `path`. Returns `false`, without touching history or watchers,
    /// when it does not exist.
    pub fn delete(&mut self, path: &str) -> bool {
        if self.get(path).is_none() {
            return false;
        }
        self.snapshot();

        let (parent, last) = match path.rsplit_once('.') {
            Some((parent, last)) => (Some(parent), last),
            None => (None, path),
        };
        let mut container = &mut self.state;
        for segment in parent.into_iter().flat_map(|p| p.split('.')) {
            let Some(Value::Object(map)) = container.get_mut(segment) else {
                return false;
            };
            container = map;
        }
        let Some(old) = container.remove(last) else {
            return false;
        };
        self.notify(path, Some(&old));
        true
    }

    /// Drop state, history, and watchers.
    pub fn clear(&mut self) {
        self.state.clear();
        self.history.clear();
        self.watchers.clear();
    }

    // ── Watchers ─────────────────────────────────────────────────────

    /// Watch `path`. The callback receives `(path, new, old)`.
    ///
    /// A change below `path` also fires it, with `(path, current, None)`:
    /// the old value of an ancestor is not tracked.
    pub fn watch<F>(&mut self, path: &str, callback: F) -> WatcherId
    where
        F: FnMut(&str, Option<&Value>, Option<&Value>) -> WatchResult + Send + 'static,
    {
        self.watchers.add(path, Box::new(callback))
    }

    /// Remove one watcher on `path`, or all of them when `id` is `None`.
    pub fn unwatch(&mut self, path: &str, id: Option<WatcherId>) -> bool {
        self.watchers.remove(path, id)
    }

    fn notify(&mut self, path: &str, old: Option<&Value>) {
        let new = lookup(&self.state, path);
        self.watchers.notify(path, new, old);
        for ancestor in ancestors(path) {
            if self.watchers.is_watched(ancestor) {
                let current = lookup(&self.state, ancestor);
                self.watchers.notify(ancestor, current, None);
            }
        }
    }

    // ── History ──────────────────────────────────────────────────────

    fn snapshot(&mut self) {
        if self.max_history == 0 {
            return;
        }
        while self.history.len() >= self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(self.state.clone());
    }

    /// Restore the most recent snapshot. Returns `false` when there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(previous) => {
                self.state = previous;
                true
            }
            None => false,
        }
    }

    /// Snapshots, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.history.iter()
    }

    pub fn len_history(&self) -> usize {
        self.history.len()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    // ── Snapshots ────────────────────────────────────────────────────

    /// A deep copy of the whole state.
    pub fn to_dict(&self) -> Map<String, Value> {
        self.state.clone()
    }

    /// Replace the whole state. History and watchers are kept.
    pub fn from_dict(&mut self, data: Map<String, Value>) {
        self.state = data;
    }

    /// The state as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string_pretty(&self.state)?)
    }

    /// Replace the state from JSON text. The store is unchanged on error.
    pub fn from_json(&mut self, text: &str) -> Result<(), StateError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => {
                self.state = map;
                Ok(())
            }
            other => Err(StateError::NotAnObject(kind_of(&other))),
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
