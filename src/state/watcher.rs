//! Path watchers for the state store.
//!
//! Callbacks live in a slotmap arena keyed by [`WatcherId`]; a side table
//! keeps the per-path registration order.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned by [`StateStore::watch`](super::StateStore::watch).
    pub struct WatcherId;
}

/// What a watcher callback returns. Errors are logged, never propagated.
pub type WatchResult = anyhow::Result<()>;

/// A watcher callback: `(path, new, old)`.
pub type WatchCallback = Box<dyn FnMut(&str, Option<&Value>, Option<&Value>) -> WatchResult + Send>;

/// All registered watchers.
#[derive(Default)]
pub struct Watchers {
    callbacks: SlotMap<WatcherId, WatchCallback>,
    by_path: HashMap<String, Vec<WatcherId>>,
}

impl Watchers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` on `path`. Callbacks on the same path run in
    /// registration order.
    pub fn add(&mut self, path: &str, callback: WatchCallback) -> WatcherId {
        let id = self.callbacks.insert(callback);
        self.by_path.entry(path.to_owned()).or_default().push(id);
        id
    }

    /// Remove one watcher, or every watcher on `path` when `id` is `None`.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, path: &str, id: Option<WatcherId>) -> bool {
        let Some(ids) = self.by_path.get_mut(path) else {
            return false;
        };
        let removed = match id {
            None => {
                for id in ids.drain(..) {
                    self.callbacks.remove(id);
                }
                true
            }
            Some(id) => match ids.iter().position(|&w| w == id) {
                Some(index) => {
                    ids.remove(index);
                    self.callbacks.remove(id);
                    true
                }
                None => false,
            },
        };
        if ids.is_empty() {
            self.by_path.remove(path);
        }
        removed
    }

    /// Invoke every watcher on `path`. A failing callback is logged and the
    /// rest still run.
    pub fn notify(&mut self, path: &str, new: Option<&Value>, old: Option<&Value>) {
        let Some(ids) = self.by_path.get(path) else {
            return;
        };
        for &id in ids {
            if let Some(callback) = self.callbacks.get_mut(id) {
                if let Err(error) = callback(path, new, old) {
                    tracing::warn!(path, "state watcher failed: {error:#}");
                }
            }
        }
    }

    /// Whether any watcher is registered on `path`.
    pub fn is_watched(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    /// Number of watchers on `path`.
    pub fn count(&self, path: &str) -> usize {
        self.by_path.get(path).map_or(0, Vec::len)
    }

    /// Total number of watchers.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
        self.by_path.clear();
    }
}

impl fmt::Debug for Watchers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watchers")
            .field("paths", &self.by_path.keys().collect::<Vec<_>>())
            .field("count", &self.callbacks.len())
            .finish()
    }
}
