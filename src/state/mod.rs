//! Application state: a path-addressed JSON store with watchers and undo.

pub mod store;
pub mod watcher;

pub use store::{StateError, StateStore, DEFAULT_MAX_HISTORY};
pub use watcher::{WatchCallback, WatchResult, WatcherId};
