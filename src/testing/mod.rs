//! Testing utilities: a headless app driver and snapshot helpers.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{outline, payload_to_string};
