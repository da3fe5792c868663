//! Logging setup.

use tracing::Level;

/// Install a `tracing-subscriber` fmt subscriber writing to stderr.
///
/// `DEBUG` and above in debug mode, `INFO` otherwise. Returns `false` if a
/// global subscriber was already installed; calling it twice is harmless.
pub fn init(debug: bool) -> bool {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        init(true);
        assert!(!init(false));
    }
}
