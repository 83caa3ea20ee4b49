//! Logging initialization.
//!
//! Human-readable `tracing-subscriber` output on stderr, filtered by `RUST_LOG`
//! or, when that is unset, by the `--log-level` flag.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Call this once at startup, before any `tracing` events are emitted.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
