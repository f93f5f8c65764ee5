//! Logging setup.
//!
//! Events are emitted with `tracing` throughout the crate; this module
//! installs the subscriber that prints them.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber with the default `info` filter
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` when it is set and parses. Calling this more
/// than once keeps the first subscriber.
pub fn init_tracing_with_level(level: &str) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}
