//! `tracing` subscriber setup for test binaries.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber writing through the test harness.
///
/// The filter comes from `RUST_LOG` and defaults to `warn`. Calling this again
/// after a subscriber is installed is a no-op.
pub fn init_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}
