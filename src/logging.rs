//! Tracing bootstrap for the binary.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Installs the global `fmt` subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `info` when it is unset
/// or unparsable. Calling it twice is harmless.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter_from_env())
        .try_init();
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
