//! Diagnostic tracing for gitmeta.
//!
//! Diagnostics go to stderr so that properties and summaries written to
//! stdout stay machine-readable.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "warn";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn`.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=gitmeta=debug gitmeta commit
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second initialization (e.g. from a test harness) is not an error.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
