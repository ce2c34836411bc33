//! Diagnostic tracing for the tools.
//!
//! Reports meant for the user go to standard output; tracing goes to stderr
//! and is controlled by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset, so failed deletions and
/// rewrites are shown while routine progress is not.
///
/// # Example
/// ```bash
/// RUST_LOG=actor_lines=debug actor-lines prune --dry-run
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second initialisation (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
