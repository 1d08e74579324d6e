//! Logging configuration for Harvest.
//!
//! The worker is a batch job, so all diagnostics go to stderr where the
//! container runtime captures them; the output file stays the only
//! artifact on disk.

use tracing_subscriber::EnvFilter;

/// Initializes stderr logging with an env-controlled filter.
///
/// Defaults to `info` when `RUST_LOG` is unset.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
