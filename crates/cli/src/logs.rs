//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber: human readable lines on stderr, `info`
/// level unless `RUST_LOG` says otherwise.
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
