//! Tracing services.

use tracing_subscriber::EnvFilter;

/// Initializes tracing with a console subscriber.
///
/// The filter is taken from the `RUST_LOG` environment variable, defaulting to
/// `info` when it is absent or invalid.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("tracing initialized");
}
