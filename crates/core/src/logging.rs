use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global `tracing` subscriber for a host process.
///
/// Priority: `RUST_LOG` > `filter` (usually `TrackerConfig::log_filter`).
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(filter: &str) -> bool {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .try_init()
        .is_ok()
}
