//! Tracing setup for the provider process.
//!
//! The host engine owns stdout, so logs always go to stderr.

use tracing_subscriber::EnvFilter;

/// Filter directives for the provider, e.g. `OPENWRT_LOG=openwrt_client=trace`.
pub const LOG_ENV: &str = "OPENWRT_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Builds the filter from `OPENWRT_LOG`, then `RUST_LOG`, then `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Installs the global subscriber. Fails if one is already set.
pub fn try_init_logging() -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
}

/// Like [`try_init_logging`], but a second call is a no-op.
pub fn init_logging() {
    let _ = try_init_logging();
}
