//! Logging setup
//!
//! `RUST_LOG` wins over the configured level. Installing twice is harmless:
//! the second call reports `false` and keeps the first subscriber.

use tracing_subscriber::EnvFilter;

use crate::LoggingConfig;

/// Install the global `tracing` subscriber. Returns whether this call installed it.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.is_ok()
}
