//! Logging system initialization
//!
//! Console logging via tracing-subscriber. The level comes from the
//! logging config tier; a `RUST_LOG` environment filter takes precedence
//! when set.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// Safe to call once per process; a second call reports the conflict
/// instead of panicking, which keeps test harnesses happy.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
