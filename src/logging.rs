//! Logging setup.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Log to stderr, filtered by RUST_LOG (default: warn).
/// Stdout carries the calendar document only.
pub fn init() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to set up logging: {e}"))?;

    Ok(())
}
