//! runcat — a tray icon that runs faster the busier the CPU is.
//!
//! Run with:  `RUST_LOG=info runcat`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("runcat v{} starting", env!("CARGO_PKG_VERSION"));

    runcat_tray::run().map_err(Into::into)
}
