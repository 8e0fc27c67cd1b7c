//! Tracing bootstrap for hosts and tools
//!
//! The library only emits `tracing` events; it never installs a subscriber
//! on its own. Binaries and tests that want output call [`init`].

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a formatted subscriber filtered by `RUST_LOG` (default `info`)
///
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
