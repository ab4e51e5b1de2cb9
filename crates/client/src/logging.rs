//! Tracing subscriber setup for the binary.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber; `RUST_LOG` controls verbosity and
/// defaults to `info` for the agent crates.
pub fn setup() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,agent_runtime=info,agent_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to install tracing subscriber: {error}"))?;

    Ok(())
}
