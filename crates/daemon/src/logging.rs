//! Logging setup

use crate::config::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "timemachine=info";

/// Install the global subscriber; `RUST_LOG` overrides the default filter
pub fn init(format: LogFormat) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    match format {
        // Production: JSON structured logging
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .try_init()?,
        // Development: Pretty formatting with colors
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .try_init()?,
    }

    Ok(())
}
