//! Tracing pipeline bootstrap.

use anyhow::anyhow;
use atheneum_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber from telemetry settings.
///
/// `RUST_LOG` wins over the configured filter directive when set.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter.clone()));

    let result = match settings.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    result.map_err(|e| anyhow!("failed to initialize tracing subscriber: {e}"))?;

    tracing::info!(format = ?settings.log_format, "telemetry initialized");
    Ok(())
}
