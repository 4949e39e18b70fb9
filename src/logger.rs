//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

use crate::config::LoggerSettings;

/// Initializes the global tracing subscriber from logger settings.
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_logger(settings: &LoggerSettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.clone()));

    match settings.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {e}"))?;
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {e}"))?;
        }
    }
    Ok(())
}
