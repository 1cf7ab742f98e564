pub mod config;
pub mod date_key;
pub mod error;
pub mod refresh_state;

pub use config::{
    CalendarConfig, Config, CredentialsConfig, DisplayConfig, GridConfig, RefreshConfig,
    ValidationResult, WeatherConfig,
};
pub use date_key::DateKey;
pub use error::{AppError, ConfigError, FailureKind};
pub use refresh_state::{InFlight, RefreshKind};

use anyhow::Result;

/// Initialize logging for the process.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("WallCal core initialized");
    Ok(())
}
