use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use wallcal_app::{Intervals, LogRenderer, RefreshScheduler, SystemClock};
use wallcal_board::GridMapper;
use wallcal_calendar::EventAggregator;
use wallcal_core::{AppError, Config};
use wallcal_weather::WeatherProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wallcal_core::init()?;

    if let Err(e) = run().await {
        tracing::error!(kind = %e.kind(), "Startup failed: {}", e);
        return Err(e.into());
    }

    tracing::info!("WallCal stopped");
    Ok(())
}

async fn run() -> Result<(), AppError> {
    // Optional first argument overrides the default config location.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let (config, _) = Config::load_validated(config_path.as_deref())?;
    let tz = config.display.tz()?;

    let credentials = wallcal_auth::from_config(&config.calendar.credentials)
        .map_err(|e| AppError::Credentials(e.to_string()))?;
    let events = EventAggregator::new(&config.calendar, tz, credentials);
    let weather = WeatherProvider::new(&config.weather).context("Failed to build weather client")?;
    let mapper = GridMapper::new(config.grid.clone(), tz, config.weather.rain_icon_threshold);

    tracing::info!(
        sources = events.sources().len(),
        timezone = %tz,
        "WallCal started"
    );

    let scheduler = RefreshScheduler::new(
        Arc::new(events),
        Arc::new(weather),
        Intervals::from_config(&config.refresh),
        mapper,
        tz,
        Arc::new(SystemClock),
    );

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown requested"),
            Err(e) => {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                return;
            }
        }
        on_signal.cancel();
    });

    scheduler.run(LogRenderer, shutdown).await;
    Ok(())
}
