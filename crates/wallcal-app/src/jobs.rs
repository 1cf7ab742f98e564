//! The two refresh jobs the scheduler drives.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use wallcal_calendar::{AggregateError, EventAggregator, EventCache};
use wallcal_weather::{WeatherCache, WeatherError, WeatherProvider};

#[async_trait]
pub trait EventsRefresh: Send + Sync {
    async fn refresh_events(&self, now: DateTime<Utc>) -> Result<EventCache, AggregateError>;
}

#[async_trait]
pub trait WeatherRefresh: Send + Sync {
    async fn refresh_weather(&self) -> Result<WeatherCache, WeatherError>;
}

#[async_trait]
impl EventsRefresh for EventAggregator {
    async fn refresh_events(&self, now: DateTime<Utc>) -> Result<EventCache, AggregateError> {
        self.refresh(now).await
    }
}

#[async_trait]
impl WeatherRefresh for WeatherProvider {
    async fn refresh_weather(&self) -> Result<WeatherCache, WeatherError> {
        self.refresh().await
    }
}
