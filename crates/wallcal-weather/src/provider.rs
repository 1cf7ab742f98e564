use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use wallcal_core::WeatherConfig;

use crate::cache::WeatherCache;
use crate::forecast::{ForecastResponse, HumidityWindow};
use crate::types::{Location, WeatherError};

const REQUEST_TIMEOUT_SECS: u64 = 30;

const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_probability_max,weathercode,sunrise,sunset";
const HOURLY_FIELDS: &str = "relative_humidity_2m";

/// Open-Meteo client producing [`WeatherCache`] snapshots.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    api_url: String,
    location: Location,
    past_days: u32,
    forecast_days: u32,
    humidity_window: HumidityWindow,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            api_url: config.api_url.clone(),
            location: Location::from_config(config),
            past_days: config.past_days,
            forecast_days: config.forecast_days,
            humidity_window: HumidityWindow {
                start_hour: config.humidity_start_hour as usize,
                end_hour: config.humidity_end_hour as usize,
            },
        })
    }

    /// Fetch the forecast for the configured location.
    pub async fn refresh(&self) -> Result<WeatherCache, WeatherError> {
        self.fetch(&self.location).await
    }

    /// One forecast call for `location`. Any failure discards the snapshot.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn fetch(&self, location: &Location) -> Result<WeatherCache, WeatherError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("temperature_unit", "fahrenheit".to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", self.forecast_days.to_string()),
                ("past_days", self.past_days.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let forecast: ForecastResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("forecast body: {}", e)))?;

        let cache = forecast.into_cache(self.humidity_window)?;
        tracing::info!(days = cache.len(), "Weather snapshot built");
        Ok(cache)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> WeatherProvider {
        let config = WeatherConfig {
            api_url: format!("{}/v1/forecast", server.uri()),
            ..WeatherConfig::default()
        };
        WeatherProvider::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_builds_snapshot() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "30.438"))
            .and(query_param("longitude", "-84.28"))
            .and(query_param("hourly", "relative_humidity_2m"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("timezone", "auto"))
            .and(query_param("forecast_days", "14"))
            .and(query_param("past_days", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": {
                    "time": ["2026-10-16"],
                    "temperature_2m_max": [82.4],
                    "temperature_2m_min": [63.5],
                    "precipitation_probability_max": [10],
                    "weathercode": [2],
                    "sunrise": ["2026-10-16T07:41"],
                    "sunset": ["2026-10-16T19:02"]
                },
                "hourly": {"relative_humidity_2m": vec![Some(45.0); 24]}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let cache = provider(&mock_server).refresh().await.unwrap();

        let day = cache.get(&"2026-10-16".parse().unwrap()).unwrap();
        assert_eq!(day.high, 82);
        assert_eq!(day.low, 64);
        assert_eq!(day.humidity_avg, 45);
        assert_eq!(day.sunrise, "7:41AM");
    }

    #[tokio::test]
    async fn test_server_error_discards_snapshot() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).refresh().await;
        assert!(matches!(result, Err(WeatherError::Status(502))));
    }

    #[tokio::test]
    async fn test_unparseable_body_discards_snapshot() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server).refresh().await.unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)));
    }
}
