//! Open-Meteo forecast payload and its reduction to per-day metrics.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use wallcal_core::DateKey;

use crate::cache::WeatherCache;
use crate::types::{DayWeather, WeatherError};

/// Hours per day in the hourly series.
const HOURS_PER_DAY: usize = 24;

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub daily: DailySeries,
    #[serde(default)]
    pub hourly: HourlySeries,
}

#[derive(Debug, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    pub weathercode: Vec<Option<i32>>,
    #[serde(default)]
    pub sunrise: Vec<String>,
    #[serde(default)]
    pub sunset: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
}

/// Bounds of the daytime humidity window, in local hours `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumidityWindow {
    pub start_hour: usize,
    pub end_hour: usize,
}

impl Default for HumidityWindow {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 19,
        }
    }
}

/// Mean of the non-null hourly samples inside `window` for `day_index`,
/// rounded. Zero when the slice holds no samples.
pub fn daytime_humidity(hourly: &[Option<f64>], day_index: usize, window: HumidityWindow) -> u8 {
    let base = day_index * HOURS_PER_DAY;
    let start = (base + window.start_hour).min(hourly.len());
    let end = (base + window.end_hour).min(hourly.len());

    let samples: Vec<f64> = hourly[start..end.max(start)]
        .iter()
        .filter_map(|h| *h)
        .collect();

    if samples.is_empty() {
        return 0;
    }

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    mean.round().clamp(0.0, 100.0) as u8
}

/// `2026-10-16T07:05` as `7:05AM`.
pub fn format_clock(raw: &str) -> Result<String, WeatherError> {
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| WeatherError::Parse(format!("time {:?}: {}", raw, e)))?;
    Ok(parsed.format("%-I:%M%p").to_string())
}

impl ForecastResponse {
    /// Build the snapshot. Any unusable day fails the whole response.
    pub fn into_cache(self, window: HumidityWindow) -> Result<WeatherCache, WeatherError> {
        let daily = &self.daily;
        let humidity = &self.hourly.relative_humidity_2m;
        let mut days = Vec::with_capacity(daily.time.len());

        for (i, date_str) in daily.time.iter().enumerate() {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| WeatherError::Parse(format!("date {:?}: {}", date_str, e)))?;

            let high = required(&daily.temperature_2m_max, i, "temperature_2m_max", date_str)?;
            let low = required(&daily.temperature_2m_min, i, "temperature_2m_min", date_str)?;
            let rain = daily
                .precipitation_probability_max
                .get(i)
                .copied()
                .flatten()
                .unwrap_or(0.0);
            let code = daily.weathercode.get(i).copied().flatten().unwrap_or(0);

            let sunrise = daily
                .sunrise
                .get(i)
                .ok_or_else(|| missing("sunrise", date_str))?;
            let sunset = daily
                .sunset
                .get(i)
                .ok_or_else(|| missing("sunset", date_str))?;

            days.push((
                DateKey::new(date),
                DayWeather {
                    high: high.round() as i32,
                    low: low.round() as i32,
                    rain_probability: rain.round().clamp(0.0, 100.0) as u8,
                    humidity_avg: daytime_humidity(humidity, i, window),
                    condition_code: code,
                    sunrise: format_clock(sunrise)?,
                    sunset: format_clock(sunset)?,
                },
            ));
        }

        Ok(WeatherCache::from_days(days))
    }
}

fn required(series: &[Option<f64>], i: usize, field: &str, date: &str) -> Result<f64, WeatherError> {
    series.get(i).copied().flatten().ok_or_else(|| missing(field, date))
}

fn missing(field: &str, date: &str) -> WeatherError {
    WeatherError::Parse(format!("{} missing for {}", field, date))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn day_of(values: &[(usize, Option<f64>)]) -> Vec<Option<f64>> {
        let mut hours = vec![Some(99.0); HOURS_PER_DAY];
        for (hour, v) in values {
            hours[*hour] = *v;
        }
        hours
    }

    #[test]
    fn test_humidity_uses_daytime_hours_only() {
        // Hours 9..19 are 50, everything else 99.
        let hours: Vec<Option<f64>> = (0..24)
            .map(|h| if (9..19).contains(&h) { Some(50.0) } else { Some(99.0) })
            .collect();
        assert_eq!(daytime_humidity(&hours, 0, HumidityWindow::default()), 50);
    }

    #[test]
    fn test_humidity_skips_nulls() {
        let mut hours: Vec<Option<f64>> = (0..24).map(|_| Some(99.0)).collect();
        for h in 9..19 {
            hours[h] = Some(60.0);
        }
        hours[10] = None;
        hours[15] = None;
        hours[9] = Some(70.0);
        // (70 + 7 * 60) / 8 = 61.25
        assert_eq!(daytime_humidity(&hours, 0, HumidityWindow::default()), 61);
    }

    #[test]
    fn test_humidity_all_null_is_zero() {
        let hours = day_of(&(9..19).map(|h| (h, None)).collect::<Vec<_>>());
        assert_eq!(daytime_humidity(&hours, 0, HumidityWindow::default()), 0);
    }

    #[test]
    fn test_humidity_second_day_offset() {
        let mut hours = vec![Some(10.0); 48];
        for h in 33..43 {
            hours[h] = Some(80.0);
        }
        assert_eq!(daytime_humidity(&hours, 1, HumidityWindow::default()), 80);
        assert_eq!(daytime_humidity(&hours, 0, HumidityWindow::default()), 10);
    }

    #[test]
    fn test_humidity_short_series_is_zero() {
        assert_eq!(daytime_humidity(&[Some(50.0); 5], 0, HumidityWindow::default()), 0);
        assert_eq!(daytime_humidity(&[], 3, HumidityWindow::default()), 0);
    }

    #[test]
    fn test_format_clock_drops_leading_zero() {
        assert_eq!(format_clock("2026-10-16T07:41").unwrap(), "7:41AM");
        assert_eq!(format_clock("2026-10-16T19:02").unwrap(), "7:02PM");
        assert_eq!(format_clock("2026-10-16T12:00").unwrap(), "12:00PM");
    }

    #[test]
    fn test_format_clock_rejects_garbage() {
        assert!(matches!(format_clock("sunrise"), Err(WeatherError::Parse(_))));
    }

    fn response(json: serde_json::Value) -> ForecastResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_into_cache() {
        let hourly: Vec<Option<f64>> = (0..48).map(|_| Some(65.0)).collect();
        let forecast = response(serde_json::json!({
            "daily": {
                "time": ["2026-10-16", "2026-10-17"],
                "temperature_2m_max": [84.6, 79.2],
                "temperature_2m_min": [61.4, 58.0],
                "precipitation_probability_max": [35, null],
                "weathercode": [61, 0],
                "sunrise": ["2026-10-16T07:41", "2026-10-17T07:42"],
                "sunset": ["2026-10-16T19:02", "2026-10-17T19:01"]
            },
            "hourly": {"relative_humidity_2m": hourly}
        }));

        let cache = forecast.into_cache(HumidityWindow::default()).unwrap();
        assert_eq!(cache.len(), 2);

        let day = cache.get(&"2026-10-16".parse().unwrap()).unwrap();
        assert_eq!(day.high, 85);
        assert_eq!(day.low, 61);
        assert_eq!(day.rain_probability, 35);
        assert_eq!(day.humidity_avg, 65);
        assert_eq!(day.condition_code, 61);
        assert_eq!(day.sunrise, "7:41AM");
        assert_eq!(day.sunset, "7:02PM");

        let next = cache.get(&"2026-10-17".parse().unwrap()).unwrap();
        assert_eq!(next.rain_probability, 0);
    }

    #[test]
    fn test_missing_high_fails_snapshot() {
        let forecast = response(serde_json::json!({
            "daily": {
                "time": ["2026-10-16"],
                "temperature_2m_max": [null],
                "temperature_2m_min": [60.0],
                "sunrise": ["2026-10-16T07:41"],
                "sunset": ["2026-10-16T19:02"]
            }
        }));
        assert!(matches!(
            forecast.into_cache(HumidityWindow::default()),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn test_short_sunrise_series_fails_snapshot() {
        let forecast = response(serde_json::json!({
            "daily": {
                "time": ["2026-10-16", "2026-10-17"],
                "temperature_2m_max": [80.0, 81.0],
                "temperature_2m_min": [60.0, 61.0],
                "sunrise": ["2026-10-16T07:41"],
                "sunset": ["2026-10-16T19:02", "2026-10-17T19:01"]
            }
        }));
        assert!(forecast.into_cache(HumidityWindow::default()).is_err());
    }
}
