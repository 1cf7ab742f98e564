use serde::{Deserialize, Serialize};
use wallcal_core::{FailureKind, WeatherConfig};

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::Sleet, // Freezing drizzle
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            66 | 67 => Self::Sleet, // Freezing rain
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Clear,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}

/// Forecast coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn from_config(config: &WeatherConfig) -> Self {
        Self {
            latitude: config.latitude,
            longitude: config.longitude,
        }
    }
}

/// Derived metrics for one forecast day. Temperatures are whole degrees
/// Fahrenheit; sunrise and sunset are already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWeather {
    pub high: i32,
    pub low: i32,
    /// Maximum precipitation probability, percent
    pub rain_probability: u8,
    /// Mean relative humidity over the daytime window, percent
    pub humidity_avg: u8,
    pub condition_code: i32,
    pub sunrise: String,
    pub sunset: String,
}

impl DayWeather {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.condition_code)
    }
}

/// Weather provider errors. Any of these discards the whole snapshot.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Forecast request failed with status {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::WeatherFetch
    }
}
