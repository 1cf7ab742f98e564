use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Calendar feeds and credentials
    pub calendar: CalendarConfig,

    /// Forecast location and query shape
    pub weather: WeatherConfig,

    /// Refresh cadence per kind
    pub refresh: RefreshConfig,

    /// Grid geometry and per-row caps
    pub grid: GridConfig,

    /// Local presentation settings
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Base URL of the Calendar v3 REST API
    pub api_base_url: String,

    /// Calendar ids, in fetch order. Colours follow this order.
    pub sources: Vec<String>,

    /// Colours assigned round-robin to `sources`
    pub palette: Vec<String>,

    /// Days before now included in the query window
    pub window_past_days: u32,

    /// Days after now included in the query window
    pub window_future_days: u32,

    pub credentials: CredentialsConfig,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            sources: vec![
                "primary".to_string(),
                "en.usa#holiday@group.v.calendar.google.com".to_string(),
            ],
            palette: vec![
                "#7986CB".to_string(),
                "#D81B60".to_string(),
                "#8E24AA".to_string(),
                "#E67C73".to_string(),
            ],
            window_past_days: 7,
            window_future_days: 40,
            credentials: CredentialsConfig::default(),
        }
    }
}

/// How the calendar client gets its bearer token.
///
/// A service-account key file wins over the environment variable when both
/// are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Google service-account JSON key
    pub service_account_file: Option<PathBuf>,

    /// Environment variable holding a ready-to-use access token
    pub token_env: Option<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            service_account_file: None,
            token_env: Some("WALLCAL_CALENDAR_TOKEN".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Open-Meteo forecast endpoint
    pub api_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub past_days: u32,
    pub forecast_days: u32,

    /// First local hour (inclusive) of the daytime humidity window
    pub humidity_start_hour: u32,

    /// Last local hour (exclusive) of the daytime humidity window
    pub humidity_end_hour: u32,

    /// Rain probability (percent) above which the rain icon is shown
    pub rain_icon_threshold: u8,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            latitude: 30.438,
            longitude: -84.280,
            past_days: 3,
            forecast_days: 14,
            humidity_start_hour: 9,
            humidity_end_hour: 19,
            rain_icon_threshold: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Calendar refresh interval in minutes
    pub events_minutes: u32,

    /// Weather refresh interval in minutes
    pub weather_minutes: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            events_minutes: 10,
            weather_minutes: 60,
        }
    }
}

impl RefreshConfig {
    pub fn events_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.events_minutes) * 60)
    }

    pub fn weather_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.weather_minutes) * 60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,

    /// Row of the cell that shows today
    pub anchor_row: usize,

    /// Column of the cell that shows today
    pub anchor_col: usize,

    /// Event cap indexed by row; rows past the end use `default_event_cap`
    pub row_event_caps: Vec<usize>,
    pub default_event_cap: usize,

    /// Rows whose cells carry the weather footer
    pub weather_rows: Vec<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 7,
            anchor_row: 1,
            anchor_col: 1,
            row_event_caps: vec![2, 10, 5],
            default_event_cap: 2,
            weather_rows: vec![1, 2],
        }
    }
}

impl GridConfig {
    /// Maximum number of events shown in a cell of `row`.
    pub fn event_cap(&self, row: usize) -> usize {
        self.row_event_caps
            .get(row)
            .copied()
            .unwrap_or(self.default_event_cap)
    }

    pub fn shows_weather(&self, row: usize) -> bool {
        self.weather_rows.contains(&row)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// IANA timezone used for "today", event times and date keys
    pub timezone: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: "America/New_York".to_string(),
        }
    }
}

impl DisplayConfig {
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::Invalid(format!("display.timezone: {}", e)))
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`, layering `WALLCAL_SECTION__KEY`
    /// environment variables on top.
    ///
    /// A missing file is created with defaults first.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Writing default configuration to {}", path.display());
            Self::default().save_to(path)?;
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()).required(true))
            .add_source(
                config::Environment::with_prefix("WALLCAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("calendar.sources")
                    .with_list_parse_key("calendar.palette"),
            )
            .build()
            .context("Failed to read config file")?;

        settings
            .try_deserialize::<Config>()
            .context("Failed to parse config file")
    }

    /// Load configuration and validate it.
    ///
    /// Warnings are logged; errors abort.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.calendar.api_base_url, "calendar.api_base_url", &mut result);
        self.validate_url(&self.weather.api_url, "weather.api_url", &mut result);

        if self.calendar.sources.is_empty() {
            result.add_warning("calendar.sources", "No calendar sources configured");
        }
        if self.calendar.palette.is_empty() {
            result.add_error("calendar.palette", "Palette must contain at least one colour");
        }
        let creds = &self.calendar.credentials;
        if creds.service_account_file.is_none() && creds.token_env.is_none() {
            result.add_error(
                "calendar.credentials",
                "Set service_account_file or token_env",
            );
        }
        if let Some(path) = &creds.service_account_file {
            if !path.exists() {
                result.add_warning(
                    "calendar.credentials.service_account_file",
                    format!("Path does not exist: {}", path.display()),
                );
            }
        }

        if !(-90.0..=90.0).contains(&self.weather.latitude) {
            result.add_error("weather.latitude", "Latitude must be within -90..=90");
        }
        if !(-180.0..=180.0).contains(&self.weather.longitude) {
            result.add_error("weather.longitude", "Longitude must be within -180..=180");
        }
        if self.weather.humidity_start_hour >= self.weather.humidity_end_hour
            || self.weather.humidity_end_hour > 24
        {
            result.add_error(
                "weather.humidity_start_hour",
                "Humidity window must satisfy start < end <= 24",
            );
        }
        if self.weather.forecast_days == 0 {
            result.add_error("weather.forecast_days", "Forecast days must be greater than 0");
        }

        if self.refresh.events_minutes == 0 {
            result.add_error("refresh.events_minutes", "Interval must be greater than 0");
        }
        if self.refresh.weather_minutes == 0 {
            result.add_error("refresh.weather_minutes", "Interval must be greater than 0");
        } else if self.refresh.weather_minutes > 1440 {
            result.add_warning(
                "refresh.weather_minutes",
                "Weather refresh interval is more than 24 hours",
            );
        }

        if self.grid.rows == 0 || self.grid.cols == 0 {
            result.add_error("grid", "Grid must have at least one row and column");
        } else if self.grid.anchor_row >= self.grid.rows || self.grid.anchor_col >= self.grid.cols
        {
            result.add_error("grid.anchor_row", "Anchor cell must lie inside the grid");
        }

        if let Err(e) = self.display.tz() {
            result.add_error("display.timezone", e.to_string());
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("wallcal");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.api_url = "ftp://example.com/forecast".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_anchor_outside_grid() {
        let mut config = Config::default();
        config.grid.anchor_col = 7;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "grid.anchor_row"));
    }

    #[test]
    fn test_bad_timezone() {
        let mut config = Config::default();
        config.display.timezone = "Mars/Olympus_Mons".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "display.timezone"));
    }

    #[test]
    fn test_zero_interval_is_error() {
        let mut config = Config::default();
        config.refresh.events_minutes = 0;
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_humidity_window_order() {
        let mut config = Config::default();
        config.weather.humidity_start_hour = 19;
        config.weather.humidity_end_hour = 9;
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_event_caps_by_row() {
        let grid = GridConfig::default();
        assert_eq!(grid.event_cap(0), 2);
        assert_eq!(grid.event_cap(1), 10);
        assert_eq!(grid.event_cap(2), 5);
        assert_eq!(grid.event_cap(3), 2);
        assert_eq!(grid.event_cap(4), 2);
        assert!(grid.shows_weather(1));
        assert!(!grid.shows_weather(0));
    }

    #[test]
    fn test_intervals() {
        let refresh = RefreshConfig::default();
        assert_eq!(refresh.events_interval(), Duration::from_secs(600));
        assert_eq!(refresh.weather_interval(), Duration::from_secs(3600));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.grid.rows, 5);
        assert_eq!(config.calendar.window_future_days, 40);
        assert_eq!(config.calendar.palette.len(), 4);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[weather]
latitude = 51.5
longitude = -0.12

[display]
timezone = "Europe/London"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.weather.latitude, 51.5);
        assert_eq!(config.weather.forecast_days, 14);
        assert_eq!(config.display.tz().unwrap(), chrono_tz::Europe::London);
        assert_eq!(config.refresh.events_minutes, 10);
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
