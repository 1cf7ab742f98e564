//! Weather service for WallCal
//!
//! One Open-Meteo forecast call per refresh, reduced to a per-day
//! [`WeatherCache`] snapshot.

pub mod cache;
pub mod forecast;
pub mod provider;
pub mod types;

pub use cache::WeatherCache;
pub use provider::WeatherProvider;
pub use types::*;
