use wallcal_calendar::EventCache;
use wallcal_weather::WeatherCache;

/// Current snapshot of each kind. Replaced whole, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caches {
    events: EventCache,
    weather: WeatherCache,
}

impl Caches {
    /// Both caches empty, as at process start.
    pub fn init() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &EventCache {
        &self.events
    }

    pub fn weather(&self) -> &WeatherCache {
        &self.weather
    }

    pub fn replace_events(&mut self, snapshot: EventCache) {
        self.events = snapshot;
    }

    pub fn replace_weather(&mut self, snapshot: WeatherCache) {
        self.weather = snapshot;
    }
}
