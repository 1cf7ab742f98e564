//! Fixed day grid around today.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::Serialize;
use wallcal_calendar::{Event, EventCache, EventStart};
use wallcal_core::{DateKey, GridConfig};
use wallcal_weather::{DayWeather, WeatherCache};

use crate::contrast::{foreground, Foreground};
use crate::gauges::{humidity_level, temperature_gauge_color};
use crate::lunar::{phase, MoonPhase};

const DATE_LABEL_FORMAT: &str = "%a %b %d";
const EVENT_TIME_FORMAT: &str = "%H:%M";
const RAIN_ICON: &str = "💧";

/// Position of one cell relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub day_offset: i64,
    pub is_anchor: bool,
}

/// One event line as it should be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventView {
    pub label: String,
    pub background: String,
    pub foreground: Foreground,
}

/// Weather footer for cells in weather rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherView {
    pub temperature_line: String,
    pub humidity_line: String,
    pub sun_line: String,
    /// Temperature gauge colour
    pub accent: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub cell: GridCell,
    pub date_key: DateKey,
    pub date_label: String,
    pub is_weekend: bool,
    pub moon: MoonPhase,
    pub events: Vec<EventView>,
    pub weather: Option<WeatherView>,
}

impl CellView {
    pub fn moon_symbol(&self) -> &'static str {
        self.moon.symbol()
    }
}

/// A fully computed board, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub today: DateKey,
    pub rows: Vec<Vec<CellView>>,
}

impl Board {
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellView> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn cells(&self) -> impl Iterator<Item = &CellView> {
        self.rows.iter().flatten()
    }
}

/// Turns "today" plus the two snapshots into a [`Board`].
#[derive(Debug, Clone)]
pub struct GridMapper {
    grid: GridConfig,
    tz: Tz,
    rain_icon_threshold: u8,
}

impl GridMapper {
    pub fn new(grid: GridConfig, tz: Tz, rain_icon_threshold: u8) -> Self {
        Self {
            grid,
            tz,
            rain_icon_threshold,
        }
    }

    pub fn cell_at(&self, row: usize, col: usize) -> GridCell {
        let row_delta = row as i64 - self.grid.anchor_row as i64;
        let col_delta = col as i64 - self.grid.anchor_col as i64;
        GridCell {
            row,
            col,
            day_offset: row_delta * self.grid.cols as i64 + col_delta,
            is_anchor: row == self.grid.anchor_row && col == self.grid.anchor_col,
        }
    }

    pub fn date_for(&self, today: NaiveDate, cell: &GridCell) -> NaiveDate {
        today + Duration::days(cell.day_offset)
    }

    pub fn map(&self, today: NaiveDate, events: &EventCache, weather: &WeatherCache) -> Board {
        let rows = (0..self.grid.rows)
            .map(|row| {
                (0..self.grid.cols)
                    .map(|col| self.cell_view(self.cell_at(row, col), today, events, weather))
                    .collect()
            })
            .collect();

        Board {
            today: DateKey::new(today),
            rows,
        }
    }

    fn cell_view(
        &self,
        cell: GridCell,
        today: NaiveDate,
        events: &EventCache,
        weather: &WeatherCache,
    ) -> CellView {
        let date = self.date_for(today, &cell);
        let date_key = DateKey::new(date);

        let cap = self.grid.event_cap(cell.row);
        let events = events
            .events_on(&date_key)
            .iter()
            .take(cap)
            .map(|e| self.event_view(e))
            .collect();

        let weather = if self.grid.shows_weather(cell.row) {
            weather.get(&date_key).map(|w| self.weather_view(w))
        } else {
            None
        };

        CellView {
            cell,
            date_key,
            date_label: date.format(DATE_LABEL_FORMAT).to_string(),
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            moon: phase(date),
            events,
            weather,
        }
    }

    fn event_view(&self, event: &Event) -> EventView {
        let label = match &event.start {
            EventStart::DateOnly(_) => event.summary.clone(),
            EventStart::Instant { at, .. } => format!(
                "{} {}",
                at.with_timezone(&self.tz).format(EVENT_TIME_FORMAT),
                event.summary
            ),
        };

        EventView {
            label,
            background: event.color.clone(),
            foreground: foreground(&event.color),
        }
    }

    fn weather_view(&self, day: &DayWeather) -> WeatherView {
        let rain_icon = if day.rain_probability > self.rain_icon_threshold {
            RAIN_ICON
        } else {
            ""
        };

        WeatherView {
            temperature_line: format!(
                "{}°/{}°  //  {}{}%",
                day.high, day.low, rain_icon, day.rain_probability
            ),
            humidity_line: format!(
                "{}  {}%",
                humidity_level(day.humidity_avg).icon(),
                day.humidity_avg
            ),
            sun_line: format!("☀ {}  {} ☾", day.sunrise, day.sunset),
            accent: temperature_gauge_color(day.high, day.low).to_string(),
            condition: day.condition().description().to_string(),
        }
    }
}
