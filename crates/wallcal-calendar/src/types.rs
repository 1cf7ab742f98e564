//! Calendar API types and data structures.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use wallcal_core::DateKey;

use crate::error::CalendarError;

/// Colour used when a source has no palette entry.
pub const DEFAULT_EVENT_COLOR: &str = "#555555";

/// Longest DST gap skipped when resolving a day's first local time.
const MAX_GAP_HOURS: i64 = 2;

/// A configured calendar feed and the colour its events are drawn with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSource {
    pub id: String,
    pub color: String,
}

impl CalendarSource {
    /// Pair calendar ids with palette colours round-robin, in configured order.
    pub fn from_ids(ids: &[String], palette: &[String]) -> Vec<Self> {
        ids.iter()
            .enumerate()
            .map(|(index, id)| Self {
                id: id.clone(),
                color: if palette.is_empty() {
                    DEFAULT_EVENT_COLOR.to_string()
                } else {
                    palette[index % palette.len()].clone()
                },
            })
            .collect()
    }
}

/// When an event starts. Resolved once at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStart {
    /// All-day event.
    DateOnly(NaiveDate),
    /// Timed event, with the feed's timezone name when it sent one.
    Instant {
        at: DateTime<FixedOffset>,
        time_zone: Option<String>,
    },
}

impl EventStart {
    /// Instant used for ordering. All-day events count from the first local
    /// time of their day, which is midnight unless a DST gap swallows it.
    pub fn effective_instant(&self, tz: &Tz) -> DateTime<Utc> {
        match self {
            EventStart::Instant { at, .. } => at.with_timezone(&Utc),
            EventStart::DateOnly(date) => {
                let midnight = date.and_time(NaiveTime::MIN);
                (0..=MAX_GAP_HOURS)
                    .find_map(|h| tz.from_local_datetime(&(midnight + Duration::hours(h))).earliest())
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|| midnight.and_utc())
            }
        }
    }

    /// Day bucket for this start, seen from `tz`.
    pub fn date_key(&self, tz: &Tz) -> DateKey {
        match self {
            EventStart::DateOnly(date) => DateKey::new(*date),
            EventStart::Instant { at, .. } => DateKey::local(&at.with_timezone(tz)),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventStart::DateOnly(_))
    }
}

/// Calendar event as held in the cache. Never modified after ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub calendar_id: String,
    pub summary: String,
    pub start: EventStart,
    /// Colour of the source this event came from.
    pub color: String,
}

impl Event {
    /// Convert an API item, tagging it with its source's colour.
    pub fn from_api(api: ApiEvent, source: &CalendarSource) -> Result<Self, CalendarError> {
        let start = api
            .start
            .as_ref()
            .ok_or_else(|| CalendarError::InvalidEventData(format!("{}: missing start", api.id)))
            .and_then(|t| parse_event_start(&api.id, t))?;

        Ok(Self {
            id: api.id,
            calendar_id: source.id.clone(),
            summary: api.summary.unwrap_or_else(|| "(No title)".to_string()),
            start,
            color: source.color.clone(),
        })
    }
}

// API Response Types

/// Google Calendar API event response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start: Option<ApiEventTime>,
    pub status: Option<String>,
}

impl ApiEvent {
    /// Deleted instances of recurring events come back with status `cancelled`.
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

/// API response for event list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
    pub next_page_token: Option<String>,
}

fn parse_event_start(event_id: &str, api: &ApiEventTime) -> Result<EventStart, CalendarError> {
    if let Some(dt_str) = &api.date_time {
        return DateTime::parse_from_rfc3339(dt_str)
            .map(|at| EventStart::Instant {
                at,
                time_zone: api.time_zone.clone(),
            })
            .map_err(|e| {
                CalendarError::InvalidEventData(format!("{}: dateTime {:?}: {}", event_id, dt_str, e))
            });
    }
    if let Some(date_str) = &api.date {
        return NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map(EventStart::DateOnly)
            .map_err(|e| {
                CalendarError::InvalidEventData(format!("{}: date {:?}: {}", event_id, date_str, e))
            });
    }
    Err(CalendarError::InvalidEventData(format!(
        "{}: start has neither date nor dateTime",
        event_id
    )))
}
