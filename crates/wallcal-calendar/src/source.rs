use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::CalendarError;
use crate::types::ApiEvent;

/// The time range every feed is queried with during one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    /// `[now - past_days, now + future_days]`
    pub fn around(now: DateTime<Utc>, past_days: u32, future_days: u32) -> Self {
        Self {
            start: now - Duration::days(i64::from(past_days)),
            end: now + Duration::days(i64::from(future_days)),
        }
    }
}

/// One calendar feed endpoint.
///
/// A failure here only costs the calendar that was asked for; the aggregator
/// keeps going with its siblings.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<ApiEvent>, CalendarError>;
}
